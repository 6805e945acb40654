//! Target lock systems

pub mod lock;

pub use lock::*;
