//! Target lock components.

pub mod lock;


pub use lock::*;
