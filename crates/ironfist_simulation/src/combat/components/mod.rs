//! Combat components

pub mod animation;
pub mod combo;
pub mod reaction;
pub mod trace;


// Re-export all components
pub use animation::*;
pub use combo::*;
pub use reaction::*;
pub use trace::*;
