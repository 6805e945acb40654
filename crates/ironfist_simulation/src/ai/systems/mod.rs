//! AI systems

pub mod engagement;
pub mod perception;

// Re-export all systems
pub use engagement::*;
pub use perception::*;
