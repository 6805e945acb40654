//! Combat systems

pub mod combo;
pub mod damage;
pub mod lifecycle;
pub mod reactions;
pub mod trace;


// Re-export all systems
pub use combo::*;
pub use damage::*;
pub use lifecycle::*;
pub use reactions::*;
pub use trace::*;
