//! AI components

pub mod engagement;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod engagement_tests;

// Re-export all components
pub use engagement::*;
