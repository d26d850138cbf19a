//! External side effects module
//!
//! This module contains the audible alert players used when an interval ends.

pub mod alert;

// Re-export main types
pub use alert::*;
