//! Background tasks module
//!
//! This module contains the tick task that drives the countdown.

pub mod tick_driver;

// Re-export main types
pub use tick_driver::{tick_task, TickDriver};
