//! State management module
//!
//! This module contains the timer state machine and the shared application state.

pub mod settings;
pub mod countdown;
pub mod clock;
pub mod app_state;

// Re-export main types
pub use settings::Lengths;
pub use countdown::{Countdown, Phase, TickOutcome};
pub use clock::{Clock, ClockStatus, Toggle};
pub use app_state::AppState;
