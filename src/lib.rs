//! session-clock - A 25+5 session/break countdown clock served over HTTP
//!
//! This library provides the session/break timer state machine, the task
//! that drives it once per tick, and an HTTP API to control and watch it.

pub mod config;
pub mod state;
pub mod presentation;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, Clock};
pub use presentation::{format_time, ClockView};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
