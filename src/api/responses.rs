//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::presentation::ClockView;

/// API response structure for clock control endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Clock status after the action: idle, running or alert
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub clock: ClockView,
}

impl ApiResponse {
    /// Create a new API response, taking the status from the clock view
    pub fn new(message: String, clock: ClockView) -> Self {
        Self {
            status: clock.status.clone(),
            message,
            timestamp: Utc::now(),
            clock,
        }
    }

    /// Response for a length change, noting when it had no effect
    pub fn length_change(what: &str, changed: bool, clock: ClockView) -> Self {
        let message = if changed {
            format!("{} updated", what)
        } else if clock.running {
            format!("{} unchanged while running", what)
        } else {
            format!("{} unchanged, limit reached", what)
        };
        Self::new(message, clock)
    }
}

/// Status response with clock and server information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub clock: ClockView,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub tick_millis: u64,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
