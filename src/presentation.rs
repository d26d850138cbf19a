//! Rendering of clock state for front ends

use serde::{Deserialize, Serialize};

use crate::state::{Clock, Phase};

/// Format remaining time as `MM:SS`
pub fn format_time(minutes: u32, seconds: u32) -> String {
    format!("{:02}:{:02}", minutes, seconds)
}

/// Everything a front end needs to draw the clock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockView {
    pub break_length: u32,
    pub session_length: u32,
    pub phase: Phase,
    /// "Session" or "Break"
    pub label: String,
    /// Remaining time as `MM:SS`
    pub time_left: String,
    pub minutes: u32,
    pub seconds: u32,
    pub running: bool,
    pub alert: bool,
    pub status: String,
}

impl From<&Clock> for ClockView {
    fn from(clock: &Clock) -> Self {
        let countdown = clock.countdown();
        Self {
            break_length: clock.lengths().break_length(),
            session_length: clock.lengths().session_length(),
            phase: countdown.phase(),
            label: countdown.phase().label().to_string(),
            time_left: format_time(countdown.minutes(), countdown.seconds()),
            minutes: countdown.minutes(),
            seconds: countdown.seconds(),
            running: countdown.is_running(),
            alert: countdown.is_alert(),
            status: clock.status().as_str().to_string(),
        }
    }
}
