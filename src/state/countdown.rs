//! Countdown state structure and the per-tick decrement

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which interval the clock is counting down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Session,
    Break,
}

impl Phase {
    /// The phase that follows this one
    pub fn next(self) -> Self {
        match self {
            Phase::Session => Phase::Break,
            Phase::Break => Phase::Session,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Session => "Session",
            Phase::Break => "Break",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of applying one tick to a countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The countdown is not running; nothing changed
    Idle,
    /// One second was taken off the remaining time
    Ticked,
    /// The countdown reached 00:00 and entered the alert state
    Expired,
}

/// Remaining time plus the phase, running and alert flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    minutes: u32,
    seconds: u32,
    phase: Phase,
    running: bool,
    alert: bool,
}

impl Countdown {
    /// Create an idle countdown seeded with `minutes:00`
    pub fn new(phase: Phase, minutes: u32) -> Self {
        Self {
            minutes,
            seconds: 0,
            phase,
            running: false,
            alert: false,
        }
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_alert(&self) -> bool {
        self.alert
    }

    /// Replace the remaining time with `minutes:00`
    pub fn reseed(&mut self, minutes: u32) {
        self.minutes = minutes;
        self.seconds = 0;
    }

    pub fn resume(&mut self) {
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Acknowledge the alert and switch to the next phase, seeded with `minutes:00`
    pub fn advance(&mut self, minutes: u32) {
        self.alert = false;
        self.phase = self.phase.next();
        self.reseed(minutes);
    }

    /// Take one second off the remaining time.
    ///
    /// Landing on 00:00 stops the countdown and raises the alert in the same
    /// step, so a zero display is never observed without the alert flag.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Idle;
        }

        if self.seconds > 0 {
            self.seconds -= 1;
        } else if self.minutes > 0 {
            self.minutes -= 1;
            self.seconds = 59;
        }

        if self.minutes == 0 && self.seconds == 0 {
            self.running = false;
            self.alert = true;
            TickOutcome::Expired
        } else {
            TickOutcome::Ticked
        }
    }
}
