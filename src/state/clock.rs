//! The session/break timer state machine
//!
//! `Clock` owns the configured lengths and the countdown, and is the only
//! place either of them changes. It performs no I/O: the tick task and the
//! alert player react to the values it returns.

use super::{Countdown, Lengths, Phase, TickOutcome};

/// Externally visible state of the tick driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockStatus {
    Idle,
    Running,
    AlertFired,
}

impl ClockStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ClockStatus::Idle => "idle",
            ClockStatus::Running => "running",
            ClockStatus::AlertFired => "alert",
        }
    }
}

/// What the start/pause toggle did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// Resumed from the remaining time
    Started,
    /// Stopped with the remaining time preserved
    Paused,
    /// Acknowledged the alert and began the given phase
    Advanced(Phase),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clock {
    lengths: Lengths,
    countdown: Countdown,
}

impl Clock {
    /// Create a clock with default lengths, showing the full session
    pub fn new() -> Self {
        let lengths = Lengths::new();
        Self {
            countdown: Countdown::new(Phase::Session, lengths.session_length()),
            lengths,
        }
    }

    pub fn lengths(&self) -> &Lengths {
        &self.lengths
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn status(&self) -> ClockStatus {
        if self.countdown.is_alert() {
            ClockStatus::AlertFired
        } else if self.countdown.is_running() {
            ClockStatus::Running
        } else {
            ClockStatus::Idle
        }
    }

    /// Lengths are frozen while the countdown runs
    fn lengths_locked(&self) -> bool {
        self.countdown.is_running()
    }

    pub fn increment_break(&mut self) -> bool {
        !self.lengths_locked() && self.lengths.increment_break()
    }

    pub fn decrement_break(&mut self) -> bool {
        !self.lengths_locked() && self.lengths.decrement_break()
    }

    pub fn increment_session(&mut self) -> bool {
        let changed = !self.lengths_locked() && self.lengths.increment_session();
        if changed {
            self.resync_session();
        }
        changed
    }

    pub fn decrement_session(&mut self) -> bool {
        let changed = !self.lengths_locked() && self.lengths.decrement_session();
        if changed {
            self.resync_session();
        }
        changed
    }

    /// Show the new session length, unless a break or an alert is on screen
    fn resync_session(&mut self) {
        if self.countdown.phase() == Phase::Session && !self.countdown.is_alert() {
            self.countdown.reseed(self.lengths.session_length());
        }
    }

    fn length_of(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Session => self.lengths.session_length(),
            Phase::Break => self.lengths.break_length(),
        }
    }

    /// The single start/pause control
    pub fn toggle(&mut self) -> Toggle {
        if self.countdown.is_alert() {
            let next = self.countdown.phase().next();
            self.countdown.advance(self.length_of(next));
            self.countdown.resume();
            Toggle::Advanced(next)
        } else if self.countdown.is_running() {
            self.countdown.pause();
            Toggle::Paused
        } else {
            self.countdown.resume();
            Toggle::Started
        }
    }

    /// Stop counting down without acknowledging a pending alert
    pub fn pause(&mut self) {
        self.countdown.pause();
    }

    pub fn tick(&mut self) -> TickOutcome {
        self.countdown.tick()
    }

    /// Restore default lengths and an idle full session
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
