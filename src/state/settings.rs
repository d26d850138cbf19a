//! Session and break length configuration

/// Shortest allowed length, in minutes
pub const MIN_LENGTH: u32 = 1;
/// Longest allowed length, in minutes
pub const MAX_LENGTH: u32 = 60;
pub const DEFAULT_BREAK_LENGTH: u32 = 5;
pub const DEFAULT_SESSION_LENGTH: u32 = 25;

/// Configured break and session lengths in minutes, always within
/// `MIN_LENGTH..=MAX_LENGTH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lengths {
    break_length: u32,
    session_length: u32,
}

impl Lengths {
    /// Create lengths with the 25/5 defaults
    pub fn new() -> Self {
        Self {
            break_length: DEFAULT_BREAK_LENGTH,
            session_length: DEFAULT_SESSION_LENGTH,
        }
    }

    pub fn break_length(&self) -> u32 {
        self.break_length
    }

    pub fn session_length(&self) -> u32 {
        self.session_length
    }

    /// Returns true if the break length changed
    pub fn increment_break(&mut self) -> bool {
        step_up(&mut self.break_length)
    }

    /// Returns true if the break length changed
    pub fn decrement_break(&mut self) -> bool {
        step_down(&mut self.break_length)
    }

    /// Returns true if the session length changed
    pub fn increment_session(&mut self) -> bool {
        step_up(&mut self.session_length)
    }

    /// Returns true if the session length changed
    pub fn decrement_session(&mut self) -> bool {
        step_down(&mut self.session_length)
    }
}

impl Default for Lengths {
    fn default() -> Self {
        Self::new()
    }
}

fn step_up(value: &mut u32) -> bool {
    if *value < MAX_LENGTH {
        *value += 1;
        true
    } else {
        false
    }
}

fn step_down(value: &mut u32) -> bool {
    if *value > MIN_LENGTH {
        *value -= 1;
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_lengths(break_length: u32, session_length: u32) -> Lengths {
        Lengths {
            break_length,
            session_length,
        }
    }

    #[test]
    fn defaults_are_five_and_twenty_five() {
        let lengths = Lengths::default();
        assert_eq!(lengths.break_length(), 5);
        assert_eq!(lengths.session_length(), 25);
    }

    #[test]
    fn increments_saturate_at_sixty() {
        for n in MIN_LENGTH..=MAX_LENGTH {
            let mut lengths = with_lengths(n, n);
            lengths.increment_break();
            lengths.increment_session();
            assert_eq!(lengths.break_length(), (n + 1).min(MAX_LENGTH));
            assert_eq!(lengths.session_length(), (n + 1).min(MAX_LENGTH));
        }
    }

    #[test]
    fn decrements_saturate_at_one() {
        for n in MIN_LENGTH..=MAX_LENGTH {
            let mut lengths = with_lengths(n, n);
            lengths.decrement_break();
            lengths.decrement_session();
            assert_eq!(lengths.break_length(), (n - 1).max(MIN_LENGTH));
            assert_eq!(lengths.session_length(), (n - 1).max(MIN_LENGTH));
        }
    }

    #[test]
    fn saturated_steps_report_no_change() {
        let mut lengths = with_lengths(MAX_LENGTH, MIN_LENGTH);
        assert!(!lengths.increment_break());
        assert!(!lengths.decrement_session());
        assert!(lengths.decrement_break());
        assert!(lengths.increment_session());
    }
}
