//! Voting window - `[start, end)` interval on the ledger clock

use crate::error::GovernanceError;
use cosign_core::Timestamp;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl VotingWindow {
    /// Open a window of `duration` seconds starting at `now`
    pub fn open(now: Timestamp, duration: u64) -> Result<Self, GovernanceError> {
        if duration == 0 {
            return Err(GovernanceError::InvalidDuration);
        }
        Ok(Self {
            start: now,
            end: now.saturating_add(duration),
        })
    }

    /// Votes are accepted while `now < end`
    pub fn is_open(&self, now: Timestamp) -> bool {
        now < self.end
    }

    pub fn ensure_open(&self, now: Timestamp) -> Result<(), GovernanceError> {
        if self.is_open(now) {
            Ok(())
        } else {
            Err(GovernanceError::WindowClosed)
        }
    }

    pub fn duration(&self) -> u64 {
        self.start.secs_until(self.end)
    }

    /// Seconds left, zero once closed
    pub fn remaining(&self, now: Timestamp) -> u64 {
        now.secs_until(self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_duration_rejected() {
        assert_eq!(
            VotingWindow::open(Timestamp::from_secs(10), 0),
            Err(GovernanceError::InvalidDuration)
        );
    }

    #[test]
    fn test_window_boundaries() {
        let window = VotingWindow::open(Timestamp::from_secs(1_000), 300).unwrap();
        assert_eq!(window.end, Timestamp::from_secs(1_300));
        assert_eq!(window.duration(), 300);

        assert!(window.is_open(Timestamp::from_secs(1_000)));
        assert!(window.is_open(Timestamp::from_secs(1_299)));
        assert!(!window.is_open(Timestamp::from_secs(1_300)));
        assert_eq!(
            window.ensure_open(Timestamp::from_secs(5_000)),
            Err(GovernanceError::WindowClosed)
        );
    }

    #[test]
    fn test_remaining() {
        let window = VotingWindow::open(Timestamp::from_secs(0), 60).unwrap();
        assert_eq!(window.remaining(Timestamp::from_secs(20)), 40);
        assert_eq!(window.remaining(Timestamp::from_secs(90)), 0);
    }
}
