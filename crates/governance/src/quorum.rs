//! Quorum policy - the required approval count

use serde::{Deserialize, Serialize};

/// Required approvals `r` for a proposal to take effect.
///
/// Explicit changes must satisfy `floor(n/2) < r < n` for `n` owners.
/// Registry changes move `r` by one in either direction without checking the
/// bound again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuorumPolicy {
    required: u32,
}

impl QuorumPolicy {
    /// Build a policy for `owner_count` owners, `None` if `required` is out of bounds
    pub fn new(required: u32, owner_count: usize) -> Option<Self> {
        Self::is_valid(required, owner_count).then_some(Self { required })
    }

    /// Strict majority, and strictly fewer than all owners
    pub fn is_valid(required: u32, owner_count: usize) -> bool {
        let required = required as usize;
        owner_count / 2 < required && required < owner_count
    }

    /// Restore a policy without bound checks
    pub(crate) fn from_raw(required: u32) -> Self {
        Self { required }
    }

    pub fn required(&self) -> u32 {
        self.required
    }

    /// Whether `approvals` exactly meets the current requirement
    pub fn is_reached(&self, approvals: u32) -> bool {
        approvals == self.required
    }

    pub(crate) fn increment(&mut self) {
        self.required = self.required.saturating_add(1);
    }

    pub(crate) fn decrement(&mut self) {
        self.required = self.required.saturating_sub(1);
    }

    pub(crate) fn replace(&mut self, required: u32) {
        self.required = required;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        // n = 6: 3 < r < 6
        assert!(!QuorumPolicy::is_valid(3, 6));
        assert!(QuorumPolicy::is_valid(4, 6));
        assert!(QuorumPolicy::is_valid(5, 6));
        assert!(!QuorumPolicy::is_valid(6, 6));
        assert!(!QuorumPolicy::is_valid(7, 6));

        // n = 3: only r = 2
        assert!(QuorumPolicy::is_valid(2, 3));
        assert!(!QuorumPolicy::is_valid(1, 3));

        // n = 1 and n = 2 admit no valid r
        assert!((0..4).all(|r| !QuorumPolicy::is_valid(r, 1)));
        assert!((0..4).all(|r| !QuorumPolicy::is_valid(r, 2)));
    }

    #[test]
    fn test_new() {
        assert_eq!(QuorumPolicy::new(4, 6).map(|q| q.required()), Some(4));
        assert!(QuorumPolicy::new(1, 4).is_none());
    }

    #[test]
    fn test_adjustments_skip_validation() {
        let mut quorum = QuorumPolicy::new(2, 3).unwrap();
        quorum.decrement();
        quorum.decrement();
        quorum.decrement();
        assert_eq!(quorum.required(), 0);

        quorum.increment();
        assert_eq!(quorum.required(), 1);

        quorum.replace(9);
        assert!(quorum.is_reached(9));
        assert!(!quorum.is_reached(10));
    }
}
