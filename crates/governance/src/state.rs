//! Governance state - everything a proposal effect may touch

use crate::error::{ConfigFault, GovernanceError};
use crate::quorum::QuorumPolicy;
use crate::registry::OwnerRegistry;
use cosign_core::Address;
use std::collections::HashSet;

/// Owner registry, quorum and the open candidacy/removal markers.
///
/// Effects run against a clone of this struct; the clone replaces the live
/// state only when the effect succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GovernanceState {
    pub(crate) registry: OwnerRegistry,
    pub(crate) quorum: QuorumPolicy,
    pub(crate) pending_candidates: HashSet<Address>,
    pub(crate) pending_removals: HashSet<Address>,
}

impl GovernanceState {
    /// Validate and build the initial state.
    ///
    /// This is the only place owners and required votes are set without a
    /// proposal.
    pub fn new(owners: Vec<Address>, required_votes: u32) -> Result<Self, GovernanceError> {
        let registry = OwnerRegistry::new(owners)?;
        let quorum = QuorumPolicy::new(required_votes, registry.len())
            .ok_or(ConfigFault::InvalidRequiredVotes)?;

        Ok(Self::from_parts(registry, quorum))
    }

    pub(crate) fn from_parts(registry: OwnerRegistry, quorum: QuorumPolicy) -> Self {
        Self {
            registry,
            quorum,
            pending_candidates: HashSet::new(),
            pending_removals: HashSet::new(),
        }
    }

    pub fn registry(&self) -> &OwnerRegistry {
        &self.registry
    }

    pub fn quorum(&self) -> &QuorumPolicy {
        &self.quorum
    }

    pub fn is_owner(&self, address: &Address) -> bool {
        self.registry.is_owner(address)
    }

    pub fn required_votes(&self) -> u32 {
        self.quorum.required()
    }

    pub fn is_pending_candidate(&self, address: &Address) -> bool {
        self.pending_candidates.contains(address)
    }

    pub fn is_pending_removal(&self, address: &Address) -> bool {
        self.pending_removals.contains(address)
    }

    /// Whether `floor(n/2) < r < n` holds for the current registry
    pub fn quorum_within_bounds(&self) -> bool {
        QuorumPolicy::is_valid(self.quorum.required(), self.registry.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owners(n: u8) -> Vec<Address> {
        (1..=n).map(Address::repeat_byte).collect()
    }

    #[test]
    fn test_valid_construction() {
        let state = GovernanceState::new(owners(6), 4).unwrap();
        assert_eq!(state.registry().len(), 6);
        assert_eq!(state.required_votes(), 4);
        assert!(state.quorum_within_bounds());
    }

    #[test]
    fn test_construction_rejections() {
        assert_eq!(
            GovernanceState::new(vec![], 4),
            Err(GovernanceError::InvalidConfig(ConfigFault::NoOwners))
        );
        assert_eq!(
            GovernanceState::new(owners(6), 7),
            Err(GovernanceError::InvalidConfig(ConfigFault::InvalidRequiredVotes))
        );
        assert_eq!(
            GovernanceState::new(owners(4), 1),
            Err(GovernanceError::InvalidConfig(ConfigFault::InvalidRequiredVotes))
        );
        assert_eq!(
            GovernanceState::new(vec![Address::ZERO, Address::repeat_byte(2)], 1)
                .unwrap_err()
                .reason(),
            "Invalid address"
        );
    }
}
