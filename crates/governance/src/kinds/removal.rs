use super::{AppliedEffect, Payload};
use crate::error::GovernanceError;
use crate::kind::ProposalKind;
use crate::state::GovernanceState;
use cosign_core::Address;
use cosign_host::Executor;
use serde::{Deserialize, Serialize};

/// Remove `target` from the owners
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalPayload {
    pub target: Address,
}

impl Payload for RemovalPayload {
    const KIND: ProposalKind = ProposalKind::Removal;

    fn validate(&self, state: &GovernanceState) -> Result<(), GovernanceError> {
        if !state.is_owner(&self.target) {
            return Err(GovernanceError::NotAnOwner);
        }
        if state.is_pending_removal(&self.target) {
            return Err(GovernanceError::AlreadyRemovalCandidate);
        }
        Ok(())
    }

    fn reserve(&self, state: &mut GovernanceState) {
        state.pending_removals.insert(self.target);
    }

    fn apply(
        &self,
        state: &mut GovernanceState,
        _host: &mut dyn Executor,
        _account: &Address,
    ) -> Result<AppliedEffect, GovernanceError> {
        state.registry.remove(&self.target)?;
        // May leave required votes outside floor(n/2) < r < n
        state.quorum.decrement();
        state.pending_removals.remove(&self.target);

        Ok(AppliedEffect::OwnerRemoved {
            owner: self.target,
            required_votes: state.quorum.required(),
        })
    }
}
