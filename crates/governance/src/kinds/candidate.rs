use super::{AppliedEffect, Payload};
use crate::error::GovernanceError;
use crate::kind::ProposalKind;
use crate::state::GovernanceState;
use cosign_core::Address;
use cosign_host::Executor;
use serde::{Deserialize, Serialize};

/// Elect `candidate` as a new owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatePayload {
    pub candidate: Address,
}

impl Payload for CandidatePayload {
    const KIND: ProposalKind = ProposalKind::Candidate;

    fn validate(&self, state: &GovernanceState) -> Result<(), GovernanceError> {
        if self.candidate.is_zero() {
            return Err(GovernanceError::InvalidAddress);
        }
        if state.is_owner(&self.candidate) {
            return Err(GovernanceError::AlreadyOwner);
        }
        if state.is_pending_candidate(&self.candidate) {
            return Err(GovernanceError::AlreadyCandidate);
        }
        Ok(())
    }

    fn reserve(&self, state: &mut GovernanceState) {
        state.pending_candidates.insert(self.candidate);
    }

    fn apply(
        &self,
        state: &mut GovernanceState,
        _host: &mut dyn Executor,
        _account: &Address,
    ) -> Result<AppliedEffect, GovernanceError> {
        state.registry.add(self.candidate)?;
        state.quorum.increment();
        state.pending_candidates.remove(&self.candidate);

        Ok(AppliedEffect::OwnerAdded {
            owner: self.candidate,
            required_votes: state.quorum.required(),
        })
    }
}
