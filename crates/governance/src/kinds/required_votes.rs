use super::{AppliedEffect, Payload};
use crate::error::GovernanceError;
use crate::kind::ProposalKind;
use crate::quorum::QuorumPolicy;
use crate::state::GovernanceState;
use cosign_core::Address;
use cosign_host::Executor;
use serde::{Deserialize, Serialize};

/// Replace the required votes with `new_required`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredVotesPayload {
    pub new_required: u32,
}

impl Payload for RequiredVotesPayload {
    const KIND: ProposalKind = ProposalKind::RequiredVotes;

    fn validate(&self, state: &GovernanceState) -> Result<(), GovernanceError> {
        if self.new_required == state.required_votes() {
            return Err(GovernanceError::NoChange);
        }
        if !QuorumPolicy::is_valid(self.new_required, state.registry().len()) {
            return Err(GovernanceError::InvalidQuorum);
        }
        Ok(())
    }

    // Bounds were checked against the owner count at creation time only
    fn apply(
        &self,
        state: &mut GovernanceState,
        _host: &mut dyn Executor,
        _account: &Address,
    ) -> Result<AppliedEffect, GovernanceError> {
        let previous = state.quorum.required();
        state.quorum.replace(self.new_required);

        Ok(AppliedEffect::RequiredVotesChanged {
            previous,
            current: self.new_required,
        })
    }
}
