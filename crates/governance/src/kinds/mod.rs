//! The four proposal kinds
//!
//! Each kind is a payload type implementing `Payload`: the creation-time
//! preconditions and the effect applied when quorum is reached. Vote
//! bookkeeping is shared and lives in `ProposalBook`.

mod candidate;
mod removal;
mod required_votes;
mod transaction;

pub use candidate::CandidatePayload;
pub use removal::RemovalPayload;
pub use required_votes::RequiredVotesPayload;
pub use transaction::TransactionPayload;

use crate::error::GovernanceError;
use crate::kind::ProposalKind;
use crate::state::GovernanceState;
use cosign_core::{Address, Amount};
use cosign_host::Executor;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a successful effect did
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum AppliedEffect {
    Executed { to: Address, value: Amount },
    OwnerAdded { owner: Address, required_votes: u32 },
    OwnerRemoved { owner: Address, required_votes: u32 },
    RequiredVotesChanged { previous: u32, current: u32 },
}

/// Kind-specific part of a proposal
pub trait Payload: Clone + fmt::Debug + Serialize + DeserializeOwned + Send {
    const KIND: ProposalKind;

    /// Preconditions checked when the proposal is created
    fn validate(&self, state: &GovernanceState) -> Result<(), GovernanceError>;

    /// Mark whatever the open proposal reserves (e.g. a pending candidacy)
    fn reserve(&self, _state: &mut GovernanceState) {}

    /// Apply the effect.
    ///
    /// `state` is a staged copy. On `Err` it is thrown away, and `host` must
    /// not have changed (the executor contract guarantees this for calls).
    fn apply(
        &self,
        state: &mut GovernanceState,
        host: &mut dyn Executor,
        account: &Address,
    ) -> Result<AppliedEffect, GovernanceError>;
}
