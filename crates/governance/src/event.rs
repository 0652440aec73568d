//! Governance events
//!
//! The wallet appends one record per observable action. Events are stamped
//! with ledger time and can be drained by a persistence layer.

use crate::kind::ProposalKind;
use crate::proposal::ProposalId;
use cosign_core::{Address, Amount, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GovernanceEvent {
    Deposited {
        from: Address,
        amount: Amount,
    },
    ProposalCreated {
        kind: ProposalKind,
        id: ProposalId,
        proposer: Address,
        ends_at: Timestamp,
    },
    VoteCast {
        kind: ProposalKind,
        id: ProposalId,
        voter: Address,
        approvals: u32,
    },
    VoteRevoked {
        kind: ProposalKind,
        id: ProposalId,
        voter: Address,
        approvals: u32,
    },
    TransactionExecuted {
        id: ProposalId,
        to: Address,
        value: Amount,
    },
    OwnerAdded {
        id: ProposalId,
        owner: Address,
        required_votes: u32,
    },
    OwnerRemoved {
        id: ProposalId,
        owner: Address,
        required_votes: u32,
    },
    RequiredVotesChanged {
        id: ProposalId,
        previous: u32,
        current: u32,
    },
}

impl GovernanceEvent {
    /// Short stable name, used as the storage tag
    pub fn name(&self) -> &'static str {
        match self {
            Self::Deposited { .. } => "deposited",
            Self::ProposalCreated { .. } => "proposal_created",
            Self::VoteCast { .. } => "vote_cast",
            Self::VoteRevoked { .. } => "vote_revoked",
            Self::TransactionExecuted { .. } => "transaction_executed",
            Self::OwnerAdded { .. } => "owner_added",
            Self::OwnerRemoved { .. } => "owner_removed",
            Self::RequiredVotesChanged { .. } => "required_votes_changed",
        }
    }
}

/// An event with the ledger time it happened at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub at: Timestamp,
    #[serde(flatten)]
    pub event: GovernanceEvent,
}
