//! Proposal kinds and their user-visible reason strings

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// The four governed actions
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, EnumIter, Display,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProposalKind {
    Transaction,
    Candidate,
    Removal,
    RequiredVotes,
}

impl ProposalKind {
    /// Reason when the id is out of range
    pub fn not_found_reason(&self) -> &'static str {
        match self {
            ProposalKind::Transaction => "Tx does not exists",
            ProposalKind::Candidate => "Candidate does not exists",
            ProposalKind::Removal => "Removal proposal does not exists",
            ProposalKind::RequiredVotes => "New required votes proposal does not exists",
        }
    }

    /// Reason when the caller already approved
    pub fn already_approved_reason(&self) -> &'static str {
        match self {
            ProposalKind::Transaction => "Tx already approved",
            ProposalKind::Candidate => "Candidate already approved",
            ProposalKind::Removal => "Removal proposal already approved",
            ProposalKind::RequiredVotes => "New required votes proposal already approved",
        }
    }

    /// Reason when the effect was already applied
    pub fn already_applied_reason(&self) -> &'static str {
        match self {
            ProposalKind::Transaction => "Tx already executed",
            ProposalKind::Candidate => "Candidate already elected",
            ProposalKind::Removal => "Owner already removed",
            ProposalKind::RequiredVotes => "Required votes proposal already changed",
        }
    }

    /// Reason when revoking without a prior approval
    pub fn not_approved_reason(&self) -> &'static str {
        match self {
            ProposalKind::Transaction => "Tx not approved",
            ProposalKind::Candidate => "Candidate not approved",
            ProposalKind::Removal => "Ownership removal not approved",
            ProposalKind::RequiredVotes => "New required votes proposal not approved",
        }
    }
}
