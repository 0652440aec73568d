//! Governance errors
//!
//! `Display` renders the short reason string callers see when a call is
//! rejected. These strings are part of the observable contract.

use crate::kind::ProposalKind;
use cosign_host::HostError;
use thiserror::Error;

/// Why a wallet configuration (or restored snapshot) was refused
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFault {
    #[error("Owners required")]
    NoOwners,

    #[error("Invalid address")]
    NullOwner,

    #[error("Owner is not unique")]
    DuplicateOwner,

    #[error("Invalid number of required votes")]
    InvalidRequiredVotes,

    #[error("Proposal ids out of order")]
    ProposalOutOfOrder,
}

/// Error taxonomy class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Authorization,
    NotFound,
    StateConflict,
    Validation,
    Temporal,
    Execution,
}

/// Errors from wallet entry points.
///
/// Any error aborts the whole call; no state has changed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GovernanceError {
    // === Authorization ===
    #[error("Not owner")]
    NotOwner,

    // === NotFound ===
    #[error("{}", .0.not_found_reason())]
    NotFound(ProposalKind),

    // === StateConflict ===
    #[error("{}", .0.already_approved_reason())]
    AlreadyApproved(ProposalKind),

    #[error("{}", .0.already_applied_reason())]
    AlreadyTerminal(ProposalKind),

    #[error("{}", .0.not_approved_reason())]
    NotApproved(ProposalKind),

    #[error("Already an owner")]
    AlreadyOwner,

    #[error("Not an owner")]
    NotAnOwner,

    #[error("Already a candidate")]
    AlreadyCandidate,

    #[error("Already a removal candidate")]
    AlreadyRemovalCandidate,

    #[error("Already the same required votes")]
    NoChange,

    #[error("Cannot remove the last owner")]
    LastOwner,

    // === Validation ===
    #[error("{0}")]
    InvalidConfig(ConfigFault),

    #[error("Invalid address")]
    InvalidAddress,

    #[error("Zero time duration")]
    InvalidDuration,

    #[error("Invalid number of required votes")]
    InvalidQuorum,

    // === Temporal ===
    #[error("Time up!")]
    WindowClosed,

    // === Execution ===
    #[error("Tx failed")]
    ExecutionFailed(#[source] HostError),
}

impl GovernanceError {
    /// Short human-readable reason, identical to `Display`
    pub fn reason(&self) -> String {
        self.to_string()
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            GovernanceError::NotOwner => ErrorCategory::Authorization,
            GovernanceError::NotFound(_) => ErrorCategory::NotFound,
            GovernanceError::AlreadyApproved(_)
            | GovernanceError::AlreadyTerminal(_)
            | GovernanceError::NotApproved(_)
            | GovernanceError::AlreadyOwner
            | GovernanceError::NotAnOwner
            | GovernanceError::AlreadyCandidate
            | GovernanceError::AlreadyRemovalCandidate
            | GovernanceError::NoChange
            | GovernanceError::LastOwner => ErrorCategory::StateConflict,
            GovernanceError::InvalidConfig(_)
            | GovernanceError::InvalidAddress
            | GovernanceError::InvalidDuration
            | GovernanceError::InvalidQuorum => ErrorCategory::Validation,
            GovernanceError::WindowClosed => ErrorCategory::Temporal,
            GovernanceError::ExecutionFailed(_) => ErrorCategory::Execution,
        }
    }
}

impl From<ConfigFault> for GovernanceError {
    fn from(fault: ConfigFault) -> Self {
        GovernanceError::InvalidConfig(fault)
    }
}
