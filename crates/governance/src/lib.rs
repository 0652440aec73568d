//! # Cosign Governance
//!
//! Approval engine for a shared custodial account controlled by a fixed set
//! of owners. Every state-changing action is proposed, collects approvals
//! from distinct owners inside a voting window, and takes effect in the same
//! call that casts the deciding vote.
//!
//! ## Proposal kinds
//! - Transaction: forward value and call data to a destination
//! - Owner candidate: grow the owner registry (`required += 1`)
//! - Removal: shrink the owner registry (`required -= 1`)
//! - Required votes: replace the quorum
//!
//! ## Guarantees
//! - Every entry point is all-or-nothing
//! - A deciding vote whose effect fails is not recorded
//! - Quorum is compared against the *current* required votes at vote time

pub mod config;
pub mod error;
pub mod event;
pub mod kind;
pub mod kinds;
pub mod proposal;
pub mod quorum;
pub mod registry;
pub mod shared;
pub mod snapshot;
pub mod state;
pub mod wallet;
pub mod window;

pub use config::{ConfigError, WalletConfig};
pub use error::{ConfigFault, ErrorCategory, GovernanceError};
pub use event::{EventRecord, GovernanceEvent};
pub use kind::ProposalKind;
pub use kinds::{
    AppliedEffect, CandidatePayload, Payload, RemovalPayload, RequiredVotesPayload,
    TransactionPayload,
};
pub use proposal::{Proposal, ProposalBook, ProposalId, ProposalStatus, VoteOutcome};
pub use quorum::QuorumPolicy;
pub use registry::OwnerRegistry;
pub use shared::SharedWallet;
pub use snapshot::WalletSnapshot;
pub use state::GovernanceState;
pub use wallet::Wallet;
pub use window::VotingWindow;
