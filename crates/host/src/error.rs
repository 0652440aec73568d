//! Host ledger errors

use cosign_core::{Address, Amount};
use thiserror::Error;

/// Failure reported by the host ledger for a transfer or call.
///
/// Every variant means the call had no effect.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("Insufficient balance for {account}: need {needed}, available {available}")]
    InsufficientBalance {
        account: Address,
        needed: Amount,
        available: Amount,
    },

    #[error("Call reverted: {0}")]
    Reverted(String),

    #[error("Invalid call data: {0}")]
    InvalidCallData(String),

    #[error("Balance overflow for {0}")]
    Overflow(Address),
}
