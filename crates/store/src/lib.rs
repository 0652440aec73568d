//! # Cosign Store
//!
//! SQLite persistence for a wallet: the owner registry, required votes, the
//! four proposal stores with their approvers, host balances and the
//! governance event log.

pub mod error;
pub mod store;

pub use error::StoreError;
pub use store::WalletStore;
