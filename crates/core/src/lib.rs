//! Cosign Core - Domain types
//!
//! This crate contains the fundamental types shared by every Cosign crate:
//! - `Address`: 20-byte account identity, the null identity is `Address::ZERO`
//! - `Amount`: Non-negative decimal wrapper for value transfers
//! - `Timestamp`: Ledger clock reading in seconds
//! - `CallData`: Opaque payload forwarded to a destination account

pub mod address;
pub mod amount;
pub mod call;
pub mod error;
pub mod time;

pub use address::Address;
pub use amount::Amount;
pub use call::CallData;
pub use error::CoreError;
pub use time::Timestamp;
