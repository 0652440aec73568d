//! Cosign Host - The ledger the wallet lives on
//!
//! The governance engine never moves value or calls other accounts itself.
//! It goes through two seams defined here:
//! - `Clock`: the single accessor for ledger time
//! - `Executor`: value transfer and call forwarding, all-or-nothing per call
//!
//! `InMemoryLedger` is a complete executor with account balances and hosted
//! contracts, used by tests and by the CLI.

pub mod clock;
pub mod contract;
pub mod error;
pub mod executor;
pub mod ledger;

pub use clock::{Clock, ManualClock, SystemClock};
pub use contract::{CallContext, Contract, Counter, CounterCall, Reverter, Token, TokenCall};
pub use error::HostError;
pub use executor::Executor;
pub use ledger::InMemoryLedger;
