//! Executor - value transfer and call forwarding

use crate::error::HostError;
use cosign_core::{Address, Amount, CallData};

/// The host ledger's external-call primitive.
///
/// # Contract
/// `call` is all-or-nothing: on `Err` no balance and no hosted contract state
/// has changed. The governance engine relies on this to keep a failed
/// deciding vote from leaving partial effects behind.
pub trait Executor: Send {
    /// Current balance of an account
    fn balance_of(&self, account: &Address) -> Amount;

    /// Move `value` from `from` to `to` and deliver `data` to `to`.
    ///
    /// With empty data and a destination that hosts no contract this is a
    /// plain transfer.
    fn call(
        &mut self,
        from: &Address,
        to: &Address,
        value: Amount,
        data: &CallData,
    ) -> Result<(), HostError>;
}
