//! Serialized access to one wallet
//!
//! A single mutex guards every entry point, so each call runs to completion
//! before the next one observes the state.

use crate::wallet::Wallet;
use cosign_host::{Clock, Executor};
use std::sync::{Arc, Mutex, MutexGuard};

/// Cloneable handle; clones share the same engine
pub struct SharedWallet<C: Clock, E: Executor> {
    inner: Arc<Mutex<Wallet<C, E>>>,
}

impl<C: Clock, E: Executor> Clone for SharedWallet<C, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: Clock, E: Executor> SharedWallet<C, E> {
    pub fn new(wallet: Wallet<C, E>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(wallet)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Wallet<C, E>> {
        // A panic inside a call cannot leave a half-applied state: every
        // entry point commits only after all fallible steps succeeded.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run `f` with exclusive access to the wallet
    pub fn with<R>(&self, f: impl FnOnce(&mut Wallet<C, E>) -> R) -> R {
        let mut guard = self.lock();
        f(&mut guard)
    }

    /// Unwrap the wallet if this is the last handle
    pub fn try_into_inner(self) -> Result<Wallet<C, E>, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(mutex) => Ok(mutex.into_inner().unwrap_or_else(|p| p.into_inner())),
            Err(inner) => Err(Self { inner }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosign_core::{Address, Amount, CallData, Timestamp};
    use cosign_host::{InMemoryLedger, ManualClock};
    use std::thread;

    #[test]
    fn test_concurrent_votes_apply_once() {
        let account = Address::repeat_byte(0xaa);
        let owners: Vec<Address> = (1..=6).map(Address::repeat_byte).collect();
        let mut ledger = InMemoryLedger::new();
        ledger.fund(account, Amount::units(1)).unwrap();

        let wallet = Wallet::new(
            account,
            owners.clone(),
            4,
            ManualClock::new(Timestamp::from_secs(10)),
            ledger,
        )
        .unwrap();
        let shared = SharedWallet::new(wallet);

        let target = Address::repeat_byte(0x42);
        let id = shared
            .with(|w| {
                w.submit_transaction(owners[0], target, Amount::units(1), CallData::empty(), 300)
            })
            .unwrap();

        let handles: Vec<_> = owners
            .iter()
            .copied()
            .map(|owner| {
                let shared = shared.clone();
                thread::spawn(move || shared.with(|w| w.confirm_transaction(owner, id)))
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let applied = results
            .iter()
            .filter(|r| r.as_ref().is_ok_and(|o| o.applied()))
            .count();
        let accepted = results.iter().filter(|r| r.is_ok()).count();

        assert_eq!(applied, 1);
        assert_eq!(accepted, 4);

        let wallet = shared.try_into_inner().ok().unwrap();
        assert_eq!(wallet.balance(), Amount::ZERO);
        assert!(wallet.transaction(id).unwrap().is_terminal());
    }
}
