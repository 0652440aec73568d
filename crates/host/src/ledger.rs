//! In-memory host ledger

use crate::contract::{CallContext, Contract};
use crate::error::HostError;
use crate::executor::Executor;
use cosign_core::{Address, Amount, CallData};
use std::collections::HashMap;

/// Account balances plus contracts hosted at addresses.
///
/// `call` debits the sender, credits the destination, then runs the
/// destination's contract (if any). A contract revert restores both balances.
#[derive(Default)]
pub struct InMemoryLedger {
    balances: HashMap<Address, Amount>,
    contracts: HashMap<Address, Box<dyn Contract>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint `amount` into an account
    pub fn fund(&mut self, account: Address, amount: Amount) -> Result<(), HostError> {
        let credited = self
            .balance_of(&account)
            .checked_add(&amount)
            .ok_or(HostError::Overflow(account))?;
        self.balances.insert(account, credited);
        Ok(())
    }

    /// Overwrite an account balance (used when restoring persisted state)
    pub fn set_balance(&mut self, account: Address, amount: Amount) {
        self.balances.insert(account, amount);
    }

    /// All non-zero balances, sorted by address
    pub fn balances(&self) -> Vec<(Address, Amount)> {
        let mut all: Vec<_> = self
            .balances
            .iter()
            .filter(|(_, amount)| !amount.is_zero())
            .map(|(account, amount)| (*account, *amount))
            .collect();
        all.sort_by_key(|(account, _)| *account);
        all
    }

    /// Host a contract at `address`, replacing whatever was there
    pub fn deploy(&mut self, address: Address, contract: impl Contract) {
        tracing::debug!(address = %address, contract = contract.name(), "Contract deployed");
        self.contracts.insert(address, Box::new(contract));
    }

    pub fn contract<T: Contract>(&self, address: &Address) -> Option<&T> {
        self.contracts
            .get(address)
            .and_then(|c| c.as_any().downcast_ref::<T>())
    }

    pub fn contract_mut<T: Contract>(&mut self, address: &Address) -> Option<&mut T> {
        self.contracts
            .get_mut(address)
            .and_then(|c| c.as_any_mut().downcast_mut::<T>())
    }

    fn move_value(&mut self, from: &Address, to: &Address, value: Amount) -> Result<(), HostError> {
        let available = self.balance_of(from);
        let debited = available
            .checked_sub(&value)
            .ok_or(HostError::InsufficientBalance {
                account: *from,
                needed: value,
                available,
            })?;

        if from == to {
            return Ok(());
        }

        let credited = self
            .balance_of(to)
            .checked_add(&value)
            .ok_or(HostError::Overflow(*to))?;

        self.balances.insert(*from, debited);
        self.balances.insert(*to, credited);
        Ok(())
    }
}

impl Executor for InMemoryLedger {
    fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or_default()
    }

    fn call(
        &mut self,
        from: &Address,
        to: &Address,
        value: Amount,
        data: &CallData,
    ) -> Result<(), HostError> {
        let from_before = self.balance_of(from);
        let to_before = self.balance_of(to);

        self.move_value(from, to, value)?;

        let Some(contract) = self.contracts.get_mut(to) else {
            tracing::debug!(from = %from, to = %to, value = %value, "Value transferred");
            return Ok(());
        };

        let ctx = CallContext {
            caller: *from,
            value,
        };

        match contract.on_call(&ctx, data) {
            Ok(()) => {
                tracing::debug!(
                    from = %from,
                    to = %to,
                    contract = contract.name(),
                    value = %value,
                    "Contract call succeeded"
                );
                Ok(())
            }
            Err(e) => {
                tracing::debug!(to = %to, error = %e, "Contract call reverted, restoring balances");
                self.balances.insert(*from, from_before);
                self.balances.insert(*to, to_before);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{Counter, Reverter, Token};

    fn addr(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    #[test]
    fn test_plain_transfer() {
        let mut ledger = InMemoryLedger::new();
        ledger.fund(addr(1), Amount::units(10)).unwrap();

        ledger
            .call(&addr(1), &addr(2), Amount::units(4), &CallData::empty())
            .unwrap();

        assert_eq!(ledger.balance_of(&addr(1)), Amount::units(6));
        assert_eq!(ledger.balance_of(&addr(2)), Amount::units(4));
    }

    #[test]
    fn test_insufficient_balance() {
        let mut ledger = InMemoryLedger::new();
        ledger.fund(addr(1), Amount::units(1)).unwrap();

        let result = ledger.call(&addr(1), &addr(2), Amount::units(2), &CallData::empty());

        assert!(matches!(result, Err(HostError::InsufficientBalance { .. })));
        assert_eq!(ledger.balance_of(&addr(1)), Amount::units(1));
        assert_eq!(ledger.balance_of(&addr(2)), Amount::ZERO);
    }

    #[test]
    fn test_contract_call_sets_counter() {
        let mut ledger = InMemoryLedger::new();
        ledger.deploy(addr(9), Counter::new());

        ledger
            .call(&addr(1), &addr(9), Amount::ZERO, &Counter::set_call(123))
            .unwrap();

        assert_eq!(ledger.contract::<Counter>(&addr(9)).unwrap().value(), 123);
    }

    #[test]
    fn test_revert_restores_balances() {
        let mut ledger = InMemoryLedger::new();
        ledger.fund(addr(1), Amount::units(5)).unwrap();
        ledger.deploy(addr(9), Reverter::armed());

        let result = ledger.call(&addr(1), &addr(9), Amount::units(5), &CallData::empty());

        assert!(matches!(result, Err(HostError::Reverted(_))));
        assert_eq!(ledger.balance_of(&addr(1)), Amount::units(5));
        assert_eq!(ledger.balance_of(&addr(9)), Amount::ZERO);
    }

    #[test]
    fn test_token_call_uses_caller_as_sender() {
        let mut ledger = InMemoryLedger::new();
        let mut token = Token::new("TT");
        token.set_balance(addr(1), Amount::units(100));
        ledger.deploy(addr(7), token);

        let data = Token::transfer_call(addr(3), Amount::units(100));
        ledger.call(&addr(1), &addr(7), Amount::ZERO, &data).unwrap();

        let token = ledger.contract::<Token>(&addr(7)).unwrap();
        assert_eq!(token.balance_of(&addr(1)), Amount::ZERO);
        assert_eq!(token.balance_of(&addr(3)), Amount::units(100));
    }

    #[test]
    fn test_contract_downcast_wrong_type() {
        let mut ledger = InMemoryLedger::new();
        ledger.deploy(addr(9), Counter::new());
        assert!(ledger.contract::<Token>(&addr(9)).is_none());
        assert!(ledger.contract_mut::<Counter>(&addr(9)).is_some());
    }

    #[test]
    fn test_balances_listing_skips_zero() {
        let mut ledger = InMemoryLedger::new();
        ledger.fund(addr(2), Amount::units(3)).unwrap();
        ledger.set_balance(addr(1), Amount::ZERO);
        assert_eq!(ledger.balances(), vec![(addr(2), Amount::units(3))]);
    }
}
