//! Hosted contracts
//!
//! A contract receives the call data and value forwarded to its address.
//! Implementations must validate before mutating: returning `Err` has to
//! leave the contract exactly as it was, because the ledger only rolls back
//! balances.

use crate::error::HostError;
use cosign_core::{Address, Amount, CallData};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::HashMap;

/// What a contract sees of the incoming call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    /// Account that forwarded the call
    pub caller: Address,
    /// Value that came with the call (already credited)
    pub value: Amount,
}

/// Code living at an address on the ledger
pub trait Contract: Any + Send {
    /// Contract name for logging/debugging
    fn name(&self) -> &str;

    /// Handle a call. `Err` means the call reverted.
    fn on_call(&mut self, ctx: &CallContext, data: &CallData) -> Result<(), HostError>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

fn decode<T: serde::de::DeserializeOwned>(data: &CallData) -> Result<T, HostError> {
    data.decode()
        .map_err(|e| HostError::InvalidCallData(e.to_string()))
}

/// Calls understood by `Counter`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum CounterCall {
    Set { value: u64 },
}

/// Stores a single integer that callers can overwrite
#[derive(Debug, Clone, Default)]
pub struct Counter {
    value: u64,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    /// Call data that sets the counter
    pub fn set_call(value: u64) -> CallData {
        CallData::encode(&CounterCall::Set { value }).unwrap_or_default()
    }
}

impl Contract for Counter {
    fn name(&self) -> &str {
        "Counter"
    }

    fn on_call(&mut self, _ctx: &CallContext, data: &CallData) -> Result<(), HostError> {
        if data.is_empty() {
            return Ok(());
        }

        match decode::<CounterCall>(data)? {
            CounterCall::Set { value } => self.value = value,
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Calls understood by `Token`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum TokenCall {
    Transfer { to: Address, amount: Amount },
}

/// Fungible token with its own balance table
#[derive(Debug, Clone)]
pub struct Token {
    symbol: String,
    balances: HashMap<Address, Amount>,
}

impl Token {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            balances: HashMap::new(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn balance_of(&self, holder: &Address) -> Amount {
        self.balances.get(holder).copied().unwrap_or_default()
    }

    /// Overwrite a holder's balance
    pub fn set_balance(&mut self, holder: Address, amount: Amount) {
        self.balances.insert(holder, amount);
    }

    /// Call data that moves `amount` from the caller to `to`
    pub fn transfer_call(to: Address, amount: Amount) -> CallData {
        CallData::encode(&TokenCall::Transfer { to, amount }).unwrap_or_default()
    }

    fn transfer(&mut self, from: Address, to: Address, amount: Amount) -> Result<(), HostError> {
        let available = self.balance_of(&from);
        let debited = available
            .checked_sub(&amount)
            .ok_or(HostError::InsufficientBalance {
                account: from,
                needed: amount,
                available,
            })?;

        if from == to {
            return Ok(());
        }

        let credited = self
            .balance_of(&to)
            .checked_add(&amount)
            .ok_or(HostError::Overflow(to))?;

        self.balances.insert(from, debited);
        self.balances.insert(to, credited);
        Ok(())
    }
}

impl Contract for Token {
    fn name(&self) -> &str {
        &self.symbol
    }

    fn on_call(&mut self, ctx: &CallContext, data: &CallData) -> Result<(), HostError> {
        match decode::<TokenCall>(data)? {
            TokenCall::Transfer { to, amount } => self.transfer(ctx.caller, to, amount),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Accepts calls until armed, then reverts every call
#[derive(Debug, Clone, Default)]
pub struct Reverter {
    armed: bool,
    accepted: u64,
}

impl Reverter {
    pub fn armed() -> Self {
        Self {
            armed: true,
            accepted: 0,
        }
    }

    pub fn set_armed(&mut self, armed: bool) {
        self.armed = armed;
    }

    /// Number of calls that went through
    pub fn accepted(&self) -> u64 {
        self.accepted
    }
}

impl Contract for Reverter {
    fn name(&self) -> &str {
        "Reverter"
    }

    fn on_call(&mut self, _ctx: &CallContext, _data: &CallData) -> Result<(), HostError> {
        if self.armed {
            return Err(HostError::Reverted("reverter is armed".to_string()));
        }
        self.accepted += 1;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
