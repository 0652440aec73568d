//! Core errors

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur when building core domain values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Amount cannot be negative: {0}")]
    NegativeAmount(Decimal),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid call data: {0}")]
    InvalidCallData(String),
}
