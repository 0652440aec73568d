//! Wallet configuration loaded from TOML
//!
//! ```toml
//! account = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"
//! owners = [
//!     "0x0101010101010101010101010101010101010101",
//!     "0x0202020202020202020202020202020202020202",
//!     "0x0303030303030303030303030303030303030303",
//! ]
//! required_votes = 2
//! default_window_secs = 600
//! ```

use crate::error::GovernanceError;
use crate::state::GovernanceState;
use crate::wallet::DEFAULT_WINDOW_SECS;
use cosign_core::Address;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid wallet config: {0}")]
    Invalid(#[from] GovernanceError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Account holding the wallet's funds on the host ledger
    pub account: Address,

    pub owners: Vec<Address>,

    pub required_votes: u32,

    /// Voting window used when a command does not pass one
    #[serde(default = "default_window_secs")]
    pub default_window_secs: u64,
}

fn default_window_secs() -> u64 {
    DEFAULT_WINDOW_SECS
}

impl WalletConfig {
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    pub fn load_str(content: &str) -> Result<Self, ConfigError> {
        let config: WalletConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Same rules as wallet construction, plus a usable account and window
    pub fn validate(&self) -> Result<(), GovernanceError> {
        if self.account.is_zero() {
            return Err(GovernanceError::InvalidAddress);
        }
        if self.default_window_secs == 0 {
            return Err(GovernanceError::InvalidDuration);
        }
        GovernanceState::new(self.owners.clone(), self.required_votes)?;
        Ok(())
    }
}
