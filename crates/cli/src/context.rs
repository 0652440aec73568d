//! Application context - loads and persists the wallet

use anyhow::{bail, Context};
use cosign_core::{Address, Amount};
use cosign_governance::{Wallet, WalletConfig};
use cosign_host::{Clock, InMemoryLedger, SystemClock};
use cosign_store::WalletStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Wallet as driven from the command line
pub type CliWallet = Wallet<Arc<dyn Clock>, InMemoryLedger>;

/// Store plus the wallet restored from it
pub struct AppContext {
    store: WalletStore,
    clock: Arc<dyn Clock>,
    wallet: Option<CliWallet>,
    db_path: PathBuf,
}

impl AppContext {
    /// Open the data directory using wall-clock time
    pub fn new(data_path: impl AsRef<Path>) -> anyhow::Result<Self> {
        Self::with_clock(data_path, Arc::new(SystemClock))
    }

    pub fn with_clock(
        data_path: impl AsRef<Path>,
        clock: Arc<dyn Clock>,
    ) -> anyhow::Result<Self> {
        let data_path = data_path.as_ref();
        std::fs::create_dir_all(data_path)
            .with_context(|| format!("Failed to create data directory {}", data_path.display()))?;

        let db_path = data_path.join("wallet.db");
        let store = WalletStore::open(&db_path)?;

        let wallet = match store.load_snapshot()? {
            Some(snapshot) => {
                let mut ledger = InMemoryLedger::new();
                for (account, amount) in store.load_balances()? {
                    ledger.set_balance(account, amount);
                }
                Some(Wallet::restore(snapshot, Arc::clone(&clock), ledger)?)
            }
            None => None,
        };

        Ok(Self {
            store,
            clock,
            wallet,
            db_path,
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.wallet.is_some()
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Create the wallet and persist it
    pub fn init(&mut self, config: &WalletConfig) -> anyhow::Result<&CliWallet> {
        if self.wallet.is_some() {
            bail!("Wallet already initialized at {}", self.db_path.display());
        }

        let wallet = Wallet::from_config(config, Arc::clone(&self.clock), InMemoryLedger::new())?;
        let wallet = self.wallet.insert(wallet);

        let snapshot = wallet.snapshot();
        self.store.save_snapshot(&snapshot)?;
        Ok(&*wallet)
    }

    pub fn wallet(&self) -> anyhow::Result<&CliWallet> {
        self.wallet
            .as_ref()
            .context("Wallet not initialized, run `cosign init` first")
    }

    pub fn wallet_mut(&mut self) -> anyhow::Result<&mut CliWallet> {
        self.wallet
            .as_mut()
            .context("Wallet not initialized, run `cosign init` first")
    }

    pub fn store(&self) -> &WalletStore {
        &self.store
    }

    /// Mint into any host account (simulates value arriving from outside)
    pub fn fund(&mut self, account: Address, amount: Amount) -> anyhow::Result<()> {
        self.wallet_mut()?.executor_mut().fund(account, amount)?;
        Ok(())
    }

    /// Write wallet state, balances and new events back to the store as one commit
    pub fn persist(&mut self) -> anyhow::Result<()> {
        let Some(wallet) = self.wallet.as_mut() else {
            return Ok(());
        };

        let snapshot = wallet.snapshot();
        let balances = wallet.executor().balances();

        // Events stay queued on the wallet until the commit lands
        self.store.commit(&snapshot, &balances, wallet.events())?;
        let events = wallet.drain_events();

        tracing::debug!(events = events.len(), "Wallet persisted");
        Ok(())
    }
}
