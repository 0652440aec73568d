//! Cosign CLI - Main entry point
//!
//! # Usage
//! ```bash
//! cosign init --account 0xaa.. --owner 0x01.. --owner 0x02.. --owner 0x03.. --required 2
//! cosign fund 0x09.. 100
//! cosign deposit 0x09.. 40
//! cosign submit 0x01.. 0x42.. 5
//! cosign confirm 0x02.. 0
//! cosign status
//! ```

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use cosign_cli::{commands, AppContext};
use cosign_core::{Address, Amount, CallData};
use cosign_governance::{ProposalId, ProposalKind, WalletConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cosign")]
#[command(about = "Cosign - multi-owner wallet governed by time-bounded proposals", long_about = None)]
struct Cli {
    /// Data directory path
    #[arg(short, long, default_value = "./data")]
    data: PathBuf,

    /// Log level when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the wallet from a TOML config or from flags
    Init {
        /// Wallet config file
        #[arg(long, conflicts_with_all = ["account", "owners", "required"])]
        config: Option<PathBuf>,
        /// Account holding the wallet's funds
        #[arg(long)]
        account: Option<Address>,
        /// Owner address (repeat for each owner)
        #[arg(long = "owner")]
        owners: Vec<Address>,
        /// Required votes
        #[arg(long)]
        required: Option<u32>,
        /// Default voting window in seconds
        #[arg(long, default_value = "300")]
        window: u64,
    },

    /// Mint value into any host account
    Fund { account: Address, amount: Amount },

    /// Send value from an account into the wallet
    Deposit { from: Address, amount: Amount },

    /// Propose a transaction
    Submit {
        caller: Address,
        to: Address,
        value: Amount,
        /// Hex call data forwarded to the destination
        #[arg(long, default_value = "")]
        data: CallData,
        /// Voting window in seconds
        #[arg(long)]
        duration: Option<u64>,
    },

    /// Confirm a transaction
    Confirm { caller: Address, id: ProposalId },

    /// Revoke a transaction confirmation
    Revoke { caller: Address, id: ProposalId },

    /// Propose a new owner
    ProposeOwner {
        caller: Address,
        candidate: Address,
        #[arg(long)]
        duration: Option<u64>,
    },

    /// Vote for an owner candidate
    VoteOwner { caller: Address, id: ProposalId },

    /// Revoke a vote for an owner candidate
    RevokeOwnerVote { caller: Address, id: ProposalId },

    /// Propose removing an owner
    ProposeRemoval {
        caller: Address,
        target: Address,
        #[arg(long)]
        duration: Option<u64>,
    },

    /// Support an owner removal
    VoteRemoval { caller: Address, id: ProposalId },

    /// Revoke support for an owner removal
    RevokeRemoval { caller: Address, id: ProposalId },

    /// Propose a new required votes value
    ProposeRequired {
        caller: Address,
        new_required: u32,
        #[arg(long)]
        duration: Option<u64>,
    },

    /// Approve a required votes proposal
    ApproveRequired { caller: Address, id: ProposalId },

    /// Revoke approval of a required votes proposal
    RevokeRequired { caller: Address, id: ProposalId },

    /// Show owners, quorum, balance and proposal counts
    Status,

    /// Show one proposal
    Show {
        /// transaction, candidate, removal or required_votes
        kind: ProposalKind,
        id: ProposalId,
    },

    /// List recent governance events
    Events {
        #[arg(long, default_value = "20")]
        limit: usize,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level);

    let mut ctx = AppContext::new(&cli.data)?;

    match cli.command {
        Commands::Init {
            config,
            account,
            owners,
            required,
            window,
        } => {
            let config = match config {
                Some(path) => WalletConfig::load_file(&path)
                    .with_context(|| format!("Failed to load config from {}", path.display()))?,
                None => {
                    let Some(required) = required else {
                        bail!("--required is needed without --config");
                    };
                    WalletConfig {
                        account: account.context("--account is needed without --config")?,
                        owners,
                        required_votes: required,
                        default_window_secs: window,
                    }
                }
            };
            commands::init(&mut ctx, &config)?;
        }

        Commands::Fund { account, amount } => commands::fund(&mut ctx, account, amount)?,

        Commands::Deposit { from, amount } => commands::deposit(&mut ctx, from, amount)?,

        Commands::Submit {
            caller,
            to,
            value,
            data,
            duration,
        } => commands::submit(&mut ctx, caller, to, value, data, duration)?,

        Commands::Confirm { caller, id } => {
            commands::vote(&mut ctx, ProposalKind::Transaction, caller, id)?
        }
        Commands::Revoke { caller, id } => {
            commands::revoke(&mut ctx, ProposalKind::Transaction, caller, id)?
        }

        Commands::ProposeOwner {
            caller,
            candidate,
            duration,
        } => commands::propose_owner(&mut ctx, caller, candidate, duration)?,
        Commands::VoteOwner { caller, id } => {
            commands::vote(&mut ctx, ProposalKind::Candidate, caller, id)?
        }
        Commands::RevokeOwnerVote { caller, id } => {
            commands::revoke(&mut ctx, ProposalKind::Candidate, caller, id)?
        }

        Commands::ProposeRemoval {
            caller,
            target,
            duration,
        } => commands::propose_removal(&mut ctx, caller, target, duration)?,
        Commands::VoteRemoval { caller, id } => {
            commands::vote(&mut ctx, ProposalKind::Removal, caller, id)?
        }
        Commands::RevokeRemoval { caller, id } => {
            commands::revoke(&mut ctx, ProposalKind::Removal, caller, id)?
        }

        Commands::ProposeRequired {
            caller,
            new_required,
            duration,
        } => commands::propose_required(&mut ctx, caller, new_required, duration)?,
        Commands::ApproveRequired { caller, id } => {
            commands::vote(&mut ctx, ProposalKind::RequiredVotes, caller, id)?
        }
        Commands::RevokeRequired { caller, id } => {
            commands::revoke(&mut ctx, ProposalKind::RequiredVotes, caller, id)?
        }

        Commands::Status => commands::status(&ctx)?,

        Commands::Show { kind, id } => commands::show(&ctx, kind, id)?,

        Commands::Events { limit } => commands::events(&ctx, limit)?,
    }

    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
