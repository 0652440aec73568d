//! Integration tests for the cosign CLI
//!
//! These drive the command functions against a data directory, reopening
//! the context between steps the way separate CLI invocations would.

use cosign_cli::{commands, AppContext};
use cosign_core::{Address, Amount, CallData, Timestamp};
use cosign_governance::{GovernanceError, GovernanceEvent, ProposalKind, WalletConfig};
use cosign_host::{Executor, ManualClock};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

const ACCOUNT: Address = Address::repeat_byte(0xaa);
const DONOR: Address = Address::repeat_byte(0x99);
const PAYEE: Address = Address::repeat_byte(0x42);

fn owner(n: u8) -> Address {
    Address::repeat_byte(n)
}

fn open(path: &Path, clock: &ManualClock) -> AppContext {
    AppContext::with_clock(path, Arc::new(clock.clone())).unwrap()
}

fn config() -> WalletConfig {
    WalletConfig {
        account: ACCOUNT,
        owners: (1..=6).map(owner).collect(),
        required_votes: 4,
        default_window_secs: 300,
    }
}

/// Test: init → fund → deposit → submit → four confirmations
#[test]
fn test_transaction_across_invocations() {
    let temp_dir = TempDir::new().unwrap();
    let data = temp_dir.path();
    let clock = ManualClock::new(Timestamp::from_secs(10_000));

    commands::init(&mut open(data, &clock), &config()).unwrap();
    commands::fund(&mut open(data, &clock), DONOR, Amount::units(50)).unwrap();
    commands::deposit(&mut open(data, &clock), DONOR, Amount::units(20)).unwrap();
    commands::submit(
        &mut open(data, &clock),
        owner(1),
        PAYEE,
        Amount::units(7),
        CallData::empty(),
        None,
    )
    .unwrap();

    for voter in 1..=4 {
        commands::vote(&mut open(data, &clock), ProposalKind::Transaction, owner(voter), 0)
            .unwrap();
    }

    let ctx = open(data, &clock);
    let wallet = ctx.wallet().unwrap();
    assert_eq!(wallet.balance(), Amount::units(13));
    assert_eq!(wallet.executor().balance_of(&PAYEE), Amount::units(7));
    assert_eq!(wallet.executor().balance_of(&DONOR), Amount::units(30));
    assert!(wallet.transaction(0).unwrap().is_terminal());
    assert_eq!(
        wallet.transaction(0).unwrap().window.end,
        Timestamp::from_secs(10_300)
    );

    let events = ctx.store().list_events().unwrap();
    assert!(matches!(events[0].event, GovernanceEvent::Deposited { .. }));
    assert!(matches!(
        events.last().unwrap().event,
        GovernanceEvent::TransactionExecuted { .. }
    ));
}

/// Test: a rejected command leaves the store as it was
#[test]
fn test_rejected_command_persists_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let data = temp_dir.path();
    let clock = ManualClock::new(Timestamp::from_secs(10_000));

    commands::init(&mut open(data, &clock), &config()).unwrap();
    commands::propose_owner(&mut open(data, &clock), owner(1), owner(7), Some(60)).unwrap();
    clock.advance(60);

    let err = commands::vote(&mut open(data, &clock), ProposalKind::Candidate, owner(2), 0)
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<GovernanceError>(),
        Some(&GovernanceError::WindowClosed)
    );

    let ctx = open(data, &clock);
    assert_eq!(ctx.wallet().unwrap().candidate(0).unwrap().approval_count(), 0);
    assert_eq!(ctx.store().list_events().unwrap().len(), 1);
}

/// Test: registry changes survive a reopen
#[test]
fn test_owner_removal_across_invocations() {
    let temp_dir = TempDir::new().unwrap();
    let data = temp_dir.path();
    let clock = ManualClock::new(Timestamp::from_secs(10_000));

    commands::init(&mut open(data, &clock), &config()).unwrap();
    commands::propose_removal(&mut open(data, &clock), owner(2), owner(6), None).unwrap();
    for voter in 1..=4 {
        commands::vote(&mut open(data, &clock), ProposalKind::Removal, owner(voter), 0).unwrap();
    }

    let mut ctx = open(data, &clock);
    let wallet = ctx.wallet().unwrap();
    assert_eq!(wallet.owner_count(), 5);
    assert_eq!(wallet.required_votes(), 3);

    // The removal marker is gone with the applied proposal
    assert!(!wallet.state().is_pending_removal(&owner(6)));
    let err = commands::propose_removal(&mut ctx, owner(6), owner(1), None).unwrap_err();
    assert_eq!(err.to_string(), "Not owner");
}

#[test]
fn test_commands_require_init() {
    let temp_dir = TempDir::new().unwrap();
    let clock = ManualClock::default();
    let mut ctx = open(temp_dir.path(), &clock);

    assert!(commands::status(&ctx).is_err());
    assert!(commands::deposit(&mut ctx, DONOR, Amount::units(1)).is_err());
    commands::events(&ctx, 10).unwrap();
}

#[test]
fn test_init_rejects_invalid_config() {
    let temp_dir = TempDir::new().unwrap();
    let clock = ManualClock::default();
    let mut ctx = open(temp_dir.path(), &clock);

    let mut bad = config();
    bad.required_votes = 6;
    assert!(commands::init(&mut ctx, &bad).is_err());
    assert!(!ctx.is_initialized());
}
