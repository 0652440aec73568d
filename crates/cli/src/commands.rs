//! CLI commands

use anyhow::bail;
use cosign_core::{Address, Amount, CallData, Timestamp};
use cosign_governance::{Proposal, ProposalId, ProposalKind, VoteOutcome, WalletConfig};
use serde::Serialize;

use crate::context::AppContext;

fn format_time(at: Timestamp) -> String {
    i64::try_from(at.as_secs())
        .ok()
        .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| at.to_string())
}

fn window(ctx: &AppContext, duration: Option<u64>) -> anyhow::Result<u64> {
    Ok(duration.unwrap_or(ctx.wallet()?.default_window_secs()))
}

fn report_vote(kind: ProposalKind, voter: &Address, outcome: &VoteOutcome) {
    println!(
        "✅ {} voted on {} #{} ({}/{})",
        voter.short(),
        kind,
        outcome.id,
        outcome.approvals,
        outcome.required
    );
    if let Some(effect) = &outcome.effect {
        println!("   Quorum reached, applied: {:?}", effect);
    }
}

/// Create the wallet from a validated config
pub fn init(ctx: &mut AppContext, config: &WalletConfig) -> anyhow::Result<()> {
    config.validate()?;
    let wallet = ctx.init(config)?;

    println!("✅ Wallet initialized");
    println!("   Account: {}", wallet.account());
    println!(
        "   Owners: {} (required votes: {})",
        wallet.owner_count(),
        wallet.required_votes()
    );
    Ok(())
}

/// Mint into a host account
pub fn fund(ctx: &mut AppContext, account: Address, amount: Amount) -> anyhow::Result<()> {
    ctx.fund(account, amount)?;
    ctx.persist()?;
    println!("✅ Funded {} with {}", account, amount);
    Ok(())
}

/// Send value from `from` into the wallet account
pub fn deposit(ctx: &mut AppContext, from: Address, amount: Amount) -> anyhow::Result<()> {
    let wallet = ctx.wallet_mut()?;
    wallet.deposit(from, amount)?;
    let balance = wallet.balance();
    ctx.persist()?;

    println!("✅ Deposited {} from {} (balance: {})", amount, from, balance);
    Ok(())
}

pub fn submit(
    ctx: &mut AppContext,
    caller: Address,
    to: Address,
    value: Amount,
    data: CallData,
    duration: Option<u64>,
) -> anyhow::Result<()> {
    let duration = window(ctx, duration)?;
    let id = ctx
        .wallet_mut()?
        .submit_transaction(caller, to, value, data, duration)?;
    ctx.persist()?;

    println!("✅ Transaction #{} submitted: {} to {}", id, value, to);
    Ok(())
}

pub fn propose_owner(
    ctx: &mut AppContext,
    caller: Address,
    candidate: Address,
    duration: Option<u64>,
) -> anyhow::Result<()> {
    let duration = window(ctx, duration)?;
    let id = ctx
        .wallet_mut()?
        .add_owner_candidate(caller, candidate, duration)?;
    ctx.persist()?;

    println!("✅ Candidate #{} proposed: {}", id, candidate);
    Ok(())
}

pub fn propose_removal(
    ctx: &mut AppContext,
    caller: Address,
    target: Address,
    duration: Option<u64>,
) -> anyhow::Result<()> {
    let duration = window(ctx, duration)?;
    let id = ctx.wallet_mut()?.remove_owner(caller, target, duration)?;
    ctx.persist()?;

    println!("✅ Removal #{} proposed: {}", id, target);
    Ok(())
}

pub fn propose_required(
    ctx: &mut AppContext,
    caller: Address,
    new_required: u32,
    duration: Option<u64>,
) -> anyhow::Result<()> {
    let duration = window(ctx, duration)?;
    let id = ctx
        .wallet_mut()?
        .add_new_required_votes(caller, new_required, duration)?;
    ctx.persist()?;

    println!("✅ Required votes #{} proposed: {}", id, new_required);
    Ok(())
}

/// Cast a yes-vote on a proposal of any kind
pub fn vote(
    ctx: &mut AppContext,
    kind: ProposalKind,
    caller: Address,
    id: ProposalId,
) -> anyhow::Result<()> {
    let wallet = ctx.wallet_mut()?;
    let outcome = match kind {
        ProposalKind::Transaction => wallet.confirm_transaction(caller, id)?,
        ProposalKind::Candidate => wallet.vote_candidate(caller, id)?,
        ProposalKind::Removal => wallet.vote_removal_proposal(caller, id)?,
        ProposalKind::RequiredVotes => wallet.approve_new_required_votes(caller, id)?,
    };
    ctx.persist()?;

    report_vote(kind, &caller, &outcome);
    Ok(())
}

/// Withdraw a yes-vote on a proposal of any kind
pub fn revoke(
    ctx: &mut AppContext,
    kind: ProposalKind,
    caller: Address,
    id: ProposalId,
) -> anyhow::Result<()> {
    let wallet = ctx.wallet_mut()?;
    let outcome = match kind {
        ProposalKind::Transaction => wallet.revoke_confirmation(caller, id)?,
        ProposalKind::Candidate => wallet.revoke_vote(caller, id)?,
        ProposalKind::Removal => wallet.revoke_removal_support(caller, id)?,
        ProposalKind::RequiredVotes => wallet.revoke_new_required_votes(caller, id)?,
    };
    ctx.persist()?;

    println!(
        "✅ {} revoked vote on {} #{} ({}/{})",
        caller.short(),
        kind,
        outcome.id,
        outcome.approvals,
        outcome.required
    );
    Ok(())
}

/// Print owners, quorum, balance and proposal counts
pub fn status(ctx: &AppContext) -> anyhow::Result<()> {
    let wallet = ctx.wallet()?;

    println!("Wallet {}", wallet.account());
    println!("  Time:           {}", format_time(wallet.current_time()));
    println!("  Balance:        {}", wallet.balance());
    println!(
        "  Required votes: {} of {}",
        wallet.required_votes(),
        wallet.owner_count()
    );
    if !wallet.state().quorum_within_bounds() {
        println!("  ⚠️  Required votes outside (n/2, n) after registry changes");
    }

    println!("  Owners:");
    for (index, owner) in wallet.owners().iter().enumerate() {
        println!("    [{}] {}", index, owner);
    }

    println!("  Proposals:");
    println!("    transactions:   {}", wallet.transaction_count());
    println!("    candidates:     {}", wallet.candidate_count());
    println!("    removals:       {}", wallet.removal_count());
    println!("    required votes: {}", wallet.required_votes_proposal_count());
    Ok(())
}

#[derive(Serialize)]
struct ProposalView<'a, P> {
    kind: ProposalKind,
    status: String,
    starts_at: String,
    ends_at: String,
    #[serde(flatten)]
    proposal: &'a Proposal<P>,
}

fn print_proposal<P: Serialize>(
    kind: ProposalKind,
    id: ProposalId,
    proposal: Option<&Proposal<P>>,
    now: Timestamp,
) -> anyhow::Result<()> {
    let Some(proposal) = proposal else {
        bail!("{}", kind.not_found_reason());
    };

    let view = ProposalView {
        kind,
        status: proposal.status_at(now).to_string(),
        starts_at: format_time(proposal.window.start),
        ends_at: format_time(proposal.window.end),
        proposal,
    };
    println!("{}", serde_json::to_string_pretty(&view)?);
    tracing::debug!(kind = %kind, proposal_id = id, "Proposal shown");
    Ok(())
}

/// Print one proposal as JSON
pub fn show(ctx: &AppContext, kind: ProposalKind, id: ProposalId) -> anyhow::Result<()> {
    let wallet = ctx.wallet()?;
    let now = wallet.current_time();

    match kind {
        ProposalKind::Transaction => print_proposal(kind, id, wallet.transaction(id), now),
        ProposalKind::Candidate => print_proposal(kind, id, wallet.candidate(id), now),
        ProposalKind::Removal => print_proposal(kind, id, wallet.removal(id), now),
        ProposalKind::RequiredVotes => {
            print_proposal(kind, id, wallet.required_votes_proposal(id), now)
        }
    }
}

/// Print the newest events
pub fn events(ctx: &AppContext, limit: usize) -> anyhow::Result<()> {
    let records = ctx.store().recent_events(limit)?;
    if records.is_empty() {
        println!("No events recorded");
        return Ok(());
    }

    for record in records {
        println!(
            "{}  {}",
            format_time(record.at),
            serde_json::to_string(&record.event)?
        );
    }
    Ok(())
}
