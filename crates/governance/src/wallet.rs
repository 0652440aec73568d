//! Wallet facade
//!
//! Every entry point takes the caller identity first, checks ownership,
//! then delegates to the proposal book for its kind. Events are appended
//! only after the book call succeeded, so a rejected call leaves no trace.

use crate::config::WalletConfig;
use crate::error::GovernanceError;
use crate::event::{EventRecord, GovernanceEvent};
use crate::kind::ProposalKind;
use crate::kinds::{
    AppliedEffect, CandidatePayload, Payload, RemovalPayload, RequiredVotesPayload,
    TransactionPayload,
};
use crate::proposal::{Proposal, ProposalBook, ProposalId, VoteOutcome};
use crate::state::GovernanceState;
use cosign_core::{Address, Amount, CallData, Timestamp};
use cosign_host::{Clock, Executor};

/// Voting window used when a caller does not pick one
pub const DEFAULT_WINDOW_SECS: u64 = 300;

/// Multi-owner account governed by time-bounded proposals
pub struct Wallet<C: Clock, E: Executor> {
    pub(crate) account: Address,
    pub(crate) default_window_secs: u64,
    pub(crate) clock: C,
    pub(crate) executor: E,
    pub(crate) state: GovernanceState,
    pub(crate) transactions: ProposalBook<TransactionPayload>,
    pub(crate) candidates: ProposalBook<CandidatePayload>,
    pub(crate) removals: ProposalBook<RemovalPayload>,
    pub(crate) required_changes: ProposalBook<RequiredVotesPayload>,
    pub(crate) events: Vec<EventRecord>,
}

impl<C: Clock, E: Executor> Wallet<C, E> {
    /// Build a wallet holding funds at `account`.
    ///
    /// Fails with `InvalidConfig` on an empty, null-containing or duplicated
    /// owner list, or when `required_votes` is outside `(n/2, n)`.
    pub fn new(
        account: Address,
        owners: Vec<Address>,
        required_votes: u32,
        clock: C,
        executor: E,
    ) -> Result<Self, GovernanceError> {
        let state = GovernanceState::new(owners, required_votes)?;

        tracing::info!(
            account = %account,
            owners = state.registry().len(),
            required = required_votes,
            "Wallet created"
        );

        Ok(Self {
            account,
            default_window_secs: DEFAULT_WINDOW_SECS,
            clock,
            executor,
            state,
            transactions: ProposalBook::new(),
            candidates: ProposalBook::new(),
            removals: ProposalBook::new(),
            required_changes: ProposalBook::new(),
            events: Vec::new(),
        })
    }

    pub fn from_config(
        config: &WalletConfig,
        clock: C,
        executor: E,
    ) -> Result<Self, GovernanceError> {
        let mut wallet = Self::new(
            config.account,
            config.owners.clone(),
            config.required_votes,
            clock,
            executor,
        )?;
        wallet.default_window_secs = config.default_window_secs;
        Ok(wallet)
    }

    fn ensure_owner(&self, caller: &Address) -> Result<(), GovernanceError> {
        if self.state.is_owner(caller) {
            Ok(())
        } else {
            Err(GovernanceError::NotOwner)
        }
    }

    fn emit(&mut self, at: Timestamp, event: GovernanceEvent) {
        self.events.push(EventRecord { at, event });
    }

    fn emit_created<P: Payload>(
        &mut self,
        at: Timestamp,
        id: ProposalId,
        proposer: Address,
        ends_at: Timestamp,
    ) {
        self.emit(
            at,
            GovernanceEvent::ProposalCreated {
                kind: P::KIND,
                id,
                proposer,
                ends_at,
            },
        );
    }

    fn emit_vote(
        &mut self,
        at: Timestamp,
        kind: ProposalKind,
        voter: Address,
        outcome: &VoteOutcome,
    ) {
        self.emit(
            at,
            GovernanceEvent::VoteCast {
                kind,
                id: outcome.id,
                voter,
                approvals: outcome.approvals,
            },
        );

        let Some(effect) = &outcome.effect else {
            return;
        };
        let id = outcome.id;
        let event = match *effect {
            AppliedEffect::Executed { to, value } => {
                GovernanceEvent::TransactionExecuted { id, to, value }
            }
            AppliedEffect::OwnerAdded { owner, required_votes } => GovernanceEvent::OwnerAdded {
                id,
                owner,
                required_votes,
            },
            AppliedEffect::OwnerRemoved { owner, required_votes } => {
                GovernanceEvent::OwnerRemoved {
                    id,
                    owner,
                    required_votes,
                }
            }
            AppliedEffect::RequiredVotesChanged { previous, current } => {
                GovernanceEvent::RequiredVotesChanged {
                    id,
                    previous,
                    current,
                }
            }
        };
        self.emit(at, event);
    }

    fn emit_revoke(
        &mut self,
        at: Timestamp,
        kind: ProposalKind,
        voter: Address,
        outcome: &VoteOutcome,
    ) {
        self.emit(
            at,
            GovernanceEvent::VoteRevoked {
                kind,
                id: outcome.id,
                voter,
                approvals: outcome.approvals,
            },
        );
    }

    // === Transactions ===

    pub fn submit_transaction(
        &mut self,
        caller: Address,
        to: Address,
        value: Amount,
        data: CallData,
        duration: u64,
    ) -> Result<ProposalId, GovernanceError> {
        self.ensure_owner(&caller)?;
        let now = self.clock.now();
        let payload = TransactionPayload { to, value, data };
        let id = self
            .transactions
            .propose(&mut self.state, caller, payload, now, duration)?;
        self.emit_created::<TransactionPayload>(now, id, caller, now.saturating_add(duration));
        Ok(id)
    }

    pub fn confirm_transaction(
        &mut self,
        caller: Address,
        id: ProposalId,
    ) -> Result<VoteOutcome, GovernanceError> {
        self.ensure_owner(&caller)?;
        let now = self.clock.now();
        let outcome = self.transactions.support(
            id,
            caller,
            now,
            &mut self.state,
            &mut self.executor,
            &self.account,
        )?;
        self.emit_vote(now, ProposalKind::Transaction, caller, &outcome);
        Ok(outcome)
    }

    pub fn revoke_confirmation(
        &mut self,
        caller: Address,
        id: ProposalId,
    ) -> Result<VoteOutcome, GovernanceError> {
        self.ensure_owner(&caller)?;
        let now = self.clock.now();
        let outcome = self.transactions.revoke(id, caller, now, &self.state)?;
        self.emit_revoke(now, ProposalKind::Transaction, caller, &outcome);
        Ok(outcome)
    }

    // === Owner candidates ===

    pub fn add_owner_candidate(
        &mut self,
        caller: Address,
        candidate: Address,
        duration: u64,
    ) -> Result<ProposalId, GovernanceError> {
        self.ensure_owner(&caller)?;
        let now = self.clock.now();
        let id = self.candidates.propose(
            &mut self.state,
            caller,
            CandidatePayload { candidate },
            now,
            duration,
        )?;
        self.emit_created::<CandidatePayload>(now, id, caller, now.saturating_add(duration));
        Ok(id)
    }

    pub fn vote_candidate(
        &mut self,
        caller: Address,
        id: ProposalId,
    ) -> Result<VoteOutcome, GovernanceError> {
        self.ensure_owner(&caller)?;
        let now = self.clock.now();
        let outcome = self.candidates.support(
            id,
            caller,
            now,
            &mut self.state,
            &mut self.executor,
            &self.account,
        )?;
        self.emit_vote(now, ProposalKind::Candidate, caller, &outcome);
        Ok(outcome)
    }

    pub fn revoke_vote(
        &mut self,
        caller: Address,
        id: ProposalId,
    ) -> Result<VoteOutcome, GovernanceError> {
        self.ensure_owner(&caller)?;
        let now = self.clock.now();
        let outcome = self.candidates.revoke(id, caller, now, &self.state)?;
        self.emit_revoke(now, ProposalKind::Candidate, caller, &outcome);
        Ok(outcome)
    }

    // === Removals ===

    pub fn remove_owner(
        &mut self,
        caller: Address,
        target: Address,
        duration: u64,
    ) -> Result<ProposalId, GovernanceError> {
        self.ensure_owner(&caller)?;
        let now = self.clock.now();
        let id = self.removals.propose(
            &mut self.state,
            caller,
            RemovalPayload { target },
            now,
            duration,
        )?;
        self.emit_created::<RemovalPayload>(now, id, caller, now.saturating_add(duration));
        Ok(id)
    }

    pub fn vote_removal_proposal(
        &mut self,
        caller: Address,
        id: ProposalId,
    ) -> Result<VoteOutcome, GovernanceError> {
        self.ensure_owner(&caller)?;
        let now = self.clock.now();
        let outcome = self.removals.support(
            id,
            caller,
            now,
            &mut self.state,
            &mut self.executor,
            &self.account,
        )?;
        self.emit_vote(now, ProposalKind::Removal, caller, &outcome);
        Ok(outcome)
    }

    pub fn revoke_removal_support(
        &mut self,
        caller: Address,
        id: ProposalId,
    ) -> Result<VoteOutcome, GovernanceError> {
        self.ensure_owner(&caller)?;
        let now = self.clock.now();
        let outcome = self.removals.revoke(id, caller, now, &self.state)?;
        self.emit_revoke(now, ProposalKind::Removal, caller, &outcome);
        Ok(outcome)
    }

    // === Required votes ===

    pub fn add_new_required_votes(
        &mut self,
        caller: Address,
        new_required: u32,
        duration: u64,
    ) -> Result<ProposalId, GovernanceError> {
        self.ensure_owner(&caller)?;
        let now = self.clock.now();
        let id = self.required_changes.propose(
            &mut self.state,
            caller,
            RequiredVotesPayload { new_required },
            now,
            duration,
        )?;
        self.emit_created::<RequiredVotesPayload>(now, id, caller, now.saturating_add(duration));
        Ok(id)
    }

    pub fn approve_new_required_votes(
        &mut self,
        caller: Address,
        id: ProposalId,
    ) -> Result<VoteOutcome, GovernanceError> {
        self.ensure_owner(&caller)?;
        let now = self.clock.now();
        let outcome = self.required_changes.support(
            id,
            caller,
            now,
            &mut self.state,
            &mut self.executor,
            &self.account,
        )?;
        self.emit_vote(now, ProposalKind::RequiredVotes, caller, &outcome);
        Ok(outcome)
    }

    pub fn revoke_new_required_votes(
        &mut self,
        caller: Address,
        id: ProposalId,
    ) -> Result<VoteOutcome, GovernanceError> {
        self.ensure_owner(&caller)?;
        let now = self.clock.now();
        let outcome = self.required_changes.revoke(id, caller, now, &self.state)?;
        self.emit_revoke(now, ProposalKind::RequiredVotes, caller, &outcome);
        Ok(outcome)
    }

    // === Incoming value ===

    /// Credit the wallet account from `from`. Open to any sender.
    pub fn deposit(&mut self, from: Address, amount: Amount) -> Result<(), GovernanceError> {
        self.executor
            .call(&from, &self.account, amount, &CallData::empty())
            .map_err(GovernanceError::ExecutionFailed)?;

        let now = self.clock.now();
        tracing::info!(from = %from, amount = %amount, "Deposit received");
        self.emit(now, GovernanceEvent::Deposited { from, amount });
        Ok(())
    }

    // === Accessors ===

    pub fn account(&self) -> &Address {
        &self.account
    }

    pub fn default_window_secs(&self) -> u64 {
        self.default_window_secs
    }

    pub fn state(&self) -> &GovernanceState {
        &self.state
    }

    pub fn owners(&self) -> &[Address] {
        self.state.registry().owners()
    }

    pub fn owner_at(&self, index: usize) -> Option<&Address> {
        self.state.registry().owner_at(index)
    }

    pub fn is_owner(&self, address: &Address) -> bool {
        self.state.is_owner(address)
    }

    pub fn owner_count(&self) -> usize {
        self.state.registry().len()
    }

    pub fn required_votes(&self) -> u32 {
        self.state.required_votes()
    }

    pub fn current_time(&self) -> Timestamp {
        self.clock.now()
    }

    /// Balance of the wallet account on the executor
    pub fn balance(&self) -> Amount {
        self.executor.balance_of(&self.account)
    }

    pub fn transaction(&self, id: ProposalId) -> Option<&Proposal<TransactionPayload>> {
        self.transactions.get(id)
    }

    pub fn candidate(&self, id: ProposalId) -> Option<&Proposal<CandidatePayload>> {
        self.candidates.get(id)
    }

    pub fn removal(&self, id: ProposalId) -> Option<&Proposal<RemovalPayload>> {
        self.removals.get(id)
    }

    pub fn required_votes_proposal(
        &self,
        id: ProposalId,
    ) -> Option<&Proposal<RequiredVotesPayload>> {
        self.required_changes.get(id)
    }

    pub fn transactions(&self) -> &ProposalBook<TransactionPayload> {
        &self.transactions
    }

    pub fn candidates(&self) -> &ProposalBook<CandidatePayload> {
        &self.candidates
    }

    pub fn removals(&self) -> &ProposalBook<RemovalPayload> {
        &self.removals
    }

    pub fn required_changes(&self) -> &ProposalBook<RequiredVotesPayload> {
        &self.required_changes
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    pub fn removal_count(&self) -> usize {
        self.removals.len()
    }

    pub fn required_votes_proposal_count(&self) -> usize {
        self.required_changes.len()
    }

    pub fn transaction_approved(&self, id: ProposalId, voter: &Address) -> bool {
        self.transactions.has_approved(id, voter)
    }

    pub fn candidate_approved(&self, id: ProposalId, voter: &Address) -> bool {
        self.candidates.has_approved(id, voter)
    }

    pub fn removal_approved(&self, id: ProposalId, voter: &Address) -> bool {
        self.removals.has_approved(id, voter)
    }

    pub fn required_votes_approved(&self, id: ProposalId, voter: &Address) -> bool {
        self.required_changes.has_approved(id, voter)
    }

    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    /// Take the event log, leaving it empty
    pub fn drain_events(&mut self) -> Vec<EventRecord> {
        std::mem::take(&mut self.events)
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn executor_mut(&mut self) -> &mut E {
        &mut self.executor
    }

    /// Hand back the executor, e.g. to persist its balances
    pub fn into_executor(self) -> E {
        self.executor
    }
}
