//! Persistable wallet state
//!
//! A snapshot carries everything needed to rebuild the engine except the
//! clock and the executor. Membership and the open candidacy/removal markers
//! are derived on restore rather than stored.

use crate::error::GovernanceError;
use crate::kinds::{
    CandidatePayload, Payload, RemovalPayload, RequiredVotesPayload, TransactionPayload,
};
use crate::proposal::{Proposal, ProposalBook};
use crate::quorum::QuorumPolicy;
use crate::registry::OwnerRegistry;
use crate::state::GovernanceState;
use crate::wallet::Wallet;
use cosign_core::Address;
use cosign_host::{Clock, Executor};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSnapshot {
    pub account: Address,
    /// Owners in registry order
    pub owners: Vec<Address>,
    /// May sit outside `(n/2, n)` after registry changes
    pub required_votes: u32,
    pub default_window_secs: u64,
    pub transactions: Vec<Proposal<TransactionPayload>>,
    pub candidates: Vec<Proposal<CandidatePayload>>,
    pub removals: Vec<Proposal<RemovalPayload>>,
    pub required_changes: Vec<Proposal<RequiredVotesPayload>>,
}

fn rebuild<P: Payload>(
    proposals: Vec<Proposal<P>>,
    state: &mut GovernanceState,
) -> Result<ProposalBook<P>, GovernanceError> {
    let book = ProposalBook::from_proposals(proposals)?;
    for proposal in book.iter().filter(|p| !p.is_terminal()) {
        proposal.payload.reserve(state);
    }
    Ok(book)
}

impl<C: Clock, E: Executor> Wallet<C, E> {
    pub fn snapshot(&self) -> WalletSnapshot {
        WalletSnapshot {
            account: self.account,
            owners: self.state.registry().owners().to_vec(),
            required_votes: self.state.required_votes(),
            default_window_secs: self.default_window_secs,
            transactions: self.transactions.iter().cloned().collect(),
            candidates: self.candidates.iter().cloned().collect(),
            removals: self.removals.iter().cloned().collect(),
            required_changes: self.required_changes.iter().cloned().collect(),
        }
    }

    /// Rebuild a wallet from a snapshot.
    ///
    /// The owner list is held to the construction rules; the required votes
    /// are taken as stored.
    pub fn restore(
        snapshot: WalletSnapshot,
        clock: C,
        executor: E,
    ) -> Result<Self, GovernanceError> {
        let registry = OwnerRegistry::new(snapshot.owners)?;
        let quorum = QuorumPolicy::from_raw(snapshot.required_votes);
        let mut state = GovernanceState::from_parts(registry, quorum);

        let transactions = rebuild(snapshot.transactions, &mut state)?;
        let candidates = rebuild(snapshot.candidates, &mut state)?;
        let removals = rebuild(snapshot.removals, &mut state)?;
        let required_changes = rebuild(snapshot.required_changes, &mut state)?;

        tracing::info!(
            account = %snapshot.account,
            owners = state.registry().len(),
            required = state.required_votes(),
            "Wallet restored"
        );

        Ok(Self {
            account: snapshot.account,
            default_window_secs: snapshot.default_window_secs,
            clock,
            executor,
            state,
            transactions,
            candidates,
            removals,
            required_changes,
            events: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigFault;
    use cosign_core::{Amount, CallData, Timestamp};
    use cosign_host::{InMemoryLedger, ManualClock};

    fn addr(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    fn busy_wallet() -> Wallet<ManualClock, InMemoryLedger> {
        let mut wallet = Wallet::new(
            addr(0xaa),
            (1..=4).map(addr).collect(),
            3,
            ManualClock::new(Timestamp::from_secs(500)),
            InMemoryLedger::new(),
        )
        .unwrap();

        let tx = wallet
            .submit_transaction(addr(1), addr(9), Amount::ZERO, CallData::empty(), 100)
            .unwrap();
        wallet.confirm_transaction(addr(2), tx).unwrap();
        wallet.add_owner_candidate(addr(1), addr(5), 100).unwrap();
        wallet.remove_owner(addr(2), addr(4), 100).unwrap();
        wallet
    }

    #[test]
    fn test_restore_reproduces_state() {
        let wallet = busy_wallet();
        let snapshot = wallet.snapshot();

        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: WalletSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, snapshot);

        let restored =
            Wallet::restore(parsed, ManualClock::default(), InMemoryLedger::new()).unwrap();
        assert_eq!(restored.state(), wallet.state());
        assert!(restored.state().is_pending_candidate(&addr(5)));
        assert!(restored.state().is_pending_removal(&addr(4)));
        assert!(restored.transaction_approved(0, &addr(2)));
        assert_eq!(restored.snapshot(), snapshot);
    }

    #[test]
    fn test_restored_wallet_keeps_blocking_candidate() {
        let snapshot = busy_wallet().snapshot();
        let mut restored = Wallet::restore(
            snapshot,
            ManualClock::new(Timestamp::from_secs(10_000)),
            InMemoryLedger::new(),
        )
        .unwrap();

        assert_eq!(
            restored.add_owner_candidate(addr(1), addr(5), 100),
            Err(GovernanceError::AlreadyCandidate)
        );
    }

    #[test]
    fn test_restore_rejects_duplicate_owners() {
        let mut snapshot = busy_wallet().snapshot();
        snapshot.owners.push(addr(1));
        let result = Wallet::restore(snapshot, ManualClock::default(), InMemoryLedger::new());
        assert!(matches!(
            result,
            Err(GovernanceError::InvalidConfig(ConfigFault::DuplicateOwner))
        ));
    }

    #[test]
    fn test_restore_rejects_reordered_proposals() {
        let mut wallet = busy_wallet();
        wallet
            .submit_transaction(addr(1), addr(9), Amount::ZERO, CallData::empty(), 100)
            .unwrap();
        let mut snapshot = wallet.snapshot();
        snapshot.transactions.reverse();

        let result = Wallet::restore(snapshot, ManualClock::default(), InMemoryLedger::new());
        assert!(matches!(
            result,
            Err(GovernanceError::InvalidConfig(ConfigFault::ProposalOutOfOrder))
        ));
    }
}
