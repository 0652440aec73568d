//! Generic proposal ledger
//!
//! One append-only book per proposal kind. The book owns the shared vote
//! protocol: existence, terminal and window checks, duplicate-vote checks,
//! and the atomic apply-on-quorum step.

use crate::error::{ConfigFault, GovernanceError};
use crate::kinds::{AppliedEffect, Payload};
use crate::state::GovernanceState;
use crate::window::VotingWindow;
use cosign_core::{Address, Timestamp};
use cosign_host::Executor;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Sequential index within one book, never reused
pub type ProposalId = u64;

/// Lifecycle state of a proposal at a given time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    /// Accepting votes
    Pending,
    /// Effect applied, terminal
    Applied,
    /// Window closed without reaching quorum, inert
    Expired,
}

/// A time-bounded request for one governed action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal<P> {
    pub id: ProposalId,
    pub proposer: Address,
    pub payload: P,
    pub window: VotingWindow,
    /// Owners with an outstanding yes-vote, in voting order
    approvers: Vec<Address>,
    /// Set once, when quorum applied the effect
    applied_at: Option<Timestamp>,
}

impl<P> Proposal<P> {
    pub fn approval_count(&self) -> u32 {
        self.approvers.len() as u32
    }

    pub fn approvers(&self) -> &[Address] {
        &self.approvers
    }

    pub fn has_approved(&self, voter: &Address) -> bool {
        self.approvers.contains(voter)
    }

    pub fn is_terminal(&self) -> bool {
        self.applied_at.is_some()
    }

    pub fn applied_at(&self) -> Option<Timestamp> {
        self.applied_at
    }

    pub fn status_at(&self, now: Timestamp) -> ProposalStatus {
        if self.is_terminal() {
            ProposalStatus::Applied
        } else if self.window.is_open(now) {
            ProposalStatus::Pending
        } else {
            ProposalStatus::Expired
        }
    }
}

/// Result of a successful support or revoke call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteOutcome {
    pub id: ProposalId,
    /// Approval count after the call
    pub approvals: u32,
    /// Required votes after the call
    pub required: u32,
    /// Set when this vote reached quorum
    pub effect: Option<AppliedEffect>,
}

impl VoteOutcome {
    pub fn applied(&self) -> bool {
        self.effect.is_some()
    }
}

/// Append-only store of one proposal kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalBook<P> {
    proposals: Vec<Proposal<P>>,
}

impl<P> Default for ProposalBook<P> {
    fn default() -> Self {
        Self {
            proposals: Vec::new(),
        }
    }
}

impl<P: Payload> ProposalBook<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a book from persisted proposals; ids must equal their index
    pub fn from_proposals(proposals: Vec<Proposal<P>>) -> Result<Self, ConfigFault> {
        let in_order = proposals
            .iter()
            .enumerate()
            .all(|(index, p)| p.id == index as ProposalId);
        if !in_order {
            return Err(ConfigFault::ProposalOutOfOrder);
        }
        Ok(Self { proposals })
    }

    pub fn get(&self, id: ProposalId) -> Option<&Proposal<P>> {
        usize::try_from(id).ok().and_then(|i| self.proposals.get(i))
    }

    pub fn len(&self) -> usize {
        self.proposals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Proposal<P>> {
        self.proposals.iter()
    }

    /// Whether `voter` has an outstanding yes-vote; false for unknown ids
    pub fn has_approved(&self, id: ProposalId, voter: &Address) -> bool {
        self.get(id).is_some_and(|p| p.has_approved(voter))
    }

    /// Validate the payload and the duration, then append
    pub fn propose(
        &mut self,
        state: &mut GovernanceState,
        proposer: Address,
        payload: P,
        now: Timestamp,
        duration: u64,
    ) -> Result<ProposalId, GovernanceError> {
        payload.validate(state)?;
        let window = VotingWindow::open(now, duration)?;
        payload.reserve(state);

        let id = self.proposals.len() as ProposalId;
        self.proposals.push(Proposal {
            id,
            proposer,
            payload,
            window,
            approvers: Vec::new(),
            applied_at: None,
        });

        tracing::debug!(
            kind = %P::KIND,
            proposal_id = id,
            proposer = %proposer,
            ends_at = %window.end,
            "Proposal created"
        );
        Ok(id)
    }

    /// Existence, terminal and window checks shared by support and revoke
    fn votable_mut(
        &mut self,
        id: ProposalId,
        now: Timestamp,
    ) -> Result<&mut Proposal<P>, GovernanceError> {
        let proposal = usize::try_from(id)
            .ok()
            .and_then(|i| self.proposals.get_mut(i))
            .ok_or(GovernanceError::NotFound(P::KIND))?;

        if proposal.is_terminal() {
            return Err(GovernanceError::AlreadyTerminal(P::KIND));
        }
        proposal.window.ensure_open(now)?;
        Ok(proposal)
    }

    /// Record `voter`'s approval; apply the effect if this vote reaches quorum.
    ///
    /// The vote and the effect commit together. If the effect fails, the
    /// vote is not recorded and `state` is untouched.
    pub fn support(
        &mut self,
        id: ProposalId,
        voter: Address,
        now: Timestamp,
        state: &mut GovernanceState,
        host: &mut dyn Executor,
        account: &Address,
    ) -> Result<VoteOutcome, GovernanceError> {
        let proposal = self.votable_mut(id, now)?;
        if proposal.has_approved(&voter) {
            return Err(GovernanceError::AlreadyApproved(P::KIND));
        }

        let approvals = proposal.approval_count() + 1;
        let effect = if state.quorum.is_reached(approvals) {
            let mut staged = state.clone();
            match proposal.payload.apply(&mut staged, host, account) {
                Ok(effect) => {
                    *state = staged;
                    Some(effect)
                }
                Err(e) => {
                    tracing::warn!(
                        kind = %P::KIND,
                        proposal_id = id,
                        voter = %voter,
                        error = %e,
                        "Deciding vote rolled back, effect failed"
                    );
                    return Err(e);
                }
            }
        } else {
            None
        };

        proposal.approvers.push(voter);
        if effect.is_some() {
            proposal.applied_at = Some(now);
            tracing::info!(kind = %P::KIND, proposal_id = id, effect = ?effect, "Proposal applied");
        }

        tracing::debug!(
            kind = %P::KIND,
            proposal_id = id,
            voter = %voter,
            approvals,
            required = state.quorum.required(),
            "Vote recorded"
        );

        Ok(VoteOutcome {
            id,
            approvals,
            required: state.quorum.required(),
            effect,
        })
    }

    /// Withdraw `voter`'s approval. Never applies an effect.
    pub fn revoke(
        &mut self,
        id: ProposalId,
        voter: Address,
        now: Timestamp,
        state: &GovernanceState,
    ) -> Result<VoteOutcome, GovernanceError> {
        let proposal = self.votable_mut(id, now)?;
        let position = proposal
            .approvers
            .iter()
            .position(|a| *a == voter)
            .ok_or(GovernanceError::NotApproved(P::KIND))?;

        proposal.approvers.remove(position);
        let approvals = proposal.approval_count();

        tracing::debug!(
            kind = %P::KIND,
            proposal_id = id,
            voter = %voter,
            approvals,
            "Vote revoked"
        );

        Ok(VoteOutcome {
            id,
            approvals,
            required: state.quorum.required(),
            effect: None,
        })
    }

    pub(crate) fn into_proposals(self) -> Vec<Proposal<P>> {
        self.proposals
    }
}
