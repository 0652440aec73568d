use super::{AppliedEffect, Payload};
use crate::error::GovernanceError;
use crate::kind::ProposalKind;
use crate::state::GovernanceState;
use cosign_core::{Address, Amount, CallData};
use cosign_host::Executor;
use serde::{Deserialize, Serialize};

/// Forward `value` and `data` to `to`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionPayload {
    pub to: Address,
    pub value: Amount,
    pub data: CallData,
}

impl Payload for TransactionPayload {
    const KIND: ProposalKind = ProposalKind::Transaction;

    // Destination, value and data are opaque to the engine
    fn validate(&self, _state: &GovernanceState) -> Result<(), GovernanceError> {
        Ok(())
    }

    fn apply(
        &self,
        _state: &mut GovernanceState,
        host: &mut dyn Executor,
        account: &Address,
    ) -> Result<AppliedEffect, GovernanceError> {
        host.call(account, &self.to, self.value, &self.data)
            .map_err(GovernanceError::ExecutionFailed)?;

        Ok(AppliedEffect::Executed {
            to: self.to,
            value: self.value,
        })
    }
}
