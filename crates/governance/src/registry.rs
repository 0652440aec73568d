//! Owner registry - ordered set of authorized identities

use crate::error::{ConfigFault, GovernanceError};
use cosign_core::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Owners in insertion order, plus a set for O(1) membership.
///
/// # Invariant
/// No duplicates and no null identity. `owners` and `members` always hold
/// the same addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Address>", into = "Vec<Address>")]
pub struct OwnerRegistry {
    owners: Vec<Address>,
    members: HashSet<Address>,
}

impl OwnerRegistry {
    /// Build a registry from a candidate list.
    ///
    /// Fails on an empty list, a null identity, or a repeated identity.
    pub fn new(owners: Vec<Address>) -> Result<Self, ConfigFault> {
        if owners.is_empty() {
            return Err(ConfigFault::NoOwners);
        }

        let mut members = HashSet::with_capacity(owners.len());
        for owner in &owners {
            if owner.is_zero() {
                return Err(ConfigFault::NullOwner);
            }
            if !members.insert(*owner) {
                return Err(ConfigFault::DuplicateOwner);
            }
        }

        Ok(Self { owners, members })
    }

    pub fn is_owner(&self, address: &Address) -> bool {
        self.members.contains(address)
    }

    /// Owners in insertion order
    pub fn owners(&self) -> &[Address] {
        &self.owners
    }

    pub fn owner_at(&self, index: usize) -> Option<&Address> {
        self.owners.get(index)
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// Append a new owner
    pub(crate) fn add(&mut self, owner: Address) -> Result<(), GovernanceError> {
        if owner.is_zero() {
            return Err(GovernanceError::InvalidAddress);
        }
        if !self.members.insert(owner) {
            return Err(GovernanceError::AlreadyOwner);
        }
        self.owners.push(owner);
        Ok(())
    }

    /// Remove an owner, keeping the order of the rest.
    ///
    /// The registry never becomes empty.
    pub(crate) fn remove(&mut self, owner: &Address) -> Result<(), GovernanceError> {
        if !self.members.contains(owner) {
            return Err(GovernanceError::NotAnOwner);
        }
        if self.owners.len() == 1 {
            return Err(GovernanceError::LastOwner);
        }
        self.members.remove(owner);
        self.owners.retain(|o| o != owner);
        Ok(())
    }
}

impl TryFrom<Vec<Address>> for OwnerRegistry {
    type Error = ConfigFault;

    fn try_from(owners: Vec<Address>) -> Result<Self, Self::Error> {
        Self::new(owners)
    }
}

impl From<OwnerRegistry> for Vec<Address> {
    fn from(registry: OwnerRegistry) -> Self {
        registry.owners
    }
}
