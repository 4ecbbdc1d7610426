//! In-process vault provider.
//!
//! Behaves like the platform vaults it stands in for: duplicate entries
//! are allowed, an empty resource lists as `NotFound`, and removing or
//! retrieving a missing entry is `NotFound`. Nothing outlives the process.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::errors::VaultError;

use super::credential::Credential;
use super::provider::VaultProvider;

#[derive(Default)]
pub struct MemoryVault {
    entries: Mutex<Vec<Credential>>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of entries across all resources.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of entries stored for one (resource, user name) pair.
    pub fn count(&self, resource: &str, user_name: &str) -> usize {
        self.entries()
            .iter()
            .filter(|c| c.resource == resource && c.user_name == user_name)
            .count()
    }

    fn entries(&self) -> MutexGuard<'_, Vec<Credential>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl VaultProvider for MemoryVault {
    fn add(&self, credential: &Credential) -> Result<(), VaultError> {
        if credential.password().is_none() {
            return Err(VaultError::InvalidInput(format!(
                "credential '{}' has no password",
                credential.user_name
            )));
        }
        self.entries().push(credential.clone());
        Ok(())
    }

    fn remove(&self, credential: &Credential) -> Result<(), VaultError> {
        let mut entries = self.entries();
        let pos = entries
            .iter()
            .position(|c| c.same_entry(credential))
            .ok_or(VaultError::NotFound)?;
        entries.remove(pos);
        Ok(())
    }

    fn find_all_by_resource(&self, resource: &str) -> Result<Vec<Credential>, VaultError> {
        let found: Vec<Credential> = self
            .entries()
            .iter()
            .filter(|c| c.resource == resource)
            .map(Credential::to_metadata)
            .collect();

        if found.is_empty() {
            return Err(VaultError::NotFound);
        }
        Ok(found)
    }

    fn retrieve_password(&self, credential: &mut Credential) -> Result<(), VaultError> {
        let entries = self.entries();
        let stored = entries
            .iter()
            .find(|c| c.same_entry(credential))
            .and_then(Credential::password)
            .ok_or(VaultError::NotFound)?;
        credential.set_password(stored);
        Ok(())
    }
}
