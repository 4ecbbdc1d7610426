//! The secret store facade used by the CLI and the host bridge.
//!
//! `SecretStore` maps a key to a secret value under one fixed resource
//! name. It keeps no cache: every call re-reads the vault through the
//! injected `VaultProvider`.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::{ListingPolicy, Settings, DEFAULT_RESOURCE_NAME};
use crate::errors::{Result, StorageError, VaultError};

use super::credential::Credential;
use super::provider::VaultProvider;

pub struct SecretStore {
    provider: Box<dyn VaultProvider>,

    /// Resource name every entry is filed under.
    resource: String,

    policy: ListingPolicy,

    /// Serializes whole operations so a replacing `set` is never observed
    /// half-done and two writers never both insert the same key.
    op_lock: Mutex<()>,
}

impl SecretStore {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Store over `provider` with the default resource name and the
    /// lenient listing policy.
    pub fn new(provider: impl VaultProvider + 'static) -> Self {
        Self::from_boxed(Box::new(provider))
    }

    pub fn from_boxed(provider: Box<dyn VaultProvider>) -> Self {
        Self {
            provider,
            resource: DEFAULT_RESOURCE_NAME.to_string(),
            policy: ListingPolicy::default(),
            op_lock: Mutex::new(()),
        }
    }

    /// Store configured from project settings.
    pub fn from_settings(provider: Box<dyn VaultProvider>, settings: &Settings) -> Self {
        Self::from_boxed(provider)
            .with_resource(settings.resource_name.clone())
            .with_listing_policy(settings.listing_policy)
    }

    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = resource.into();
        self
    }

    pub fn with_listing_policy(mut self, policy: ListingPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn listing_policy(&self) -> ListingPolicy {
        self.policy
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Store `value` under `key`, replacing any existing entry.
    ///
    /// Returns the stored value.
    pub fn set_item(&self, key: &str, value: &str) -> Result<String> {
        let _guard = self.lock();

        let store_failed = |cause| StorageError::StoreFailed {
            key: key.to_string(),
            cause,
        };

        if let Some(existing) = self.find(key).map_err(store_failed)? {
            self.provider.remove(&existing).map_err(store_failed)?;
        }

        let credential = Credential::new(self.resource.as_str(), key, value);
        self.provider.add(&credential).map_err(store_failed)?;

        Ok(value.to_string())
    }

    /// Fetch the value stored under `key`, or `None` if there is none.
    pub fn get_item(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock();

        let retrieve_failed = |cause| StorageError::RetrieveFailed {
            key: key.to_string(),
            cause,
        };

        let Some(mut credential) = self.find(key).map_err(retrieve_failed)? else {
            return Ok(None);
        };

        self.provider
            .retrieve_password(&mut credential)
            .map_err(retrieve_failed)?;

        // A provider that "succeeds" without filling the slot has nothing
        // to give us.
        credential
            .take_password()
            .map(Some)
            .ok_or_else(|| retrieve_failed(VaultError::NotFound))
    }

    /// Delete the entry for `key` if there is one. Returns `key` either way.
    pub fn remove_item(&self, key: &str) -> Result<String> {
        let _guard = self.lock();

        let remove_failed = |cause| StorageError::RemoveFailed {
            key: key.to_string(),
            cause,
        };

        if let Some(existing) = self.find(key).map_err(remove_failed)? {
            self.provider.remove(&existing).map_err(remove_failed)?;
        }

        Ok(key.to_string())
    }

    /// Delete every entry under the store's resource.
    ///
    /// Stops at the first failing removal; entries already removed stay
    /// removed.
    pub fn clear(&self) -> Result<()> {
        let _guard = self.lock();

        let credentials = self
            .find_all()
            .map_err(|cause| StorageError::ClearFailed { cause })?;

        for credential in &credentials {
            self.provider
                .remove(credential)
                .map_err(|cause| StorageError::ClearFailed { cause })?;
        }

        Ok(())
    }

    /// Keys currently stored, in vault order. Values are never retrieved.
    pub fn keys(&self) -> Result<Vec<String>> {
        let _guard = self.lock();

        let credentials = self
            .find_all()
            .map_err(|cause| StorageError::ListingFailed { cause })?;

        Ok(credentials.into_iter().map(|c| c.user_name).collect())
    }

    // ------------------------------------------------------------------
    // Lookup helpers
    // ------------------------------------------------------------------

    /// Enumerate the resource, applying the listing policy.
    ///
    /// Lenient: any listing error reads as an empty resource, so "nothing
    /// stored" and "vault unreachable" look the same.
    /// Strict: only `NotFound` reads as empty.
    fn find_all(&self) -> std::result::Result<Vec<Credential>, VaultError> {
        match self.provider.find_all_by_resource(&self.resource) {
            Ok(credentials) => Ok(credentials),
            Err(VaultError::NotFound) => Ok(Vec::new()),
            Err(_) if self.policy == ListingPolicy::Lenient => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// First enumerated entry whose user name equals `key`.
    fn find(&self, key: &str) -> std::result::Result<Option<Credential>, VaultError> {
        Ok(self
            .find_all()?
            .into_iter()
            .find(|c| c.user_name == key))
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.op_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
