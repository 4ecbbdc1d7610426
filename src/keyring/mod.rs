//! OS keyring vault provider.
//!
//! Stores each credential in the operating system's secure credential
//! store, with the resource name as the service and the key as the user:
//! - macOS: Keychain
//! - Windows: Credential Manager
//! - Linux: kernel keyutils
//!
//! The `keyring` crate cannot enumerate a service, so the provider keeps
//! a key index as one more entry under the same service. The index holds
//! key names only, never values.

use crate::errors::VaultError;
use crate::vault::{Credential, VaultProvider};

/// User name of the index entry. Not usable as a key.
pub const INDEX_USER: &str = "__encrypted_storage_index__";

/// Vault provider backed by `keyring::Entry`.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyringVault;

impl KeyringVault {
    pub fn new() -> Self {
        Self
    }

    fn read_index(&self, resource: &str) -> Result<Vec<String>, VaultError> {
        match entry(resource, INDEX_USER)?.get_password() {
            Ok(raw) => parse_index(&raw),
            Err(keyring::Error::NoEntry) => Ok(Vec::new()),
            Err(e) => Err(map_keyring_error(e)),
        }
    }

    fn write_index(&self, resource: &str, keys: &[String]) -> Result<(), VaultError> {
        let index = entry(resource, INDEX_USER)?;

        if keys.is_empty() {
            return match index.delete_credential() {
                Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
                Err(e) => Err(map_keyring_error(e)),
            };
        }

        let raw = serde_json::to_string(keys)
            .map_err(|e| VaultError::Platform(format!("failed to encode key index: {e}")))?;
        index.set_password(&raw).map_err(map_keyring_error)
    }
}

impl VaultProvider for KeyringVault {
    fn add(&self, credential: &Credential) -> Result<(), VaultError> {
        check_user_name(&credential.user_name)?;
        let password = credential.password().ok_or_else(|| {
            VaultError::InvalidInput(format!(
                "credential '{}' has no password",
                credential.user_name
            ))
        })?;

        entry(&credential.resource, &credential.user_name)?
            .set_password(password)
            .map_err(map_keyring_error)?;

        let mut keys = self.read_index(&credential.resource)?;
        if !keys.contains(&credential.user_name) {
            keys.push(credential.user_name.clone());
            self.write_index(&credential.resource, &keys)?;
        }
        Ok(())
    }

    fn remove(&self, credential: &Credential) -> Result<(), VaultError> {
        check_user_name(&credential.user_name)?;

        let deleted = match entry(&credential.resource, &credential.user_name)?.delete_credential()
        {
            Ok(()) => true,
            Err(keyring::Error::NoEntry) => false,
            Err(e) => return Err(map_keyring_error(e)),
        };

        let mut keys = self.read_index(&credential.resource)?;
        let before = keys.len();
        keys.retain(|k| k != &credential.user_name);
        let indexed = keys.len() != before;

        if indexed {
            self.write_index(&credential.resource, &keys)?;
        }

        if deleted || indexed {
            Ok(())
        } else {
            Err(VaultError::NotFound)
        }
    }

    fn find_all_by_resource(&self, resource: &str) -> Result<Vec<Credential>, VaultError> {
        let keys = self.read_index(resource)?;
        if keys.is_empty() {
            return Err(VaultError::NotFound);
        }
        Ok(keys
            .into_iter()
            .map(|key| Credential::metadata(resource, key))
            .collect())
    }

    fn retrieve_password(&self, credential: &mut Credential) -> Result<(), VaultError> {
        let password = entry(&credential.resource, &credential.user_name)?
            .get_password()
            .map_err(map_keyring_error)?;
        credential.set_password(password);
        Ok(())
    }
}

fn entry(resource: &str, user_name: &str) -> Result<keyring::Entry, VaultError> {
    keyring::Entry::new(resource, user_name).map_err(map_keyring_error)
}

fn check_user_name(user_name: &str) -> Result<(), VaultError> {
    if user_name == INDEX_USER {
        return Err(VaultError::InvalidInput(format!(
            "'{INDEX_USER}' is reserved"
        )));
    }
    Ok(())
}

fn parse_index(raw: &str) -> Result<Vec<String>, VaultError> {
    serde_json::from_str(raw)
        .map_err(|e| VaultError::Platform(format!("key index is corrupt: {e}")))
}

fn map_keyring_error(err: keyring::Error) -> VaultError {
    match err {
        keyring::Error::NoEntry => VaultError::NotFound,
        keyring::Error::NoStorageAccess(e) => VaultError::AccessDenied(e.to_string()),
        keyring::Error::TooLong(attr, limit) => {
            VaultError::CapacityExceeded(format!("{attr} is longer than {limit}"))
        }
        keyring::Error::Invalid(attr, reason) => {
            VaultError::InvalidInput(format!("{attr}: {reason}"))
        }
        keyring::Error::PlatformFailure(e) => VaultError::Unavailable(e.to_string()),
        other => VaultError::Platform(other.to_string()),
    }
}
