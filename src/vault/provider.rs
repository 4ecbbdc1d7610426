//! The vault provider capability the store is built on.

use std::sync::Arc;

use crate::errors::VaultError;

use super::credential::Credential;

/// A platform credential vault.
///
/// Implementations are free to allow several entries for the same
/// (resource, user name) pair and to report an empty resource as
/// `VaultError::NotFound`; `SecretStore` copes with both.
pub trait VaultProvider: Send + Sync {
    /// Persist `credential`, which must carry a password.
    fn add(&self, credential: &Credential) -> Result<(), VaultError>;

    /// Delete the entry `credential` refers to.
    fn remove(&self, credential: &Credential) -> Result<(), VaultError>;

    /// List every entry under `resource`, without passwords.
    fn find_all_by_resource(&self, resource: &str) -> Result<Vec<Credential>, VaultError>;

    /// Fill in the password of a credential obtained from enumeration.
    fn retrieve_password(&self, credential: &mut Credential) -> Result<(), VaultError>;
}

impl<T: VaultProvider + ?Sized> VaultProvider for Arc<T> {
    fn add(&self, credential: &Credential) -> Result<(), VaultError> {
        (**self).add(credential)
    }

    fn remove(&self, credential: &Credential) -> Result<(), VaultError> {
        (**self).remove(credential)
    }

    fn find_all_by_resource(&self, resource: &str) -> Result<Vec<Credential>, VaultError> {
        (**self).find_all_by_resource(resource)
    }

    fn retrieve_password(&self, credential: &mut Credential) -> Result<(), VaultError> {
        (**self).retrieve_password(credential)
    }
}
