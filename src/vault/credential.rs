//! The `Credential` record a vault provider stores and enumerates.
//!
//! Enumeration hands out credentials with no password attached; the value
//! is only materialized by an explicit `VaultProvider::retrieve_password`
//! call. Password text is wiped from memory when the credential drops.

use std::fmt;

use zeroize::Zeroizing;

/// A single (resource, user name) → password record.
#[derive(Clone)]
pub struct Credential {
    /// Namespace the entry is filed under.
    pub resource: String,

    /// The logical key of the secret.
    pub user_name: String,

    password: Option<Zeroizing<String>>,
}

impl Credential {
    /// Build a credential carrying its secret value, ready to be added.
    pub fn new(
        resource: impl Into<String>,
        user_name: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            resource: resource.into(),
            user_name: user_name.into(),
            password: Some(Zeroizing::new(password.into())),
        }
    }

    /// Build a metadata-only credential, as returned by enumeration.
    pub fn metadata(resource: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            user_name: user_name.into(),
            password: None,
        }
    }

    /// The secret value, if it has been retrieved.
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref().map(String::as_str)
    }

    /// Attach a retrieved secret value.
    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = Some(Zeroizing::new(password.into()));
    }

    /// Take the secret value out, leaving the credential metadata-only.
    pub fn take_password(&mut self) -> Option<String> {
        self.password.take().map(|mut p| std::mem::take(&mut *p))
    }

    /// A copy with the secret value stripped.
    pub fn to_metadata(&self) -> Self {
        Self::metadata(self.resource.clone(), self.user_name.clone())
    }

    /// `true` when both refer to the same (resource, user name) slot.
    pub fn same_entry(&self, other: &Credential) -> bool {
        self.resource == other.resource && self.user_name == other.user_name
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("resource", &self.resource)
            .field("user_name", &self.user_name)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
