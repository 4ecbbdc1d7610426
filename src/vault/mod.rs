//! Vault module — credential records, providers, and the store facade.
//!
//! This module provides:
//! - `Credential`, the record a vault holds (`credential`)
//! - The `VaultProvider` capability (`provider`)
//! - `MemoryVault`, an in-process provider (`memory`)
//! - `SecretStore`, the set/get/remove/clear facade (`store`)

pub mod credential;
pub mod memory;
pub mod provider;
pub mod store;

pub use credential::Credential;
pub use memory::MemoryVault;
pub use provider::VaultProvider;
pub use store::SecretStore;
