use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{Result, StorageError};

/// Resource name every entry is filed under unless the config overrides it.
pub const DEFAULT_RESOURCE_NAME: &str = "RN_ENCRYPTED_STORAGE_VAULT";

/// Which vault provider backs the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// The operating system's credential store.
    Keyring,
    /// Process-local storage, lost on exit.
    Memory,
}

impl Default for Backend {
    fn default() -> Self {
        if cfg!(feature = "keyring-store") {
            Self::Keyring
        } else {
            Self::Memory
        }
    }
}

/// What enumeration does when the vault's listing call fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingPolicy {
    /// Any listing error reads as "no entries".
    #[default]
    Lenient,
    /// Only `NotFound` reads as "no entries"; other errors surface.
    Strict,
}

/// Project-level configuration, loaded from `.encrypted-storage.toml`.
///
/// Every field has a default so the tool works without any config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Vault resource name all keys are scoped under.
    #[serde(default = "default_resource_name")]
    pub resource_name: String,

    #[serde(default)]
    pub backend: Backend,

    #[serde(default)]
    pub listing_policy: ListingPolicy,

    /// Directory (relative to project root) holding `audit.db`.
    #[serde(default = "default_audit_dir")]
    pub audit_dir: String,

    /// Record operations in the audit log.
    #[serde(default = "default_audit")]
    pub audit: bool,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_resource_name() -> String {
    DEFAULT_RESOURCE_NAME.to_string()
}

fn default_audit_dir() -> String {
    ".encrypted-storage".to_string()
}

fn default_audit() -> bool {
    true
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            resource_name: default_resource_name(),
            backend: Backend::default(),
            listing_policy: ListingPolicy::default(),
            audit_dir: default_audit_dir(),
            audit: default_audit(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    pub const FILE_NAME: &'static str = ".encrypted-storage.toml";

    /// Load settings from `<project_dir>/.encrypted-storage.toml`.
    ///
    /// A missing file yields defaults; an unparsable one is an error.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            StorageError::Config(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        if settings.resource_name.trim().is_empty() {
            return Err(StorageError::Config(format!(
                "resource_name in {} must not be empty",
                config_path.display()
            )));
        }

        Ok(settings)
    }

    /// Full path of the audit directory for a project.
    pub fn audit_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.audit_dir)
    }
}

// ── Tests ────────────────────────────────────────────────────────────
