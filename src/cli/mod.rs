//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use clap::Parser;
use clap_complete::Shell;

use crate::audit::Auditor;
use crate::config::{Backend, ListingPolicy, Settings};
use crate::errors::{Result, StorageError};
use crate::vault::{MemoryVault, SecretStore, VaultProvider};

/// encrypted-storage CLI: key/value secrets in the OS credential vault.
#[derive(Parser)]
#[command(
    name = "encrypted-storage",
    about = "Key/value secret storage backed by the OS credential vault",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault backend (default: from config, else keyring)
    #[arg(long, value_enum, global = true, env = "ENCRYPTED_STORAGE_BACKEND")]
    pub backend: Option<Backend>,

    /// Report vault listing failures instead of treating them as empty
    #[arg(long, global = true)]
    pub strict: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Store a secret (replaces any existing value)
    Set {
        /// Secret key
        key: String,
        /// Secret value (omit for piped input or interactive prompt)
        value: Option<String>,
    },

    /// Print a secret's value
    Get {
        /// Secret key
        key: String,
    },

    /// Remove a secret (succeeds if it does not exist)
    Remove {
        /// Secret key
        key: String,
    },

    /// Remove every secret in the store
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// List stored keys (values are not read)
    List,

    /// Answer host method calls as line-delimited JSON on stdin/stdout
    Serve,

    /// View the audit log of store operations
    Audit {
        /// Number of entries to show
        #[arg(long, default_value = "50")]
        last: usize,
        /// Show entries since a duration ago (e.g. 7d, 24h, 30m)
        #[arg(long)]
        since: Option<String>,
    },

    /// Generate shell completion scripts
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Everything a command needs: settings, the store, and the audit handle.
pub struct Session {
    pub settings: Settings,
    pub store: SecretStore,
    pub auditor: Auditor,
}

/// Load settings from the current directory and apply CLI overrides.
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    let cwd = std::env::current_dir()?;
    let mut settings = Settings::load(&cwd)?;

    if let Some(backend) = cli.backend {
        settings.backend = backend;
    }
    if cli.strict {
        settings.listing_policy = ListingPolicy::Strict;
    }

    Ok(settings)
}

/// Build the vault provider selected by `backend`.
pub fn open_provider(backend: Backend) -> Result<Box<dyn VaultProvider>> {
    match backend {
        Backend::Memory => Ok(Box::new(MemoryVault::new())),

        #[cfg(feature = "keyring-store")]
        Backend::Keyring => Ok(Box::new(crate::keyring::KeyringVault::new())),

        #[cfg(not(feature = "keyring-store"))]
        Backend::Keyring => Err(StorageError::CommandFailed(
            "keyring support not compiled — rebuild with `--features keyring-store`".into(),
        )),
    }
}

/// Open the store described by the CLI and config file.
///
/// The audit log is only opened (and created on disk) when `audited` is
/// set; read-only commands get a disabled auditor.
pub fn open_session(cli: &Cli, audited: bool) -> Result<Session> {
    let settings = load_settings(cli)?;
    let provider = open_provider(settings.backend)?;
    let store = SecretStore::from_settings(provider, &settings);

    let auditor = if audited {
        Auditor::open(&settings, &std::env::current_dir()?)
    } else {
        Auditor::disabled(settings.resource_name.clone())
    };

    Ok(Session {
        settings,
        store,
        auditor,
    })
}

/// Warn when a one-shot command runs against a store that dies with it.
pub fn warn_if_ephemeral(settings: &Settings) {
    if settings.backend == Backend::Memory {
        output::warning("Memory backend — nothing is kept after this command exits.");
    }
}

/// Reject keys that would be unusable from a shell.
pub fn validate_key(key: &str) -> Result<()> {
    if key.chars().any(char::is_control) {
        return Err(StorageError::CommandFailed(format!(
            "key {key:?} contains control characters"
        )));
    }
    Ok(())
}
