use thiserror::Error;

/// Failure reported by a vault provider.
///
/// This is the *cause* attached to every operation-level error; it never
/// reaches the host on its own.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VaultError {
    #[error("no matching credential in the vault")]
    NotFound,

    #[error("access to the credential vault was denied: {0}")]
    AccessDenied(String),

    #[error("the credential vault rejected the input: {0}")]
    InvalidInput(String),

    #[error("the credential vault is full: {0}")]
    CapacityExceeded(String),

    #[error("the credential vault is unavailable: {0}")]
    Unavailable(String),

    #[error("platform credential error: {0}")]
    Platform(String),
}

/// Stable classification of a `StorageError`.
///
/// The code is what the host bridge puts in a rejection payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    StoreFailed,
    RetrieveFailed,
    RemoveFailed,
    ClearFailed,
    ListingFailed,
    Config,
    Io,
    Serialization,
    CommandFailed,
    Audit,
}

impl ErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            Self::StoreFailed => "STORE_FAILED",
            Self::RetrieveFailed => "RETRIEVE_FAILED",
            Self::RemoveFailed => "REMOVE_FAILED",
            Self::ClearFailed => "CLEAR_FAILED",
            Self::ListingFailed => "LISTING_FAILED",
            Self::Config => "CONFIG_ERROR",
            Self::Io => "IO_ERROR",
            Self::Serialization => "SERIALIZATION_ERROR",
            Self::CommandFailed => "COMMAND_FAILED",
            Self::Audit => "AUDIT_ERROR",
        }
    }
}

/// All errors that can occur in encrypted-storage.
#[derive(Debug, Error)]
pub enum StorageError {
    // --- Store operations ---
    #[error("An error occurred while saving {key}")]
    StoreFailed {
        key: String,
        #[source]
        cause: VaultError,
    },

    #[error("An error occurred while getting {key}")]
    RetrieveFailed {
        key: String,
        #[source]
        cause: VaultError,
    },

    #[error("An error occurred while removing {key}")]
    RemoveFailed {
        key: String,
        #[source]
        cause: VaultError,
    },

    #[error("An error occurred while clearing store")]
    ClearFailed {
        #[source]
        cause: VaultError,
    },

    #[error("An error occurred while listing store")]
    ListingFailed {
        #[source]
        cause: VaultError,
    },

    // --- Config errors ---
    #[error("Config file error: {0}")]
    Config(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    Serialization(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Audit error: {0}")]
    AuditError(String),
}

impl StorageError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::StoreFailed { .. } => ErrorKind::StoreFailed,
            Self::RetrieveFailed { .. } => ErrorKind::RetrieveFailed,
            Self::RemoveFailed { .. } => ErrorKind::RemoveFailed,
            Self::ClearFailed { .. } => ErrorKind::ClearFailed,
            Self::ListingFailed { .. } => ErrorKind::ListingFailed,
            Self::Config(_) => ErrorKind::Config,
            Self::Io(_) => ErrorKind::Io,
            Self::Serialization(_) => ErrorKind::Serialization,
            Self::CommandFailed(_) => ErrorKind::CommandFailed,
            Self::AuditError(_) => ErrorKind::Audit,
        }
    }

    /// The vault-level cause, for the four store operations and listing.
    pub fn cause(&self) -> Option<&VaultError> {
        match self {
            Self::StoreFailed { cause, .. }
            | Self::RetrieveFailed { cause, .. }
            | Self::RemoveFailed { cause, .. }
            | Self::ClearFailed { cause }
            | Self::ListingFailed { cause } => Some(cause),
            _ => None,
        }
    }
}

/// Convenience type alias for encrypted-storage results.
pub type Result<T> = std::result::Result<T, StorageError>;
