//! Audit log — SQLite-based operation history.
//!
//! Records every store operation (set, remove, clear, bridge calls) in a
//! local SQLite database at `<audit_dir>/audit.db`. Keys are recorded,
//! values never are.
//!
//! Designed for graceful degradation: if the database can't be opened or
//! written to, operations silently continue without logging. Without the
//! `audit-log` feature every `Auditor` is a no-op.

use std::path::Path;
#[cfg(feature = "audit-log")]
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::config::Settings;
#[cfg(feature = "audit-log")]
use crate::errors::StorageError;
use crate::errors::Result;

/// Outcome column value for a successful operation.
pub const OUTCOME_OK: &str = "ok";
/// Outcome column value for a failed operation.
pub const OUTCOME_ERROR: &str = "error";

/// A single audit log entry.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub operation: String,
    pub resource: String,
    pub key_name: Option<String>,
    pub outcome: String,
    pub details: Option<String>,
}

/// SQLite-backed audit log.
#[cfg(feature = "audit-log")]
pub struct AuditLog {
    conn: rusqlite::Connection,
}

#[cfg(feature = "audit-log")]
impl AuditLog {
    /// Open (or create) the audit database at `<audit_dir>/audit.db`.
    ///
    /// Returns `None` if the database can't be opened — callers should
    /// treat this as "audit logging unavailable" and continue normally.
    pub fn open(audit_dir: &Path) -> Option<Self> {
        let db_path = Self::db_path(audit_dir);
        let conn = rusqlite::Connection::open(&db_path).ok()?;

        // Owner-only access to the audit database.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(&db_path, perms);
        }

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS audit_log (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp   TEXT NOT NULL,
                operation   TEXT NOT NULL,
                resource    TEXT NOT NULL,
                key_name    TEXT,
                outcome     TEXT NOT NULL,
                details     TEXT
            );",
        )
        .ok()?;

        Some(Self { conn })
    }

    /// Record an operation. Fire-and-forget — errors are silently ignored.
    pub fn log(
        &self,
        operation: &str,
        resource: &str,
        key_name: Option<&str>,
        outcome: &str,
        details: Option<&str>,
    ) {
        let now = Utc::now().to_rfc3339();
        let _ = self.conn.execute(
            "INSERT INTO audit_log (timestamp, operation, resource, key_name, outcome, details)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![now, operation, resource, key_name, outcome, details],
        );
    }

    /// Query recent audit entries.
    ///
    /// - `limit`: maximum number of entries to return (most recent first).
    /// - `since`: if provided, only return entries newer than this timestamp.
    pub fn query(&self, limit: usize, since: Option<DateTime<Utc>>) -> Result<Vec<AuditEntry>> {
        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        // An absent bound compares below every RFC 3339 timestamp.
        let since_str = since.map(|ts| ts.to_rfc3339()).unwrap_or_default();

        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, timestamp, operation, resource, key_name, outcome, details
                 FROM audit_log
                 WHERE timestamp >= ?1
                 ORDER BY id DESC
                 LIMIT ?2",
            )
            .map_err(|e| StorageError::AuditError(format!("query prepare: {e}")))?;

        let rows = stmt
            .query_map(rusqlite::params![since_str, limit_i64], |row| {
                let ts_str: String = row.get(1)?;
                let timestamp = DateTime::parse_from_rfc3339(&ts_str)
                    .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

                Ok(AuditEntry {
                    id: row.get(0)?,
                    timestamp,
                    operation: row.get(2)?,
                    resource: row.get(3)?,
                    key_name: row.get(4)?,
                    outcome: row.get(5)?,
                    details: row.get(6)?,
                })
            })
            .map_err(|e| StorageError::AuditError(format!("query exec: {e}")))?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row.map_err(|e| StorageError::AuditError(format!("row parse: {e}")))?);
        }

        Ok(entries)
    }

    pub fn db_path(audit_dir: &Path) -> PathBuf {
        audit_dir.join("audit.db")
    }
}

/// Audit handle bound to one resource name.
///
/// Commands and the host bridge record through this; when auditing is
/// disabled or unavailable, `record` does nothing.
pub struct Auditor {
    resource: String,
    #[cfg(feature = "audit-log")]
    log: Option<AuditLog>,
}

impl Auditor {
    /// An auditor that records nothing.
    pub fn disabled(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            #[cfg(feature = "audit-log")]
            log: None,
        }
    }

    /// Open the audit log configured by `settings` under `project_dir`.
    ///
    /// Creates the audit directory when needed. Never fails: any problem
    /// yields a disabled auditor.
    pub fn open(settings: &Settings, project_dir: &Path) -> Self {
        if !settings.audit {
            return Self::disabled(settings.resource_name.clone());
        }

        #[cfg(feature = "audit-log")]
        {
            let dir = settings.audit_path(project_dir);
            let log = std::fs::create_dir_all(&dir)
                .ok()
                .and_then(|()| AuditLog::open(&dir));
            Self {
                resource: settings.resource_name.clone(),
                log,
            }
        }

        #[cfg(not(feature = "audit-log"))]
        {
            let _ = project_dir;
            Self::disabled(settings.resource_name.clone())
        }
    }

    /// `true` when entries are actually being written.
    pub fn is_enabled(&self) -> bool {
        #[cfg(feature = "audit-log")]
        {
            self.log.is_some()
        }
        #[cfg(not(feature = "audit-log"))]
        {
            false
        }
    }

    /// Record one operation and its result.
    pub fn record<T>(&self, operation: &str, key: Option<&str>, result: &Result<T>) {
        let (outcome, details) = match result {
            Ok(_) => (OUTCOME_OK, None),
            Err(e) => (OUTCOME_ERROR, Some(describe(e))),
        };

        #[cfg(feature = "audit-log")]
        if let Some(log) = &self.log {
            log.log(operation, &self.resource, key, outcome, details.as_deref());
        }

        #[cfg(not(feature = "audit-log"))]
        let _ = (operation, key, outcome, details, &self.resource);
    }

    /// Most recent entries, or an error when auditing is off.
    pub fn recent(&self, limit: usize, since: Option<DateTime<Utc>>) -> Result<Vec<AuditEntry>> {
        #[cfg(feature = "audit-log")]
        {
            match &self.log {
                Some(log) => log.query(limit, since),
                None => Err(StorageError::AuditError(
                    "audit log is disabled or could not be opened".into(),
                )),
            }
        }

        #[cfg(not(feature = "audit-log"))]
        {
            let _ = (limit, since);
            Err(crate::errors::StorageError::AuditError(
                "audit support not compiled — rebuild with `--features audit-log`".into(),
            ))
        }
    }
}

/// Error text for the details column: message plus vault cause.
fn describe(err: &crate::errors::StorageError) -> String {
    match err.cause() {
        Some(cause) => format!("{}: {cause}", err.kind().code()),
        None => format!("{}: {err}", err.kind().code()),
    }
}
