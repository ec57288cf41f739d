//! Audit log — SQLite-based operation history.
//!
//! Stores a record of every vault operation (create, edit, delete, view,
//! backup, failed logins...) in a local SQLite database at
//! `<vault_dir>/audit.db`.  Only container names and short details are
//! recorded, never content.
//!
//! Designed for graceful degradation: if the database can't be opened or
//! written to, operations silently continue without logging.  Built only
//! with the `audit-log` feature; without it `log_event` is a no-op.

use std::path::Path;
#[cfg(feature = "audit-log")]
use std::path::PathBuf;

use chrono::{DateTime, Utc};

#[cfg(feature = "audit-log")]
use rusqlite::Connection;

#[cfg(feature = "audit-log")]
use crate::errors::SecureBoxError;
use crate::errors::Result;

/// A single audit log entry.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub operation: String,
    pub container: Option<String>,
    pub details: Option<String>,
}

/// SQLite-backed audit log.
#[cfg(feature = "audit-log")]
pub struct AuditLog {
    conn: Connection,
}

#[cfg(feature = "audit-log")]
impl AuditLog {
    /// Open (or create) the audit database at `<vault_dir>/audit.db`.
    ///
    /// Returns `None` if the database can't be opened; callers should
    /// treat this as "audit logging unavailable" and continue normally.
    pub fn open(vault_dir: &Path) -> Option<Self> {
        let db_path = Self::db_path(vault_dir);
        let conn = Connection::open(&db_path).ok()?;

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
                container   TEXT,
                details     TEXT
            );",
        )
        .ok()?;

        Some(Self { conn })
    }

    /// Record an operation. Errors are ignored.
    pub fn log(&self, operation: &str, container: Option<&str>, details: Option<&str>) {
        let now = Utc::now().to_rfc3339();
        let _ = self.conn.execute(
            "INSERT INTO audit_log (timestamp, operation, container, details)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![now, operation, container, details],
        );
    }

    /// Query recent audit entries, most recent first.
    ///
    /// - `limit`: maximum number of entries to return.
    /// - `since`: if provided, only return entries newer than this timestamp.
    pub fn query(&self, limit: usize, since: Option<DateTime<Utc>>) -> Result<Vec<AuditEntry>> {
        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        let (sql, params): (&str, Vec<Box<dyn rusqlite::types::ToSql>>) = match since {
            Some(ref ts) => (
                "SELECT id, timestamp, operation, container, details
                 FROM audit_log
                 WHERE timestamp >= ?1
                 ORDER BY id DESC
                 LIMIT ?2",
                vec![
                    Box::new(ts.to_rfc3339()) as Box<dyn rusqlite::types::ToSql>,
                    Box::new(limit_i64),
                ],
            ),
            None => (
                "SELECT id, timestamp, operation, container, details
                 FROM audit_log
                 ORDER BY id DESC
                 LIMIT ?1",
                vec![Box::new(limit_i64) as Box<dyn rusqlite::types::ToSql>],
            ),
        };

        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| SecureBoxError::Audit(format!("query prepare: {e}")))?;

        let params_refs: Vec<&dyn rusqlite::types::ToSql> = params.iter().map(|p| &**p).collect();

        let rows = stmt
            .query_map(params_refs.as_slice(), |row| {
                let ts_str: String = row.get(1)?;
                let timestamp = DateTime::parse_from_rfc3339(&ts_str)
                    .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

                Ok(AuditEntry {
                    id: row.get(0)?,
                    timestamp,
                    operation: row.get(2)?,
                    container: row.get(3)?,
                    details: row.get(4)?,
                })
            })
            .map_err(|e| SecureBoxError::Audit(format!("query exec: {e}")))?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row.map_err(|e| SecureBoxError::Audit(format!("row parse: {e}")))?);
        }

        Ok(entries)
    }

    /// Path to the audit database inside a vault directory.
    pub fn db_path(vault_dir: &Path) -> PathBuf {
        vault_dir.join("audit.db")
    }
}

/// Log an event for the vault in `vault_dir`, ignoring every failure.
///
/// Never fails the calling command.
/// The directory must already exist; nothing is created for a vault
/// that was never initialized.
pub fn log_event(vault_dir: &Path, op: &str, container: Option<&str>, details: Option<&str>) {
    #[cfg(feature = "audit-log")]
    {
        if !vault_dir.is_dir() {
            return;
        }
        if let Some(audit) = AuditLog::open(vault_dir) {
            audit.log(op, container, details);
        }
    }

    #[cfg(not(feature = "audit-log"))]
    let _ = (vault_dir, op, container, details);
}

/// Read recent entries for the vault in `vault_dir`.
///
/// A vault without an audit database simply has no entries.
#[cfg(feature = "audit-log")]
pub fn recent_entries(
    vault_dir: &Path,
    limit: usize,
    since: Option<DateTime<Utc>>,
) -> Result<Vec<AuditEntry>> {
    if !AuditLog::db_path(vault_dir).exists() {
        return Ok(Vec::new());
    }
    let audit = AuditLog::open(vault_dir)
        .ok_or_else(|| SecureBoxError::Audit("failed to open audit database".into()))?;
    audit.query(limit, since)
}

#[cfg(not(feature = "audit-log"))]
pub fn recent_entries(
    _vault_dir: &Path,
    _limit: usize,
    _since: Option<DateTime<Utc>>,
) -> Result<Vec<AuditEntry>> {
    Err(crate::errors::SecureBoxError::Audit(
        "this build has no audit log (enable the `audit-log` feature)".into(),
    ))
}
