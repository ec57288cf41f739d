//! Off-site copies of the sealed vault file.
//!
//! A backup target only ever sees the sealed vault file as an opaque
//! blob.  Before handing it over, `backup_vault` checks that the file on
//! disk opens under the session key, so a half-written or foreign file
//! is never shipped.  `restore_vault` applies the same check to the
//! downloaded blob before it replaces the local vault.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::info;

use crate::errors::{Result, SecureBoxError};
use crate::vault::context::VaultContext;
use crate::vault::persistence::{self, write_atomic};

/// Somewhere sealed vault blobs can be stored and fetched back.
pub trait BackupTarget {
    /// Store `data` under a new identifier and return that identifier.
    fn upload(&self, data: &[u8]) -> Result<String>;

    /// Fetch the blob stored under `id`.
    fn download(&self, id: &str) -> Result<Vec<u8>>;

    /// Identifier of the most recent backup, if any.
    fn latest(&self) -> Result<Option<String>>;
}

/// Prefix and suffix of backup file names in a `DirectoryBackup`.
const BACKUP_PREFIX: &str = "vault-";
const BACKUP_SUFFIX: &str = ".dat";

/// Timestamped copies in a local directory (e.g. a synced folder).
///
/// Identifiers are file names like `vault-20260101T120000.123456Z.dat`,
/// which sort chronologically.
pub struct DirectoryBackup {
    dir: PathBuf,
}

impl DirectoryBackup {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> Result<PathBuf> {
        let valid = id.starts_with(BACKUP_PREFIX)
            && id.ends_with(BACKUP_SUFFIX)
            && !id.contains(['/', '\\'])
            && !id.contains("..");
        if !valid {
            return Err(SecureBoxError::Backup(format!(
                "'{id}' is not a backup identifier"
            )));
        }
        Ok(self.dir.join(id))
    }
}

impl BackupTarget for DirectoryBackup {
    fn upload(&self, data: &[u8]) -> Result<String> {
        fs::create_dir_all(&self.dir)?;

        let stamp = Utc::now().format("%Y%m%dT%H%M%S%.6fZ");
        let id = format!("{BACKUP_PREFIX}{stamp}{BACKUP_SUFFIX}");
        write_atomic(&self.dir.join(&id), data)?;
        Ok(id)
    }

    fn download(&self, id: &str) -> Result<Vec<u8>> {
        let path = self.path_for(id)?;
        if !path.exists() {
            return Err(SecureBoxError::Backup(format!("backup '{id}' not found")));
        }
        Ok(fs::read(path)?)
    }

    fn latest(&self) -> Result<Option<String>> {
        if !self.dir.exists() {
            return Ok(None);
        }

        let mut ids: Vec<String> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.starts_with(BACKUP_PREFIX) && name.ends_with(BACKUP_SUFFIX))
            .collect();
        ids.sort();
        Ok(ids.pop())
    }
}

/// Hand the sealed vault file to `target` and return the backup id.
///
/// Fails if there is nothing to back up or the file does not open under
/// the session key.
pub fn backup_vault(ctx: &VaultContext, target: &dyn BackupTarget) -> Result<String> {
    let path = ctx.paths().data();
    if !path.exists() || fs::metadata(path)?.len() == 0 {
        return Err(SecureBoxError::Backup(
            "vault file is empty — nothing to back up".into(),
        ));
    }

    let data = fs::read(path)?;
    let text = std::str::from_utf8(&data)
        .map_err(|_| SecureBoxError::Backup("vault file is not envelope text".into()))?;
    let store = persistence::decode(text, ctx.key())?;

    let id = target.upload(&data)?;
    info!(id = %id, containers = store.len(), "vault backed up");
    Ok(id)
}

/// Replace the local vault with backup `id` from `target`.
///
/// Returns the number of containers in the restored vault.  The blob
/// must open under the current session key.
pub fn restore_vault(ctx: &VaultContext, target: &dyn BackupTarget, id: &str) -> Result<usize> {
    let data = target.download(id)?;
    let text = std::str::from_utf8(&data)
        .map_err(|_| SecureBoxError::Backup(format!("backup '{id}' is not envelope text")))?;

    let store = persistence::decode(text, ctx.key()).map_err(|_| {
        SecureBoxError::Backup(format!(
            "backup '{id}' does not open with this password and salt"
        ))
    })?;

    write_atomic(ctx.paths().data(), &data)?;
    info!(id = %id, containers = store.len(), "vault restored");
    Ok(store.len())
}
