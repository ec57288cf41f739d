//! On-disk locations of the files that make up a SecureBox.

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::Result;

/// Raw 16-byte KDF salt.
pub const SALT_FILE: &str = "salt.key";

/// Envelope text of the sealed probe constant.
pub const PROBE_FILE: &str = "probe.key";

/// Envelope text of the sealed vault document.
pub const DATA_FILE: &str = "vault.dat";

/// KDF parameters recorded at setup (TOML).
pub const KDF_FILE: &str = "kdf.toml";

/// The set of files one SecureBox instance owns, all inside one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultPaths {
    dir: PathBuf,
    salt: PathBuf,
    probe: PathBuf,
    data: PathBuf,
    kdf: PathBuf,
}

impl VaultPaths {
    /// Standard file names inside `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            salt: dir.join(SALT_FILE),
            probe: dir.join(PROBE_FILE),
            data: dir.join(DATA_FILE),
            kdf: dir.join(KDF_FILE),
            dir,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn salt(&self) -> &Path {
        &self.salt
    }

    pub fn probe(&self) -> &Path {
        &self.probe
    }

    pub fn data(&self) -> &Path {
        &self.data
    }

    pub fn kdf(&self) -> &Path {
        &self.kdf
    }

    /// Create the vault directory (owner-only on Unix) if it is missing.
    pub fn ensure_dir(&self) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(&self.dir, fs::Permissions::from_mode(0o700))?;
            }
        }
        Ok(())
    }
}
