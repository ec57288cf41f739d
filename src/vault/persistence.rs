//! Sealed vault file: whole-store load and save.
//!
//! The vault file holds a single envelope (see `crypto::envelope`) whose
//! plaintext is this JSON document:
//!
//! ```text
//! { "version": 1, "containers": [ { name, content, signature, created_at, updated_at }, ... ] }
//! ```
//!
//! Containers are written sorted by name.  A missing or zero-length file
//! is an empty vault; anything else that fails to open or parse is a
//! `VaultLoad` error.
//!
//! Saves go through a temp file in the same directory followed by a
//! rename, so a crash leaves either the old file or the new one.  There
//! is no journal and no locking.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::Zeroizing;

use super::container::Container;
use super::store::ContainerStore;
use crate::crypto::envelope::{open, seal};
use crate::crypto::keys::DerivedKey;
use crate::errors::{Result, SecureBoxError};

/// Current vault document version.
pub const DOCUMENT_VERSION: u8 = 1;

#[derive(Serialize)]
struct VaultDocumentRef<'a> {
    version: u8,
    containers: Vec<&'a Container>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct VaultDocument {
    version: u8,
    containers: Vec<Container>,
}

/// Load the vault at `path` under `key`.
pub fn load(path: &Path, key: &DerivedKey) -> Result<ContainerStore> {
    if !path.exists() {
        debug!(path = %path.display(), "no vault file, starting empty");
        return Ok(ContainerStore::default());
    }

    let bytes = fs::read(path)?;
    if bytes.is_empty() {
        debug!(path = %path.display(), "empty vault file, starting empty");
        return Ok(ContainerStore::default());
    }

    let text = std::str::from_utf8(&bytes)
        .map_err(|_| SecureBoxError::VaultLoad("vault file is not envelope text".into()))?;
    let store = decode(text, key)?;
    debug!(containers = store.len(), "vault loaded");
    Ok(store)
}

/// Seal `store` under `key` and atomically replace the file at `path`.
pub fn save(store: &ContainerStore, path: &Path, key: &DerivedKey) -> Result<()> {
    let text = encode(store, key)?;
    write_atomic(path, text.as_bytes())?;
    debug!(containers = store.len(), "vault saved");
    Ok(())
}

/// Serialize and seal a store into envelope text.
pub fn encode(store: &ContainerStore, key: &DerivedKey) -> Result<String> {
    let doc = VaultDocumentRef {
        version: DOCUMENT_VERSION,
        containers: store.containers().collect(),
    };
    let json = Zeroizing::new(
        serde_json::to_vec(&doc)
            .map_err(|e| SecureBoxError::Serialization(format!("vault: {e}")))?,
    );
    seal(&json, key)
}

/// Open and parse envelope text produced by `encode`.
///
/// Every failure (wrong key, tampering, bad JSON, wrong shape) is a
/// `VaultLoad` error.
pub fn decode(text: &str, key: &DerivedKey) -> Result<ContainerStore> {
    let plaintext = Zeroizing::new(open(text, key).map_err(|_| {
        SecureBoxError::VaultLoad("cannot decrypt — wrong key or corrupted file".into())
    })?);

    let doc: VaultDocument = serde_json::from_slice(&plaintext)
        .map_err(|e| SecureBoxError::VaultLoad(format!("malformed vault document: {e}")))?;

    if doc.version != DOCUMENT_VERSION {
        return Err(SecureBoxError::VaultLoad(format!(
            "unsupported document version {}, expected {DOCUMENT_VERSION}",
            doc.version
        )));
    }

    ContainerStore::from_containers(doc.containers)
}

/// Write `bytes` to a temp file next to `path`, then rename it over `path`.
///
/// The temp file is created owner-only on Unix.  The temp file is in the
/// same directory so the rename stays on one filesystem.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = path.parent().unwrap_or(Path::new("."));
    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    // A leftover temp file from a crashed save would block `create_new`.
    if tmp_path.exists() {
        fs::remove_file(&tmp_path)?;
    }

    #[cfg(unix)]
    let mut file = {
        use std::os::unix::fs::OpenOptionsExt;
        fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .mode(0o600)
            .open(&tmp_path)?
    };

    #[cfg(not(unix))]
    let mut file = fs::File::create(&tmp_path)?;

    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);

    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::KEY_LEN;
    use tempfile::TempDir;

    fn key(byte: u8) -> DerivedKey {
        DerivedKey::new([byte; KEY_LEN])
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = load(&dir.path().join("vault.dat"), &key(1)).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn zero_length_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.dat");
        fs::write(&path, b"").unwrap();
        assert!(load(&path, &key(1)).unwrap().is_empty());
    }

    #[test]
    fn whitespace_only_file_is_vault_load_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.dat");
        fs::write(&path, b"  \n").unwrap();
        assert!(matches!(
            load(&path, &key(1)),
            Err(SecureBoxError::VaultLoad(_))
        ));
    }

    #[test]
    fn binary_file_is_vault_load_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.dat");
        fs::write(&path, [0xFF, 0xFE, 0x00, 0x80]).unwrap();
        assert!(matches!(
            load(&path, &key(1)),
            Err(SecureBoxError::VaultLoad(_))
        ));
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.dat");

        let mut store = ContainerStore::default();
        store.create("wifi", "ssid=home;pass=abc123").unwrap();
        store.create("bank", "pin=0000").unwrap();
        save(&store, &path, &key(2)).unwrap();

        let loaded = load(&path, &key(2)).unwrap();
        assert_eq!(loaded.list(), vec!["bank", "wifi"]);
        assert_eq!(loaded.view("wifi").unwrap(), "ssid=home;pass=abc123");
    }

    #[test]
    fn file_on_disk_is_envelope_text() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.dat");

        let mut store = ContainerStore::default();
        store.create("wifi", "ssid=home;pass=abc123").unwrap();
        save(&store, &path, &key(3)).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("wifi"));
        assert!(!raw.contains("abc123"));
        assert!(!dir.path().join(".vault.dat.tmp").exists());
    }

    #[test]
    fn wrong_key_is_vault_load_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.dat");
        save(&ContainerStore::default(), &path, &key(4)).unwrap();

        assert!(matches!(
            load(&path, &key(5)),
            Err(SecureBoxError::VaultLoad(_))
        ));
    }

    #[test]
    fn wrong_shape_is_vault_load_error() {
        let k = key(6);
        let sealed = seal(br#"{"wifi":"plain string"}"#, &k).unwrap();
        assert!(matches!(decode(&sealed, &k), Err(SecureBoxError::VaultLoad(_))));

        let sealed = seal(br#"{"version":9,"containers":[]}"#, &k).unwrap();
        let err = decode(&sealed, &k).unwrap_err();
        assert!(err.to_string().contains("unsupported document version"));
    }

    #[cfg(unix)]
    #[test]
    fn saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.dat");
        save(&ContainerStore::default(), &path, &key(7)).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
