//! Password gate for a SecureBox.
//!
//! The password is never stored.  Instead, first-run setup seals a fixed
//! probe constant under the derived key; a later login derives a
//! candidate key and checks that it opens the probe back to the same
//! constant.  Two states exist:
//!
//! - **Uninitialized** — salt or probe file missing; only `setup` works.
//! - **Initialized** — both present; only `login` works.
//!
//! The KDF parameters used at setup are written to `kdf.toml` and reused
//! by every login; the verifier's own parameters only shape new vaults.

use std::fs;

use subtle::ConstantTimeEq;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::crypto::envelope::{open, seal};
use crate::crypto::kdf::{derive_key, generate_salt, KdfParams, SALT_LEN};
use crate::crypto::keys::DerivedKey;
use crate::errors::{Result, SecureBoxError};
use crate::vault::context::VaultContext;
use crate::vault::paths::VaultPaths;
use crate::vault::persistence::write_atomic;

/// Known plaintext sealed at setup and checked at login.
pub const PROBE: &[u8] = b"SecureBoxTest";

/// Default number of password attempts before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Whether a SecureBox has been set up in a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessState {
    Uninitialized,
    Initialized,
}

/// Setup and login checks for the files in one `VaultPaths`.
pub struct AccessVerifier {
    paths: VaultPaths,
    params: KdfParams,
}

impl AccessVerifier {
    pub fn new(paths: VaultPaths, params: KdfParams) -> Self {
        Self { paths, params }
    }

    pub fn paths(&self) -> &VaultPaths {
        &self.paths
    }

    /// `Initialized` only when both the salt and the probe file exist.
    pub fn state(&self) -> AccessState {
        if self.paths.salt().exists() && self.paths.probe().exists() {
            AccessState::Initialized
        } else {
            AccessState::Uninitialized
        }
    }

    /// First-run setup.
    ///
    /// Fails with `PasswordMismatch` if the two entries differ.  On
    /// success the salt and the sealed probe are on disk and the derived
    /// key is returned for the rest of the session.
    pub fn setup(&self, password: &str, confirmation: &str) -> Result<DerivedKey> {
        self.initialize(password, confirmation).map(|ctx| ctx.key().clone())
    }

    /// Like `setup`, but returns the whole session context.
    pub fn initialize(&self, password: &str, confirmation: &str) -> Result<VaultContext> {
        if self.state() == AccessState::Initialized {
            return Err(SecureBoxError::AlreadyInitialized(
                self.paths.dir().to_path_buf(),
            ));
        }

        // Salt is missing but sealed data exists: a fresh salt would orphan it.
        if fs::metadata(self.paths.data()).is_ok_and(|m| m.len() > 0) {
            return Err(SecureBoxError::AlreadyInitialized(
                self.paths.data().to_path_buf(),
            ));
        }

        let matches: bool = password.as_bytes().ct_eq(confirmation.as_bytes()).into();
        if !matches {
            return Err(SecureBoxError::PasswordMismatch);
        }

        self.paths.ensure_dir()?;

        let salt = generate_salt();
        let key = derive_key(password.as_bytes(), &salt, &self.params)?;
        let sealed_probe = seal(PROBE, &key)?;
        let kdf_record = toml::to_string(&self.params)
            .map_err(|e| SecureBoxError::Serialization(format!("kdf params: {e}")))?;

        // Salt and probe last: together they mark the vault as initialized.
        write_atomic(self.paths.kdf(), kdf_record.as_bytes())?;
        write_atomic(self.paths.salt(), &salt)?;
        write_atomic(self.paths.probe(), sealed_probe.as_bytes())?;

        info!(dir = %self.paths.dir().display(), "securebox initialized");
        Ok(VaultContext::new(self.paths.clone(), salt, key))
    }

    /// Check a password against the stored probe.
    ///
    /// Every failure other than an I/O error reading the files is the same
    /// `AccessDenied`, so the caller cannot tell a wrong password from a
    /// corrupted salt or probe.
    pub fn login(&self, password: &str) -> Result<DerivedKey> {
        self.unlock(password).map(|ctx| ctx.key().clone())
    }

    /// Like `login`, but returns the whole session context.
    pub fn unlock(&self, password: &str) -> Result<VaultContext> {
        if self.state() == AccessState::Uninitialized {
            return Err(SecureBoxError::NotInitialized(
                self.paths.dir().to_path_buf(),
            ));
        }

        let salt_bytes = fs::read(self.paths.salt())?;
        let probe_bytes = fs::read(self.paths.probe())?;
        let params = self.stored_params()?;

        let salt: [u8; SALT_LEN] = salt_bytes
            .as_slice()
            .try_into()
            .map_err(|_| denied("salt file has the wrong length"))?;
        let sealed_probe =
            std::str::from_utf8(&probe_bytes).map_err(|_| denied("probe file is not text"))?;

        let key = derive_key(password.as_bytes(), &salt, &params)
            .map_err(|_| denied("key derivation rejected the input"))?;

        let opened = Zeroizing::new(
            open(sealed_probe, &key).map_err(|_| denied("probe did not open"))?,
        );
        if !bool::from(opened.as_slice().ct_eq(PROBE)) {
            return Err(denied("probe plaintext mismatch"));
        }

        debug!("access granted");
        Ok(VaultContext::new(self.paths.clone(), salt, key))
    }

    /// Parameters recorded at setup.  A vault without a record falls back
    /// to the configured ones.
    fn stored_params(&self) -> Result<KdfParams> {
        let path = self.paths.kdf();
        if !path.exists() {
            return Ok(self.params);
        }

        let bytes = fs::read(path)?;
        let text = std::str::from_utf8(&bytes).map_err(|_| denied("kdf record is not text"))?;
        toml::from_str(text).map_err(|_| denied("kdf record does not parse"))
    }
}

fn denied(reason: &str) -> SecureBoxError {
    debug!(reason, "access denied");
    SecureBoxError::AccessDenied
}

/// Ask for a password up to `max_attempts` times until one unlocks.
///
/// `prompt` receives the 1-based attempt number.  A denied attempt moves
/// on to the next one; any other error (including one from `prompt`)
/// is returned immediately.  After the last denial the result is
/// `TooManyAttempts`.
pub fn login_with_attempts<F>(
    verifier: &AccessVerifier,
    max_attempts: u32,
    mut prompt: F,
) -> Result<VaultContext>
where
    F: FnMut(u32) -> Result<Zeroizing<String>>,
{
    let max_attempts = max_attempts.max(1);

    for attempt in 1..=max_attempts {
        let password = prompt(attempt)?;
        match verifier.unlock(&password) {
            Ok(ctx) => return Ok(ctx),
            Err(SecureBoxError::AccessDenied) => {
                info!(attempt, max_attempts, "password rejected");
            }
            Err(e) => return Err(e),
        }
    }

    Err(SecureBoxError::TooManyAttempts(max_attempts))
}
