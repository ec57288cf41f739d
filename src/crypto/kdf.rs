//! Password-based key derivation using PBKDF2-HMAC-SHA256.
//!
//! The iteration count is deliberately high so that every offline guess
//! costs the attacker the same work it costs us at login.  Parameters are
//! configurable via `KdfParams` (loaded from `.securebox.toml` or defaults)
//! but can never drop below `MIN_ITERATIONS`.  The configured values only
//! apply to new vaults; an existing vault keeps the ones it was set up with.

use hmac::Hmac;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::keys::{DerivedKey, KEY_LEN};
use crate::errors::{Result, SecureBoxError};

/// Length of the salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Lowest iteration count we accept.
pub const MIN_ITERATIONS: u32 = 100_000;

/// Iteration count used when nothing else is configured.
pub const DEFAULT_ITERATIONS: u32 = 200_000;

/// Configurable PBKDF2 parameters.
///
/// Recorded next to the salt at setup so later logins derive with the
/// same values even if the configuration changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KdfParams {
    /// Number of HMAC-SHA256 rounds (default: 200 000).
    pub iterations: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

/// Derive a 32-byte key from a password and a 16-byte salt.
///
/// The same password + salt + params will always produce the same key.
pub fn derive_key(password: &[u8], salt: &[u8], params: &KdfParams) -> Result<DerivedKey> {
    check_inputs(password, salt, params)?;
    run_pbkdf2(password, salt, params.iterations)
}

/// Derive a key bound to an auxiliary payload as well as the password.
///
/// The PBKDF2 input is `password || SHA-256(context)`, so a different
/// context yields an unrelated key even with the right password.
pub fn derive_key_with_context(
    password: &[u8],
    salt: &[u8],
    context: &[u8],
    params: &KdfParams,
) -> Result<DerivedKey> {
    check_inputs(password, salt, params)?;

    let context_hash = Sha256::digest(context);
    let mut combined = Zeroizing::new(Vec::with_capacity(password.len() + context_hash.len()));
    combined.extend_from_slice(password);
    combined.extend_from_slice(&context_hash);

    run_pbkdf2(&combined, salt, params.iterations)
}

/// Generate a cryptographically random 16-byte salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}

fn check_inputs(password: &[u8], salt: &[u8], params: &KdfParams) -> Result<()> {
    if password.is_empty() {
        return Err(SecureBoxError::KeyDerivation(
            "password must not be empty".into(),
        ));
    }
    if salt.len() != SALT_LEN {
        return Err(SecureBoxError::KeyDerivation(format!(
            "salt must be exactly {SALT_LEN} bytes (got {})",
            salt.len()
        )));
    }
    if params.iterations < MIN_ITERATIONS {
        return Err(SecureBoxError::KeyDerivation(format!(
            "PBKDF2 iterations must be at least {MIN_ITERATIONS} (got {})",
            params.iterations
        )));
    }
    Ok(())
}

fn run_pbkdf2(input: &[u8], salt: &[u8], iterations: u32) -> Result<DerivedKey> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::pbkdf2::<Hmac<Sha256>>(input, salt, iterations, key.as_mut())
        .map_err(|e| SecureBoxError::KeyDerivation(format!("PBKDF2 failed: {e}")))?;
    Ok(DerivedKey::new(*key))
}
