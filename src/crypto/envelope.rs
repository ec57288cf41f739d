//! Text-safe sealed envelopes.
//!
//! An envelope is the URL-safe base64 encoding of:
//!
//! ```text
//! [version: 1 byte][nonce: 12 bytes][ciphertext + 16-byte GCM tag]
//! ```
//!
//! Envelopes can be written to text files or embedded in JSON as-is.
//! Opening fails closed: a wrong key, a flipped byte, bad base64 or an
//! unknown version all surface as `AuthenticationFailed`.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;

use super::encryption::{decrypt, encrypt, NONCE_LEN, TAG_LEN};
use super::keys::DerivedKey;
use crate::errors::{Result, SecureBoxError};

/// Leading byte of every envelope produced by this build.
pub const ENVELOPE_VERSION: u8 = 0x01;

/// Seal `plaintext` under `key` and return the envelope text.
pub fn seal(plaintext: &[u8], key: &DerivedKey) -> Result<String> {
    let body = encrypt(key.as_bytes(), plaintext)?;

    let mut raw = Vec::with_capacity(1 + body.len());
    raw.push(ENVELOPE_VERSION);
    raw.extend_from_slice(&body);

    Ok(URL_SAFE.encode(raw))
}

/// Open an envelope produced by `seal`.
pub fn open(envelope: &str, key: &DerivedKey) -> Result<Vec<u8>> {
    let raw = URL_SAFE
        .decode(envelope.trim())
        .map_err(|_| SecureBoxError::AuthenticationFailed)?;

    let Some((&version, body)) = raw.split_first() else {
        return Err(SecureBoxError::AuthenticationFailed);
    };
    if version != ENVELOPE_VERSION || body.len() < NONCE_LEN + TAG_LEN {
        return Err(SecureBoxError::AuthenticationFailed);
    }

    decrypt(key.as_bytes(), body)
}
