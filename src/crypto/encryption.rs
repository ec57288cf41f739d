//! AES-256-GCM authenticated encryption.
//!
//! Each call to `encrypt` generates a fresh random 12-byte nonce and
//! prepends it to the ciphertext.  `decrypt` splits the nonce back out
//! before decrypting.
//!
//! Layout of the returned byte buffer:
//!   [ 12-byte nonce | ciphertext + 16-byte auth tag ]

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};

use crate::errors::{Result, SecureBoxError};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Encrypt `plaintext` with a 32-byte `key`.
///
/// Returns the nonce prepended to the ciphertext (nonce || ciphertext).
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| SecureBoxError::EncryptionFailed(format!("invalid key length: {e}")))?;

    // Never reuse a nonce under the same key: draw a fresh one per call.
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    // Output carries the 16-byte tag after the ciphertext.
    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| SecureBoxError::EncryptionFailed(format!("encryption error: {e}")))?;

    // One self-contained blob: the reader needs only the key.
    let mut output = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    output.extend_from_slice(&nonce);
    output.extend_from_slice(&ciphertext);
    Ok(output)
}

/// Decrypt data that was produced by `encrypt`.
///
/// Every failure collapses into `AuthenticationFailed`.
pub fn decrypt(key: &[u8], ciphertext_with_nonce: &[u8]) -> Result<Vec<u8>> {
    // Anything shorter than nonce + tag cannot have been produced by `encrypt`.
    if ciphertext_with_nonce.len() < NONCE_LEN + TAG_LEN {
        return Err(SecureBoxError::AuthenticationFailed);
    }

    let (nonce_bytes, ciphertext) = ciphertext_with_nonce.split_at(NONCE_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);

    let cipher =
        Aes256Gcm::new_from_slice(key).map_err(|_| SecureBoxError::AuthenticationFailed)?;

    // Tag check and decryption happen together; no plaintext on failure.
    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| SecureBoxError::AuthenticationFailed)
}
