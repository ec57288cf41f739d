//! Cryptographic primitives for SecureBox.
//!
//! This module provides:
//! - AES-256-GCM encryption and decryption (`encryption`)
//! - Text-safe sealed envelopes built on top of it (`envelope`)
//! - PBKDF2-HMAC-SHA256 password-based key derivation (`kdf`)
//! - The zeroize-on-drop session key type (`keys`)

pub mod encryption;
pub mod envelope;
pub mod kdf;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{seal, open, derive_key, ...};
pub use encryption::{decrypt, encrypt};
pub use envelope::{open, seal};
pub use kdf::{derive_key, derive_key_with_context, generate_salt, KdfParams};
pub use keys::DerivedKey;
