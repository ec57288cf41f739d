//! Container and ContainerMetadata types stored inside a vault.
//!
//! A container is a named secret plus a SHA-256 signature over
//! `name || content`.  The signature is computed before the vault is
//! sealed and checked again after it is opened, so a record that was
//! altered without re-signing is caught even if it decrypts cleanly.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

/// A single named secret record.
#[derive(Clone, Serialize, Deserialize)]
pub struct Container {
    /// Unique name of the container within its vault (e.g. "wifi").
    pub name: String,

    /// The secret content.
    pub content: String,

    /// Lowercase hex SHA-256 of `name || content`.
    pub signature: String,

    /// When this container was first created.
    pub created_at: DateTime<Utc>,

    /// When this container was last edited.
    pub updated_at: DateTime<Utc>,
}

impl Container {
    /// Build a freshly signed container stamped with the current time.
    pub fn new(name: &str, content: &str) -> Self {
        let now = Utc::now();
        Self {
            name: name.to_string(),
            content: content.to_string(),
            signature: compute_signature(name, content),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the content, re-sign, and bump `updated_at`.
    pub fn set_content(&mut self, content: &str) {
        self.content.zeroize();
        self.content = content.to_string();
        self.signature = compute_signature(&self.name, &self.content);
        self.updated_at = Utc::now();
    }

    /// Recompute the signature and compare it to the stored one.
    pub fn signature_matches(&self) -> bool {
        let expected = compute_signature(&self.name, &self.content);
        expected.as_bytes().ct_eq(self.signature.as_bytes()).into()
    }

    pub fn metadata(&self) -> ContainerMetadata {
        ContainerMetadata {
            name: self.name.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl Drop for Container {
    fn drop(&mut self) {
        self.content.zeroize();
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("name", &self.name)
            .field("content", &"<redacted>")
            .field("signature", &self.signature)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Lightweight metadata about a container (no content).
///
/// Returned by `ContainerStore::list_metadata` so callers can display
/// names and timestamps without touching any secret.
#[derive(Debug, Clone)]
pub struct ContainerMetadata {
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// SHA-256 over `name || content`, lowercase hex.
pub fn compute_signature(name: &str, content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(name.as_bytes());
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
