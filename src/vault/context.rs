//! The unlocked-session handle passed to every vault operation.

use super::paths::VaultPaths;
use super::persistence;
use super::store::{ContainerStore, DuplicatePolicy};
use crate::crypto::kdf::SALT_LEN;
use crate::crypto::keys::DerivedKey;
use crate::errors::Result;

/// Everything an operation needs after a successful login: where the
/// files live, the salt they were keyed with, and the session key.
///
/// Built by `AccessVerifier::unlock` / `AccessVerifier::initialize`.
pub struct VaultContext {
    paths: VaultPaths,
    salt: [u8; SALT_LEN],
    key: DerivedKey,
    policy: DuplicatePolicy,
}

impl VaultContext {
    pub fn new(paths: VaultPaths, salt: [u8; SALT_LEN], key: DerivedKey) -> Self {
        Self {
            paths,
            salt,
            key,
            policy: DuplicatePolicy::default(),
        }
    }

    /// Duplicate policy applied to stores loaded through this context.
    pub fn with_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn paths(&self) -> &VaultPaths {
        &self.paths
    }

    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    pub fn key(&self) -> &DerivedKey {
        &self.key
    }

    /// Load the container store from the vault file.
    pub fn load(&self) -> Result<ContainerStore> {
        Ok(persistence::load(self.paths.data(), &self.key)?.with_policy(self.policy))
    }

    /// Seal and write the container store to the vault file.
    pub fn save(&self, store: &ContainerStore) -> Result<()> {
        persistence::save(store, self.paths.data(), &self.key)
    }
}
