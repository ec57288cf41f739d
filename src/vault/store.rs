//! In-memory container collection used by CLI commands.
//!
//! `ContainerStore` owns the decrypted containers of one vault and
//! enforces name uniqueness.  It never touches the disk or the key:
//! the whole store is sealed as one unit by `vault::persistence`, so
//! every mutation here must be followed by a save to become durable.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::container::{Container, ContainerMetadata};
use crate::errors::{Result, SecureBoxError};

/// Maximum length of a container name in bytes.
const MAX_NAME_LEN: usize = 256;

/// What `create` does when the name is already taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Fail with `DuplicateName`.
    #[default]
    Reject,
    /// Replace the existing content, keeping its `created_at`.
    Overwrite,
}

/// The decrypted containers of one vault, keyed and ordered by name.
#[derive(Debug, Clone, Default)]
pub struct ContainerStore {
    containers: BTreeMap<String, Container>,
    policy: DuplicatePolicy,
}

impl ContainerStore {
    /// An empty store with the given duplicate policy.
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            containers: BTreeMap::new(),
            policy,
        }
    }

    /// Build a store from deserialized containers.
    ///
    /// Fails with `VaultLoad` if two containers share a name.
    pub fn from_containers(containers: Vec<Container>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for container in containers {
            if map.contains_key(&container.name) {
                return Err(SecureBoxError::VaultLoad(format!(
                    "duplicate container name '{}'",
                    container.name
                )));
            }
            map.insert(container.name.clone(), container);
        }
        Ok(Self {
            containers: map,
            policy: DuplicatePolicy::default(),
        })
    }

    /// Change the duplicate policy.
    pub fn with_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    // ------------------------------------------------------------------
    // Container operations
    // ------------------------------------------------------------------

    /// Add a new container.
    ///
    /// An existing name is rejected or overwritten according to the
    /// store's `DuplicatePolicy`.
    pub fn create(&mut self, name: &str, content: &str) -> Result<()> {
        validate_name(name)?;

        match self.containers.get_mut(name) {
            Some(existing) => match self.policy {
                DuplicatePolicy::Reject => Err(SecureBoxError::DuplicateName(name.to_string())),
                DuplicatePolicy::Overwrite => {
                    existing.set_content(content);
                    Ok(())
                }
            },
            None => {
                self.containers
                    .insert(name.to_string(), Container::new(name, content));
                Ok(())
            }
        }
    }

    /// Replace the content of an existing container.
    pub fn edit(&mut self, name: &str, new_content: &str) -> Result<()> {
        let container = self
            .containers
            .get_mut(name)
            .ok_or_else(|| SecureBoxError::ContainerNotFound(name.to_string()))?;
        container.set_content(new_content);
        Ok(())
    }

    /// Remove a container.
    pub fn delete(&mut self, name: &str) -> Result<()> {
        if self.containers.remove(name).is_none() {
            return Err(SecureBoxError::ContainerNotFound(name.to_string()));
        }
        Ok(())
    }

    /// Return the content of a container after checking its signature.
    pub fn view(&self, name: &str) -> Result<&str> {
        let container = self
            .containers
            .get(name)
            .ok_or_else(|| SecureBoxError::ContainerNotFound(name.to_string()))?;

        if !container.signature_matches() {
            return Err(SecureBoxError::IntegrityMismatch(name.to_string()));
        }

        Ok(&container.content)
    }

    /// All container names, sorted.
    pub fn list(&self) -> Vec<String> {
        self.containers.keys().cloned().collect()
    }

    /// Metadata for all containers, sorted by name.
    pub fn list_metadata(&self) -> Vec<ContainerMetadata> {
        self.containers.values().map(Container::metadata).collect()
    }

    /// Names of containers whose signature no longer matches.
    pub fn verify_all(&self) -> Vec<String> {
        self.containers
            .values()
            .filter(|c| !c.signature_matches())
            .map(|c| c.name.clone())
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.containers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    /// Containers in name order, for serialization.
    pub fn containers(&self) -> impl Iterator<Item = &Container> {
        self.containers.values()
    }

    /// Mutable access for repair tooling and tests.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Container> {
        self.containers.get_mut(name)
    }
}

/// Validate that a container name is usable.
///
/// Must be non-empty, at most 256 bytes, free of control characters,
/// and without leading/trailing whitespace.
fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(SecureBoxError::InvalidContainerName(
            "name cannot be empty".into(),
        ));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(SecureBoxError::InvalidContainerName(format!(
            "name cannot exceed {MAX_NAME_LEN} bytes"
        )));
    }
    if name.chars().any(char::is_control) {
        return Err(SecureBoxError::InvalidContainerName(
            "name cannot contain control characters".into(),
        ));
    }
    if name.trim() != name {
        return Err(SecureBoxError::InvalidContainerName(format!(
            "'{name}' has leading or trailing whitespace"
        )));
    }
    Ok(())
}
