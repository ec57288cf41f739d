//! Vault module — the container collection and its sealed file.
//!
//! This module provides:
//! - `Container` and `ContainerMetadata` types (`container`)
//! - The in-memory `ContainerStore` with create/edit/delete/view (`store`)
//! - Whole-vault sealing to and from disk (`persistence`)
//! - File locations (`paths`) and the unlocked session handle (`context`)

pub mod container;
pub mod context;
pub mod paths;
pub mod persistence;
pub mod store;

// Re-export the most commonly used items.
pub use container::{compute_signature, Container, ContainerMetadata};
pub use context::VaultContext;
pub use paths::VaultPaths;
pub use store::{ContainerStore, DuplicatePolicy};
