use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in SecureBox.
///
/// Messages never carry passwords, keys, or container content.
#[derive(Debug, Error)]
pub enum SecureBoxError {
    // --- Access errors ---
    #[error("Password mismatch — passwords do not match")]
    PasswordMismatch,

    #[error("Access denied")]
    AccessDenied,

    #[error("Access denied after {0} failed attempt(s)")]
    TooManyAttempts(u32),

    #[error("SecureBox is not initialized at {0} (run `securebox init`)")]
    NotInitialized(PathBuf),

    #[error("SecureBox is already initialized at {0}")]
    AlreadyInitialized(PathBuf),

    // --- Crypto errors ---
    #[error("Authentication failed — wrong key or tampered data")]
    AuthenticationFailed,

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    // --- Container errors ---
    #[error("Container '{0}' not found")]
    ContainerNotFound(String),

    #[error("Container '{0}' already exists (use `edit` to change it)")]
    DuplicateName(String),

    #[error("Integrity check failed for container '{0}' — signature does not match")]
    IntegrityMismatch(String),

    #[error("Invalid container name: {0}")]
    InvalidContainerName(String),

    // --- Vault file errors ---
    #[error("Vault could not be loaded: {0}")]
    VaultLoad(String),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    Serialization(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    Config(String),

    // --- Backup errors ---
    #[error("Backup error: {0}")]
    Backup(String),

    // --- Audit errors ---
    #[error("Audit error: {0}")]
    Audit(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for SecureBox results.
pub type Result<T> = std::result::Result<T, SecureBoxError>;
