use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::access::DEFAULT_MAX_ATTEMPTS;
use crate::crypto::kdf::{KdfParams, DEFAULT_ITERATIONS};
use crate::errors::{Result, SecureBoxError};
use crate::vault::{DuplicatePolicy, VaultPaths};

/// Project-level configuration, loaded from `.securebox.toml`.
///
/// Every field has a sensible default so SecureBox works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory (relative to project root) holding salt, probe and vault.
    #[serde(default = "default_vault_dir")]
    pub vault_dir: String,

    /// PBKDF2 iteration count for new vaults (default: 200 000, minimum 100 000).
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// What `create` does with an existing name: "reject" or "overwrite".
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,

    /// Password attempts before a command gives up (default: 3).
    #[serde(default = "default_max_login_attempts")]
    pub max_login_attempts: u32,

    /// Directory for `securebox backup` copies, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_dir: Option<String>,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault_dir() -> String {
    ".securebox".to_string()
}

fn default_kdf_iterations() -> u32 {
    DEFAULT_ITERATIONS
}

fn default_max_login_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_dir: default_vault_dir(),
            kdf_iterations: default_kdf_iterations(),
            duplicate_policy: DuplicatePolicy::default(),
            max_login_attempts: default_max_login_attempts(),
            backup_dir: None,
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    pub const FILE_NAME: &'static str = ".securebox.toml";

    /// Load settings from `<project_dir>/.securebox.toml`.
    ///
    /// If the file does not exist, defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            SecureBoxError::Config(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        if settings.max_login_attempts == 0 {
            return Err(SecureBoxError::Config(
                "max_login_attempts must be at least 1".into(),
            ));
        }

        Ok(settings)
    }

    /// The vault file locations for a project.
    ///
    /// Example: `project_dir/.securebox/{salt.key,probe.key,vault.dat}`
    pub fn vault_paths(&self, project_dir: &Path) -> VaultPaths {
        VaultPaths::new(project_dir.join(&self.vault_dir))
    }

    /// Resolved backup directory, if configured.
    pub fn backup_path(&self, project_dir: &Path) -> Option<PathBuf> {
        self.backup_dir.as_ref().map(|d| project_dir.join(d))
    }

    /// Convert the KDF settings into crypto-layer params.
    pub fn kdf_params(&self) -> KdfParams {
        KdfParams {
            iterations: self.kdf_iterations,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings_are_sensible() {
        let s = Settings::default();
        assert_eq!(s.vault_dir, ".securebox");
        assert_eq!(s.kdf_iterations, 200_000);
        assert_eq!(s.duplicate_policy, DuplicatePolicy::Reject);
        assert_eq!(s.max_login_attempts, 3);
        assert!(s.backup_dir.is_none());
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.vault_dir, ".securebox");
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let config = r#"
vault_dir = "secrets"
kdf_iterations = 600000
duplicate_policy = "overwrite"
max_login_attempts = 5
backup_dir = "backups"
"#;
        fs::write(tmp.path().join(".securebox.toml"), config).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.vault_dir, "secrets");
        assert_eq!(settings.kdf_iterations, 600_000);
        assert_eq!(settings.duplicate_policy, DuplicatePolicy::Overwrite);
        assert_eq!(settings.max_login_attempts, 5);
        assert_eq!(
            settings.backup_path(tmp.path()),
            Some(tmp.path().join("backups"))
        );
    }

    #[test]
    fn load_uses_defaults_for_missing_fields() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".securebox.toml"), "kdf_iterations = 300000\n").unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.kdf_iterations, 300_000);
        assert_eq!(settings.vault_dir, ".securebox");
        assert_eq!(settings.duplicate_policy, DuplicatePolicy::Reject);
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".securebox.toml"), "not valid {{toml").unwrap();
        assert!(Settings::load(tmp.path()).is_err());
    }

    #[test]
    fn load_errors_on_unknown_policy() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(".securebox.toml"),
            "duplicate_policy = \"merge\"\n",
        )
        .unwrap();
        assert!(Settings::load(tmp.path()).is_err());
    }

    #[test]
    fn load_errors_on_zero_attempts() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(".securebox.toml"),
            "max_login_attempts = 0\n",
        )
        .unwrap();
        assert!(Settings::load(tmp.path()).is_err());
    }

    #[test]
    fn vault_paths_respect_custom_dir() {
        let s = Settings {
            vault_dir: "secrets".to_string(),
            ..Settings::default()
        };
        let paths = s.vault_paths(Path::new("/home/user/project"));
        assert_eq!(
            paths.data(),
            Path::new("/home/user/project/secrets/vault.dat")
        );
    }
}
