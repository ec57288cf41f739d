//! Command-line interface: argument parsing and the shared unlock path.

pub mod commands;
pub mod output;
pub mod prompt;

use std::path::PathBuf;

use clap::Parser;

use crate::access::{login_with_attempts, AccessVerifier};
use crate::config::Settings;
use crate::errors::{Result, SecureBoxError};
use crate::vault::{VaultContext, VaultPaths};

use self::prompt::Prompter;

/// Minimum length for a new password.  Existing passwords are never checked.
pub const MIN_PASSWORD_LEN: usize = 8;

/// SecureBox CLI: password-gated local secrets vault.
#[derive(Parser)]
#[command(
    name = "securebox",
    about = "Password-gated local secrets vault",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault directory (default: from .securebox.toml, else .securebox)
    #[arg(long, global = true)]
    pub vault_dir: Option<String>,

    /// Increase diagnostic output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Set up a new SecureBox (choose a password)
    Init,

    /// Create a container
    Create {
        /// Container name (e.g. wifi)
        name: String,
        /// Container content (omit for interactive prompt)
        content: Option<String>,
    },

    /// Replace a container's content
    Edit {
        /// Container name
        name: String,
        /// New content (omit for interactive prompt)
        content: Option<String>,
    },

    /// Delete a container
    Delete {
        /// Container name
        name: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Print a container's content
    View {
        /// Container name
        name: String,
    },

    /// List all containers
    List,

    /// Check every container's signature
    Verify,

    /// Copy the sealed vault file to a backup directory
    Backup {
        /// Backup directory (default: backup_dir from .securebox.toml)
        #[arg(long)]
        dest: Option<String>,
    },

    /// Replace the vault with a backup
    Restore {
        /// Backup directory (default: backup_dir from .securebox.toml)
        #[arg(long)]
        dest: Option<String>,
        /// Backup identifier (default: most recent)
        #[arg(long)]
        id: Option<String>,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Interactive menu
    Shell,

    /// View the audit log of vault operations
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
        /// Show entries since a duration ago (e.g. 7d, 24h, 30m)
        #[arg(long)]
        since: Option<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        shell: String,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Settings and file locations resolved for the current directory.
pub struct Workspace {
    pub project_dir: PathBuf,
    pub settings: Settings,
    pub paths: VaultPaths,
}

impl Workspace {
    /// Load `.securebox.toml` from the current directory and apply
    /// the `--vault-dir` override.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let project_dir = std::env::current_dir()?;
        let mut settings = Settings::load(&project_dir)?;
        if let Some(dir) = &cli.vault_dir {
            settings.vault_dir = dir.clone();
        }
        let paths = settings.vault_paths(&project_dir);
        Ok(Self {
            project_dir,
            settings,
            paths,
        })
    }

    pub fn verifier(&self) -> AccessVerifier {
        AccessVerifier::new(self.paths.clone(), self.settings.kdf_params())
    }

    /// Log an audit event for this workspace's vault.
    pub fn audit(&self, op: &str, container: Option<&str>, details: Option<&str>) {
        crate::audit::log_event(self.paths.dir(), op, container, details);
    }
}

/// Ask for the password until it unlocks the vault or attempts run out.
///
/// Scripted (non-interactive) passwords get a single attempt.
pub fn unlock(ws: &Workspace, prompter: &dyn Prompter) -> Result<VaultContext> {
    let verifier = ws.verifier();
    let max_attempts = if prompter.is_interactive() {
        ws.settings.max_login_attempts
    } else {
        1
    };

    let result = login_with_attempts(&verifier, max_attempts, |attempt| {
        if attempt > 1 {
            let left = max_attempts - attempt + 1;
            output::warning(&format!("Access denied. {left} attempt(s) left."));
        }
        prompter.password("Enter SecureBox password")
    });

    match result {
        Ok(ctx) => Ok(ctx.with_policy(ws.settings.duplicate_policy)),
        Err(e @ SecureBoxError::TooManyAttempts(_)) => {
            ws.audit("login-failed", None, None);
            Err(e)
        }
        Err(e) => Err(e),
    }
}

/// Reject new passwords that are too short.
pub fn check_new_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(SecureBoxError::CommandFailed(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn short_passwords_are_rejected() {
        assert!(check_new_password("short").is_err());
        assert!(check_new_password("long-enough").is_ok());
    }

    #[test]
    fn vault_dir_flag_is_global() {
        let cli = Cli::try_parse_from(["securebox", "list", "--vault-dir", "elsewhere"]).unwrap();
        assert_eq!(cli.vault_dir.as_deref(), Some("elsewhere"));
        assert!(matches!(cli.command, Commands::List));
    }

    #[test]
    fn verbose_flag_counts() {
        let cli = Cli::try_parse_from(["securebox", "-vv", "verify"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
