//! `securebox restore` — replace the vault with a backup.

use crate::backup::{restore_vault, BackupTarget, DirectoryBackup};
use crate::cli::commands::backup::backup_dir;
use crate::cli::output;
use crate::cli::prompt::Prompter;
use crate::cli::{unlock, Cli, Workspace};
use crate::errors::{Result, SecureBoxError};

/// Execute the `restore` command.
pub fn execute(
    cli: &Cli,
    prompter: &dyn Prompter,
    dest: Option<&str>,
    id: Option<&str>,
    force: bool,
) -> Result<()> {
    let ws = Workspace::resolve(cli)?;
    let target = DirectoryBackup::new(backup_dir(&ws, dest)?);

    let id = match id {
        Some(id) => id.to_string(),
        None => target.latest()?.ok_or_else(|| {
            SecureBoxError::Backup(format!("no backups in {}", target.dir().display()))
        })?,
    };

    let ctx = unlock(&ws, prompter)?;

    if !force
        && !prompter.confirm(
            &format!("Replace the current vault with backup '{id}'?"),
            false,
        )?
    {
        output::info("Cancelled.");
        return Ok(());
    }

    let count = restore_vault(&ctx, &target, &id)?;

    ws.audit("restore", None, Some(&id));
    output::success(&format!("Restored '{id}' ({count} container(s))"));

    Ok(())
}
