//! `securebox backup` — copy the sealed vault to a backup directory.

use std::path::PathBuf;

use crate::backup::{backup_vault, DirectoryBackup};
use crate::cli::output;
use crate::cli::prompt::Prompter;
use crate::cli::{unlock, Cli, Workspace};
use crate::errors::{Result, SecureBoxError};

/// Execute the `backup` command.
pub fn execute(cli: &Cli, prompter: &dyn Prompter, dest: Option<&str>) -> Result<()> {
    let ws = Workspace::resolve(cli)?;
    let target = DirectoryBackup::new(backup_dir(&ws, dest)?);

    let ctx = unlock(&ws, prompter)?;
    let id = backup_vault(&ctx, &target)?;

    ws.audit("backup", None, Some(&id));
    output::success(&format!(
        "Backed up to {}",
        target.dir().join(&id).display()
    ));

    Ok(())
}

/// Backup directory from `--dest`, else `backup_dir` in the settings file.
pub(crate) fn backup_dir(ws: &Workspace, dest: Option<&str>) -> Result<PathBuf> {
    if let Some(d) = dest {
        return Ok(ws.project_dir.join(d));
    }
    ws.settings.backup_path(&ws.project_dir).ok_or_else(|| {
        SecureBoxError::Config(
            "no backup directory: pass --dest or set backup_dir in .securebox.toml".into(),
        )
    })
}
