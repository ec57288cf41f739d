//! `securebox delete` — remove a container.

use crate::cli::output;
use crate::cli::prompt::Prompter;
use crate::cli::{unlock, Cli, Workspace};
use crate::errors::Result;

/// Execute the `delete` command.
pub fn execute(cli: &Cli, prompter: &dyn Prompter, name: &str, force: bool) -> Result<()> {
    let ws = Workspace::resolve(cli)?;

    // Unless --force is set, ask for confirmation before deleting.
    if !force && !prompter.confirm(&format!("Delete container '{name}'?"), false)? {
        output::info("Cancelled.");
        return Ok(());
    }

    let ctx = unlock(&ws, prompter)?;
    let mut store = ctx.load()?;

    store.delete(name)?;
    ctx.save(&store)?;

    ws.audit("delete", Some(name), None);
    output::success(&format!("Deleted container '{name}'"));

    Ok(())
}
