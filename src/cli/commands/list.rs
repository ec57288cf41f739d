//! `securebox list` — display all containers in a table.

use crate::cli::output;
use crate::cli::prompt::Prompter;
use crate::cli::{unlock, Cli, Workspace};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli, prompter: &dyn Prompter) -> Result<()> {
    let ws = Workspace::resolve(cli)?;
    let ctx = unlock(&ws, prompter)?;
    let store = ctx.load()?;

    let containers = store.list_metadata();
    output::info(&format!("{} container(s)", containers.len()));
    output::print_containers_table(&containers);

    Ok(())
}
