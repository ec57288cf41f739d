//! `securebox edit` — replace the content of an existing container.

use crate::cli::commands::create::resolve_content;
use crate::cli::output;
use crate::cli::prompt::Prompter;
use crate::cli::{unlock, Cli, Workspace};
use crate::errors::{Result, SecureBoxError};

/// Execute the `edit` command.
pub fn execute(cli: &Cli, prompter: &dyn Prompter, name: &str, content: Option<&str>) -> Result<()> {
    let ws = Workspace::resolve(cli)?;

    let ctx = unlock(&ws, prompter)?;
    let mut store = ctx.load()?;

    // Check before asking for new content so a typo fails fast.
    if !store.contains(name) {
        return Err(SecureBoxError::ContainerNotFound(name.to_string()));
    }

    let content = resolve_content(prompter, name, content)?;
    store.edit(name, &content)?;
    ctx.save(&store)?;

    ws.audit("edit", Some(name), None);
    output::success(&format!("Container '{name}' updated"));

    Ok(())
}
