//! `securebox view` — print a single container's content.

use crate::cli::prompt::Prompter;
use crate::cli::{unlock, Cli, Workspace};
use crate::errors::{Result, SecureBoxError};

/// Execute the `view` command.
pub fn execute(cli: &Cli, prompter: &dyn Prompter, name: &str) -> Result<()> {
    let ws = Workspace::resolve(cli)?;
    let ctx = unlock(&ws, prompter)?;
    let store = ctx.load()?;

    match store.view(name) {
        Ok(content) => {
            ws.audit("view", Some(name), None);
            // Raw content on stdout so it can be piped.
            println!("{content}");
            Ok(())
        }
        Err(e @ SecureBoxError::IntegrityMismatch(_)) => {
            ws.audit("view", Some(name), Some("integrity check failed"));
            Err(e)
        }
        Err(e) => Err(e),
    }
}
