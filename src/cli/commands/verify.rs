//! `securebox verify` — check every container's signature.

use crate::cli::output;
use crate::cli::prompt::Prompter;
use crate::cli::{unlock, Cli, Workspace};
use crate::errors::{Result, SecureBoxError};

/// Execute the `verify` command.
pub fn execute(cli: &Cli, prompter: &dyn Prompter) -> Result<()> {
    let ws = Workspace::resolve(cli)?;
    let ctx = unlock(&ws, prompter)?;
    let store = ctx.load()?;

    let bad = store.verify_all();
    if bad.is_empty() {
        output::success(&format!("All {} container(s) verified", store.len()));
        return Ok(());
    }

    for name in &bad {
        output::error(&format!("Signature mismatch: '{name}'"));
    }
    ws.audit("verify", None, Some(&format!("{} mismatch(es)", bad.len())));
    Err(SecureBoxError::IntegrityMismatch(bad.join(", ")))
}
