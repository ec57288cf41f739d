//! `securebox init` — choose a password and create an empty SecureBox.

use crate::access::AccessState;
use crate::cli::output;
use crate::cli::prompt::Prompter;
use crate::cli::{check_new_password, Cli, Workspace};
use crate::errors::{Result, SecureBoxError};
use crate::vault::ContainerStore;

/// Execute the `init` command.
pub fn execute(cli: &Cli, prompter: &dyn Prompter) -> Result<()> {
    let ws = Workspace::resolve(cli)?;
    let verifier = ws.verifier();

    // 1. Refuse to re-initialize: a new salt would lock out existing data.
    if verifier.state() == AccessState::Initialized {
        output::tip("Use `securebox create` to add containers to the existing SecureBox.");
        return Err(SecureBoxError::AlreadyInitialized(ws.paths.dir().to_path_buf()));
    }

    // 2. Prompt for the new password twice.
    //    Interactive users are re-prompted on mismatch; scripts fail fast.
    let ctx = loop {
        let password = prompter.password("Choose SecureBox password")?;
        let confirmation = prompter.confirmation()?;

        let attempt = check_new_password(&password)
            .and_then(|()| verifier.initialize(&password, &confirmation));

        match attempt {
            Ok(ctx) => break ctx,
            Err(e @ (SecureBoxError::PasswordMismatch | SecureBoxError::CommandFailed(_)))
                if prompter.is_interactive() =>
            {
                output::warning(&format!("{e}. Try again."));
            }
            Err(e) => return Err(e),
        }
    };

    // 3. Write an empty sealed vault so the data file exists from the start.
    let store = ContainerStore::new(ws.settings.duplicate_policy);
    ctx.save(&store)?;

    ws.audit("init", None, Some("securebox created"));

    output::success(&format!(
        "SecureBox created at {}",
        ws.paths.dir().display()
    ));
    output::warning("There is no password recovery. Losing the password or salt.key loses the data.");
    output::tip("Run `securebox create <NAME>` to add a container.");
    output::tip("Run `securebox list` to see all containers.");

    Ok(())
}
