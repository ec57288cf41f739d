//! `securebox create` — add a new container.

use std::io::{self, IsTerminal, Read};

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::prompt::Prompter;
use crate::cli::{unlock, Cli, Workspace};
use crate::errors::Result;

/// Execute the `create` command.
pub fn execute(cli: &Cli, prompter: &dyn Prompter, name: &str, content: Option<&str>) -> Result<()> {
    let ws = Workspace::resolve(cli)?;
    let content = resolve_content(prompter, name, content)?;

    let ctx = unlock(&ws, prompter)?;
    let mut store = ctx.load()?;

    let existed = store.contains(name);
    store.create(name, &content)?;
    ctx.save(&store)?;

    let detail = if existed { "overwritten" } else { "created" };
    ws.audit("create", Some(name), Some(detail));

    output::success(&format!(
        "Container '{name}' {detail} ({} total)",
        store.len()
    ));

    Ok(())
}

/// Pick the content from one of three sources.
///
/// 1. Inline value on the command line.
/// 2. Piped input (stdin is not a terminal).
/// 3. Interactive secure prompt (default).
pub(crate) fn resolve_content(
    prompter: &dyn Prompter,
    name: &str,
    inline: Option<&str>,
) -> Result<Zeroizing<String>> {
    if let Some(v) = inline {
        output::warning("Content provided on command line — it may appear in shell history.");
        return Ok(Zeroizing::new(v.to_string()));
    }

    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        let trimmed = Zeroizing::new(buf.trim_end_matches(['\r', '\n']).to_string());
        return Ok(trimmed);
    }

    prompter.content(name)
}
