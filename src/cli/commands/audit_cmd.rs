//! `securebox audit` — display the audit log.
//!
//! Usage:
//!   securebox audit               # show last 50 entries
//!   securebox audit --last 20     # show last 20
//!   securebox audit --since 7d    # entries from last 7 days

use chrono::Utc;

use crate::audit::{recent_entries, AuditEntry};
use crate::cli::output;
use crate::cli::{Cli, Workspace};
use crate::errors::{Result, SecureBoxError};

/// Execute the `audit` command.
///
/// Needs no password: the log holds container names, never content.
pub fn execute(cli: &Cli, last: usize, since: Option<&str>) -> Result<()> {
    let ws = Workspace::resolve(cli)?;

    let since_dt = match since {
        Some(s) => Some(parse_duration(s)?),
        None => None,
    };

    let entries = recent_entries(ws.paths.dir(), last, since_dt)?;

    if entries.is_empty() {
        output::info("No audit entries found.");
        return Ok(());
    }

    print_audit_table(&entries);

    Ok(())
}

/// Parse a human-friendly duration string like "7d", "24h", "30m".
fn parse_duration(input: &str) -> Result<chrono::DateTime<Utc>> {
    let input = input.trim();

    let (num_str, unit) = if let Some(s) = input.strip_suffix('d') {
        (s, 'd')
    } else if let Some(s) = input.strip_suffix('h') {
        (s, 'h')
    } else if let Some(s) = input.strip_suffix('m') {
        (s, 'm')
    } else {
        return Err(SecureBoxError::CommandFailed(format!(
            "invalid duration '{input}', use a format like 7d, 24h, or 30m"
        )));
    };

    let num: i64 = num_str.parse().map_err(|_| {
        SecureBoxError::CommandFailed(format!(
            "invalid duration '{input}': number part is not valid"
        ))
    })?;
    if num < 0 {
        return Err(SecureBoxError::CommandFailed(format!(
            "invalid duration '{input}': must not be negative"
        )));
    }

    let duration = match unit {
        'd' => chrono::Duration::days(num),
        'h' => chrono::Duration::hours(num),
        _ => chrono::Duration::minutes(num),
    };

    Ok(Utc::now() - duration)
}

/// Print audit entries in a formatted table.
fn print_audit_table(entries: &[AuditEntry]) {
    use comfy_table::{ContentArrangement, Table};
    use console::style;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Operation", "Container", "Details"]);

    for entry in entries {
        table.add_row(vec![
            entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            colorize_operation(&entry.operation),
            entry.container.as_deref().unwrap_or("-").to_string(),
            entry.details.as_deref().unwrap_or("-").to_string(),
        ]);
    }

    println!(
        "{}",
        style(format!("{} audit entries:", entries.len())).bold()
    );
    println!("{table}");
}

fn colorize_operation(op: &str) -> String {
    use console::style;

    match op {
        "init" | "create" => style(op).green().to_string(),
        "edit" | "view" => style(op).blue().to_string(),
        "delete" | "login-failed" | "verify" => style(op).red().to_string(),
        "backup" | "restore" => style(op).cyan().to_string(),
        _ => op.to_string(),
    }
}
