use clap::Parser;
use securebox::cli::commands;
use securebox::cli::prompt::TerminalPrompter;
use securebox::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter (e.g. `securebox=debug`).
const LOG_ENV: &str = "SECUREBOX_LOG";

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    // Diagnostics go to stderr; stdout is reserved for command output.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let prompter = TerminalPrompter;

    let result = match cli.command {
        Commands::Init => commands::init::execute(&cli, &prompter),
        Commands::Create {
            ref name,
            ref content,
        } => commands::create::execute(&cli, &prompter, name, content.as_deref()),
        Commands::Edit {
            ref name,
            ref content,
        } => commands::edit::execute(&cli, &prompter, name, content.as_deref()),
        Commands::Delete { ref name, force } => {
            commands::delete::execute(&cli, &prompter, name, force)
        }
        Commands::View { ref name } => commands::view::execute(&cli, &prompter, name),
        Commands::List => commands::list::execute(&cli, &prompter),
        Commands::Verify => commands::verify::execute(&cli, &prompter),
        Commands::Backup { ref dest } => {
            commands::backup::execute(&cli, &prompter, dest.as_deref())
        }
        Commands::Restore {
            ref dest,
            ref id,
            force,
        } => commands::restore::execute(&cli, &prompter, dest.as_deref(), id.as_deref(), force),
        Commands::Shell => commands::shell::execute(&cli, &prompter),
        Commands::Audit { last, ref since } => {
            commands::audit_cmd::execute(&cli, last, since.as_deref())
        }
        Commands::Completions { ref shell } => commands::completions::execute(shell),
    };

    if let Err(e) = result {
        securebox::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
