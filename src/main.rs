use clap::Parser;
use issuetrack::cli::commands;
use issuetrack::cli::{Cli, Commands};
use issuetrack::config;
use issuetrack::logging::init_logging;
use issuetrack::{StructuredError, TrackError};
use std::io::{self, IsTerminal};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose, cli.quiet, cli.log_file.as_deref()) {
        eprintln!("Failed to initialize logging: {e}");
    }

    if cli.no_color {
        colored::control::set_override(false);
    }

    let overrides = build_cli_overrides(&cli);

    let result = match &cli.command {
        Commands::Auth { command } => commands::auth::execute(command, &overrides),
        Commands::Whoami => commands::whoami::execute(&overrides),
        Commands::List(args) => commands::list::execute(args, &overrides),
        Commands::Create(args) => commands::create::execute(args, &overrides),
        Commands::Update(args) => commands::update::execute(args, &overrides),
        Commands::Delete(args) => commands::delete::execute(args, &overrides),
        Commands::Profile => commands::profile::execute(&overrides),
    };

    if let Err(e) = result {
        handle_error(&e, cli.json);
    }
}

/// Handle errors with structured output support.
///
/// When --json is set or stdout is not a TTY, outputs structured JSON to stderr.
/// Otherwise, outputs human-readable error with optional color.
fn handle_error(err: &TrackError, json_mode: bool) -> ! {
    let structured = StructuredError::from_error(err);
    let exit_code = structured.code.exit_code();

    let use_json = json_mode || !io::stdout().is_terminal();

    if use_json {
        let json = structured.to_json();
        eprintln!(
            "{}",
            serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string())
        );
    } else {
        let use_color = io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none();
        eprintln!("{}", structured.to_human(use_color));
    }

    std::process::exit(exit_code);
}

fn build_cli_overrides(cli: &Cli) -> config::CliOverrides {
    config::CliOverrides {
        db: cli.db.clone(),
        backend: cli.backend.map(|b| b.as_str().to_string()),
        lock_timeout: cli.lock_timeout,
        json: cli.json.then_some(true),
        quiet: cli.quiet.then_some(true),
        no_color: Some(cli.no_color),
    }
}
