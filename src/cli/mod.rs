//! CLI definitions and entry point.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod commands;

/// Single-user issue tracker (`SQLite` or hosted table API)
#[derive(Parser, Debug)]
#[command(name = "it", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database path (default: .issuetrack/issues.db or ~/.local/share/issuetrack/issues.db)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Storage backend
    #[arg(long, global = true, value_enum)]
    pub backend: Option<BackendArg>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// `SQLite` busy timeout in ms
    #[arg(long, global = true)]
    pub lock_timeout: Option<u64>,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendArg {
    Sqlite,
    Rest,
}

impl BackendArg {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Rest => "rest",
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign up, sign in, or sign out
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },

    /// Show the signed-in account
    Whoami,

    /// List your issues (newest first)
    #[command(alias = "ls")]
    List(ListArgs),

    /// Create a new issue
    Create(CreateArgs),

    /// Update an issue's status, title, or description
    Update(UpdateArgs),

    /// Delete an issue
    #[command(alias = "rm")]
    Delete(DeleteArgs),

    /// Show your profile and issues
    Profile,
}

#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Create an account
    Signup(CredentialArgs),

    /// Sign in
    Login(CredentialArgs),

    /// Sign out and forget the session
    Logout,
}

#[derive(Args, Debug, Clone)]
pub struct CredentialArgs {
    /// Account email
    #[arg(long, env = "IT_EMAIL")]
    pub email: String,

    /// Account password
    #[arg(long, env = "IT_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Only show issues with this status (open, in_progress, closed)
    #[arg(long, short)]
    pub status: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct CreateArgs {
    /// Issue title
    pub title: String,

    /// Issue description
    #[arg(long, short)]
    pub description: String,

    /// Initial status (default: open)
    #[arg(long, short)]
    pub status: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct UpdateArgs {
    /// Issue ID
    pub id: String,

    /// New status (open, in_progress, closed)
    #[arg(long, short)]
    pub status: Option<String>,

    /// New title
    #[arg(long)]
    pub title: Option<String>,

    /// New description
    #[arg(long, short)]
    pub description: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct DeleteArgs {
    /// Issue ID
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_create_with_flags() {
        let cli = Cli::try_parse_from([
            "it",
            "--json",
            "create",
            "Bug A",
            "--description",
            "desc",
            "--status",
            "in_progress",
        ])
        .expect("parse");

        assert!(cli.json);
        let Commands::Create(args) = cli.command else {
            panic!("expected create");
        };
        assert_eq!(args.title, "Bug A");
        assert_eq!(args.description, "desc");
        assert_eq!(args.status.as_deref(), Some("in_progress"));
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["it", "list", "--backend", "rest", "-vv"]).expect("parse");
        assert_eq!(cli.backend, Some(BackendArg::Rest));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn create_requires_description() {
        assert!(Cli::try_parse_from(["it", "create", "Bug A"]).is_err());
    }
}
