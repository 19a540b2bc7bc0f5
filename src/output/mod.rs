//! Central output coordinator.
//!
//! Decides between colored text, plain text, JSON, and quiet output, and
//! routes notices: successes to stdout, errors to stderr.

use crate::config::Settings;
use crate::error::Result;
use crate::format::{TextFormatOptions, format_notice, terminal_width};
use crate::view::Notice;
use serde::Serialize;
use std::io::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Colored text
    Rich,
    /// Plain text, no ANSI codes (for piping)
    Plain,
    /// JSON output only
    Json,
    /// Errors only
    Quiet,
}

/// Output settings for one command.
#[derive(Debug, Clone, Copy)]
pub struct OutputContext {
    mode: OutputMode,
    width: Option<usize>,
}

impl OutputContext {
    /// Create from CLI-style flags.
    #[must_use]
    pub fn from_flags(json: bool, quiet: bool, color: bool) -> Self {
        let tty = std::io::stdout().is_terminal();
        let mode = if json {
            OutputMode::Json
        } else if quiet {
            OutputMode::Quiet
        } else if !color || std::env::var_os("NO_COLOR").is_some() || !tty {
            OutputMode::Plain
        } else {
            OutputMode::Rich
        };

        Self {
            mode,
            width: tty.then(terminal_width),
        }
    }

    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self::from_flags(settings.json, settings.quiet, settings.color)
    }

    #[must_use]
    pub const fn mode(&self) -> OutputMode {
        self.mode
    }

    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    #[must_use]
    pub fn is_quiet(&self) -> bool {
        self.mode == OutputMode::Quiet
    }

    #[must_use]
    pub fn use_color(&self) -> bool {
        self.mode == OutputMode::Rich
    }

    #[must_use]
    pub fn text_options(&self) -> TextFormatOptions {
        TextFormatOptions {
            use_color: self.use_color(),
            max_width: self.width,
        }
    }

    /// Print a line of text (nothing in JSON or quiet mode).
    pub fn print(&self, content: &str) {
        if matches!(self.mode, OutputMode::Rich | OutputMode::Plain) {
            println!("{content}");
        }
    }

    /// Print a JSON document to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    /// Show notices. In JSON mode they travel inside the payload instead.
    pub fn notices(&self, notices: &[Notice]) {
        if self.is_json() {
            return;
        }
        for notice in notices {
            if notice.is_error() {
                eprintln!("{}", format_notice(notice, self.use_color()));
            } else if !self.is_quiet() {
                println!("{}", format_notice(notice, self.use_color()));
            }
        }
    }
}
