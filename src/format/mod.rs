//! Output formatting for `issuetrack`.
//!
//! Supports human-readable text output and machine-parseable JSON.
//! JSON goes to stdout with diagnostics on stderr.

mod output;
mod text;

pub use output::{DeletedOutput, IssueListOutput, IssueOutput, ProfileOutput, SessionOutput};
pub use text::{
    EMPTY_HINT, EMPTY_TITLE, TextFormatOptions, format_empty, format_identity, format_issue_card,
    format_issue_line, format_issue_line_with, format_notice, format_status_badge,
    format_status_icon, format_status_label, format_transitions, terminal_width, truncate_title,
};
