//! List command implementation.
//!
//! Mounts the dashboard and prints the owner's issues, newest first.
//! The status filter is applied to the fetched list, not sent to the store.

use super::{CommandContext, parse_status};
use crate::cli::ListArgs;
use crate::config;
use crate::error::Result;
use crate::format::{IssueListOutput, format_empty, format_issue_line_with};
use crate::model::Issue;
use tracing::debug;

/// Execute the list command.
///
/// # Errors
///
/// Returns an error if nobody is signed in, the status is invalid, or the fetch fails.
pub fn execute(args: &ListArgs, cli: &config::CliOverrides) -> Result<()> {
    let status = parse_status(args.status.as_deref())?;
    let ctx = CommandContext::load(cli)?;
    let mut board = ctx.mount_board()?;

    let issues: Vec<&Issue> = match status {
        Some(status) => board.with_status(status).collect(),
        None => board.issues().iter().collect(),
    };
    debug!(shown = issues.len(), total = board.issues().len(), "Listing issues");

    if ctx.out.is_json() {
        let count = issues.len();
        return ctx.out.json(&IssueListOutput {
            issues,
            count,
            notices: board.notices(),
        });
    }

    if issues.is_empty() {
        ctx.out.print(&format_empty(ctx.out.use_color()));
    } else {
        let options = ctx.out.text_options();
        for issue in &issues {
            ctx.out.print(&format_issue_line_with(issue, options));
        }
        ctx.out.print(&format!("\n{} issue(s)", issues.len()));
    }
    ctx.out.notices(&board.take_notices());
    Ok(())
}
