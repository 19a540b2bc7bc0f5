//! Create command implementation.

use super::{CommandContext, parse_status};
use crate::cli::CreateArgs;
use crate::config;
use crate::error::Result;
use crate::format::{IssueOutput, format_issue_card};
use crate::view::available_transitions;

/// Execute the create command.
///
/// The arguments fill the dashboard's creation form, which validates the
/// draft before anything reaches the store.
///
/// # Errors
///
/// Returns an error if nobody is signed in, the draft is invalid, or the store rejects it.
pub fn execute(args: &CreateArgs, cli: &config::CliOverrides) -> Result<()> {
    let status = parse_status(args.status.as_deref())?.unwrap_or_default();
    let ctx = CommandContext::load(cli)?;
    let mut board = ctx.mount_board()?;

    {
        let form = board.form_mut();
        form.open();
        form.title.clone_from(&args.title);
        form.description.clone_from(&args.description);
        form.status = status;
    }

    if let Err(err) = board.create().map(|_| ()) {
        ctx.out.notices(&board.take_notices());
        return Err(err);
    }

    let issue = &board.issues()[0];
    if ctx.out.is_json() {
        return ctx.out.json(&IssueOutput {
            issue,
            transitions: available_transitions(issue.status).to_vec(),
            notices: board.notices(),
        });
    }

    ctx.out.print(&format_issue_card(issue, ctx.out.text_options()));
    let notices = board.take_notices();
    ctx.out.notices(&notices);
    Ok(())
}
