//! Update command implementation.

use super::{CommandContext, parse_status};
use crate::cli::UpdateArgs;
use crate::config;
use crate::error::Result;
use crate::format::{IssueOutput, format_issue_card, format_transitions};
use crate::model::IssuePatch;
use crate::util::normalize_id;
use crate::view::available_transitions;

/// Execute the update command.
///
/// With no field flags the issue is re-read and shown unchanged, which
/// still verifies that it belongs to the signed-in user.
///
/// # Errors
///
/// Returns an error if nobody is signed in, a value is invalid, the issue
/// is not one of the user's, or the store call fails.
pub fn execute(args: &UpdateArgs, cli: &config::CliOverrides) -> Result<()> {
    let patch = IssuePatch {
        title: args.title.clone(),
        description: args.description.clone(),
        status: parse_status(args.status.as_deref())?,
    };
    let id = normalize_id(&args.id);

    let ctx = CommandContext::load(cli)?;
    let mut board = ctx.mount_board()?;

    let updated = board.update_issue(&id, &patch).map(|issue| issue.id.clone());
    let updated_id = match updated {
        Ok(updated_id) => updated_id,
        Err(err) => {
            ctx.out.notices(&board.take_notices());
            return Err(err.with_known_ids(board.ids()));
        }
    };

    let Some(issue) = board.get(&updated_id) else {
        return Ok(());
    };
    let transitions = available_transitions(issue.status);

    if ctx.out.is_json() {
        return ctx.out.json(&IssueOutput {
            issue,
            transitions: transitions.to_vec(),
            notices: board.notices(),
        });
    }

    ctx.out.print(&format_issue_card(issue, ctx.out.text_options()));
    ctx.out.print(&format_transitions(&transitions));
    let notices = board.take_notices();
    ctx.out.notices(&notices);
    Ok(())
}
