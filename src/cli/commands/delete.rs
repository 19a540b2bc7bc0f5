//! Delete command implementation.

use super::CommandContext;
use crate::cli::DeleteArgs;
use crate::config;
use crate::error::Result;
use crate::format::DeletedOutput;
use crate::util::normalize_id;
use tracing::info;

/// Execute the delete command.
///
/// # Errors
///
/// Returns an error if nobody is signed in, the issue is not one of the
/// user's, or the store call fails.
pub fn execute(args: &DeleteArgs, cli: &config::CliOverrides) -> Result<()> {
    let id = normalize_id(&args.id);
    let ctx = CommandContext::load(cli)?;
    let mut board = ctx.mount_board()?;

    if let Err(err) = board.delete(&id) {
        ctx.out.notices(&board.take_notices());
        return Err(err.with_known_ids(board.ids()));
    }
    info!(%id, "Deleted issue");

    if ctx.out.is_json() {
        return ctx.out.json(&DeletedOutput {
            deleted: &id,
            notices: board.notices(),
        });
    }

    ctx.out.notices(&board.take_notices());
    Ok(())
}
