//! Whoami command implementation.

use super::CommandContext;
use crate::config;
use crate::error::{Result, TrackError};
use crate::format::{SessionOutput, format_identity};

/// Execute the whoami command.
///
/// # Errors
///
/// `NotAuthenticated` when nobody is signed in (text mode). JSON mode
/// reports `signed_in: false` instead.
pub fn execute(cli: &config::CliOverrides) -> Result<()> {
    let ctx = CommandContext::load(cli)?;
    let current = ctx.session.current();

    if ctx.out.is_json() {
        return ctx.out.json(&SessionOutput {
            signed_in: current.is_some(),
            identity: current.map(|s| &s.identity),
            provider: current.map(|s| s.provider.as_str()),
            confirmation_required: false,
        });
    }

    let session = current.ok_or(TrackError::NotAuthenticated)?;
    ctx.out
        .print(&format_identity(&session.identity, ctx.out.use_color()));
    ctx.out.print(&format!(
        "Backend: {} ({})",
        ctx.settings.backend, session.provider
    ));
    Ok(())
}
