//! Profile command implementation.

use super::CommandContext;
use crate::config;
use crate::error::Result;
use crate::format::{ProfileOutput, format_empty, format_identity, format_issue_card};

/// Execute the profile command.
///
/// # Errors
///
/// Returns an error if nobody is signed in or the fetch fails.
pub fn execute(cli: &config::CliOverrides) -> Result<()> {
    let ctx = CommandContext::load(cli)?;
    let mut profile = ctx.mount_profile()?;

    if ctx.out.is_json() {
        return ctx.out.json(&ProfileOutput {
            identity: profile.identity(),
            member_since: profile.member_since(),
            issue_count: profile.issue_count(),
            issues: profile.issues(),
            notices: profile.notices(),
        });
    }

    let color = ctx.out.use_color();
    ctx.out.print(&format_identity(profile.identity(), color));
    ctx.out
        .print(&format!("\nYour issues ({})", profile.issue_count()));

    if profile.issues().is_empty() {
        ctx.out.print(&format_empty(color));
    } else {
        let options = ctx.out.text_options();
        for issue in profile.issues() {
            ctx.out.print(&format_issue_card(issue, options));
        }
    }
    ctx.out.notices(&profile.take_notices());
    Ok(())
}
