//! Auth command implementation: sign up, sign in, sign out.

use super::CommandContext;
use crate::cli::{AuthCommands, CredentialArgs};
use crate::config::{self, Backend, Settings};
use crate::error::Result;
use crate::format::{SessionOutput, format_identity};
use crate::session::{
    IdentityProvider, LocalIdentityProvider, RemoteIdentityProvider, SignUp, clear_session,
};

/// Execute an auth subcommand.
///
/// # Errors
///
/// Returns provider errors (bad input, taken email, rejected credentials,
/// unreachable backend) or I/O errors on the session file.
pub fn execute(command: &AuthCommands, cli: &config::CliOverrides) -> Result<()> {
    let mut ctx = CommandContext::load(cli)?;
    match command {
        AuthCommands::Signup(args) => signup(&mut ctx, args),
        AuthCommands::Login(args) => login(&mut ctx, args),
        AuthCommands::Logout => logout(&mut ctx),
    }
}

/// Run `f` with the identity provider paired with the configured backend.
fn with_provider<T>(
    settings: &Settings,
    f: impl FnOnce(&mut dyn IdentityProvider) -> Result<T>,
) -> Result<T> {
    match settings.backend {
        Backend::Sqlite => {
            let mut storage = settings.open_storage()?;
            let mut provider = LocalIdentityProvider::new(&mut storage);
            f(&mut provider)
        }
        Backend::Rest => {
            let mut provider = RemoteIdentityProvider::new(settings.rest_config()?)?;
            f(&mut provider)
        }
    }
}

fn signup(ctx: &mut CommandContext, args: &CredentialArgs) -> Result<()> {
    let CommandContext {
        settings,
        session,
        out,
    } = ctx;
    let outcome = with_provider(settings, |provider| {
        session.sign_up(provider, &args.email, &args.password)
    })?;

    let (identity, provider, confirmation_required) = match &outcome {
        SignUp::SignedIn(s) => (&s.identity, Some(s.provider.as_str()), false),
        SignUp::ConfirmationRequired(identity) => (identity, None, true),
    };

    if out.is_json() {
        return out.json(&SessionOutput {
            signed_in: !confirmation_required,
            identity: Some(identity),
            provider,
            confirmation_required,
        });
    }

    if confirmation_required {
        out.print(&format!(
            "Account created for {}. Confirm your email, then run: it auth login",
            identity.email
        ));
    } else {
        out.print(&format!("Account created. Signed in as {}", identity.email));
    }
    Ok(())
}

fn login(ctx: &mut CommandContext, args: &CredentialArgs) -> Result<()> {
    let CommandContext {
        settings,
        session,
        out,
    } = ctx;
    let active = with_provider(settings, |provider| {
        session
            .sign_in(provider, &args.email, &args.password)
            .cloned()
    })?;

    if out.is_json() {
        return out.json(&SessionOutput {
            signed_in: true,
            identity: Some(&active.identity),
            provider: Some(&active.provider),
            confirmation_required: false,
        });
    }

    out.print(&format!("Signed in as {}", active.identity.email));
    out.print(&format_identity(&active.identity, out.use_color()));
    Ok(())
}

fn logout(ctx: &mut CommandContext) -> Result<()> {
    let CommandContext {
        settings,
        session,
        out,
    } = ctx;

    let was_signed_in = if session.current().is_some() {
        with_provider(settings, |provider| session.sign_out(provider))?
    } else {
        false
    };
    // A session left behind by the other backend is removed too.
    let removed = clear_session(&settings.session_file)?;

    if out.is_json() {
        return out.json(&SessionOutput {
            signed_in: false,
            identity: None,
            provider: None,
            confirmation_required: false,
        });
    }

    if was_signed_in || removed {
        out.print("Signed out");
    } else {
        out.print("Not signed in");
    }
    Ok(())
}
