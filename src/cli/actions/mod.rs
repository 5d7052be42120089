pub mod api_keys;
pub mod session;
pub mod watch;

mod run;

use crate::{
    cli::globals::GlobalArgs,
    client::types::User,
    forms::SignInForm,
    session::{Session, SessionConfig, SessionProvider, SessionStatus},
};
use anyhow::{anyhow, Context, Result};
use secrecy::ExposeSecret;
use serde::Serialize;
use tracing::debug;

#[derive(Debug)]
pub enum Action {
    Login(GlobalArgs),
    Register(session::RegisterArgs),
    Whoami(GlobalArgs),
    Logout(GlobalArgs),
    Refresh(GlobalArgs),
    ApiKeys(api_keys::Args),
    Watch(watch::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> Result<()> {
        run::execute(self).await
    }
}

/// JSON shape printed for a session snapshot.
#[derive(Debug, Serialize)]
pub struct SessionOutput<'a> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<&'a User>,
}

impl<'a> From<&'a Session> for SessionOutput<'a> {
    fn from(session: &'a Session) -> Self {
        let status = match session.status() {
            SessionStatus::Initializing => "initializing",
            SessionStatus::Anonymous => "anonymous",
            SessionStatus::Authenticated => "authenticated",
        };

        Self {
            status,
            user: session.user.as_ref(),
        }
    }
}

/// Print a value as pretty JSON on stdout.
///
/// # Errors
/// Returns an error if the value cannot be serialized.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

/// Start a provider and make sure it holds a signed-in session, using the
/// configured credentials when the initial check comes back anonymous.
///
/// # Errors
/// Returns an error if credentials are missing or the sign-in fails.
pub async fn signed_in(globals: &GlobalArgs, config: SessionConfig) -> Result<SessionProvider> {
    let provider = SessionProvider::new(globals.client()?, config);
    let session = provider.ready().await;

    if session.is_authenticated() {
        debug!("reusing existing session");
        return Ok(provider);
    }

    sign_in(globals, &provider).await?;

    Ok(provider)
}

/// Submit the sign-in form with the configured credentials.
///
/// # Errors
/// Returns an error if credentials are missing or the sign-in fails.
pub async fn sign_in(globals: &GlobalArgs, provider: &SessionProvider) -> Result<User> {
    let email = globals
        .email
        .as_deref()
        .ok_or_else(|| anyhow!("missing required argument: --email"))?;
    let password = globals
        .password
        .as_ref()
        .ok_or_else(|| anyhow!("missing required argument: --password"))?;

    let mut form = SignInForm::new();
    form.set_email(email);
    form.set_password(password.expose_secret());

    let submitted = form
        .submit(&provider.handle())
        .await
        .with_context(|| format!("Could not sign in as {email}"))?;

    Ok(submitted.user)
}
