use super::{print_json, sign_in, signed_in, SessionOutput};
use crate::{
    cli::globals::GlobalArgs,
    forms::SignUpForm,
    session::{SessionConfig, SessionProvider},
};
use anyhow::{anyhow, Context, Result};
use secrecy::ExposeSecret;
use tracing::info;

#[derive(Debug)]
pub struct RegisterArgs {
    pub globals: GlobalArgs,
    pub name: Option<String>,
}

/// Sign in with the configured credentials and print the user.
///
/// # Errors
/// Returns an error if credentials are missing or the login fails.
pub async fn login(globals: &GlobalArgs) -> Result<()> {
    let provider = SessionProvider::new(globals.client()?, SessionConfig::default());
    provider.ready().await;

    let user = sign_in(globals, &provider).await?;

    print_json(&user)
}

/// Create an account with the configured credentials and print the user.
///
/// # Errors
/// Returns an error if credentials are missing or the registration fails.
pub async fn register(args: RegisterArgs) -> Result<()> {
    let RegisterArgs { globals, name } = args;

    let email = globals
        .email
        .as_deref()
        .ok_or_else(|| anyhow!("missing required argument: --email"))?;
    let password = globals
        .password
        .as_ref()
        .ok_or_else(|| anyhow!("missing required argument: --password"))?;

    let provider = SessionProvider::new(globals.client()?, SessionConfig::default());
    provider.ready().await;

    // A single password argument; there is nothing to confirm or accept.
    let mut form = SignUpForm::new()
        .with_confirm_password(false)
        .with_terms_acceptance(false);
    form.set_email(email);
    form.set_password(password.expose_secret());
    if let Some(name) = name {
        form.set_name(name);
    }

    let submitted = form
        .submit(&provider.handle())
        .await
        .with_context(|| format!("Could not register {email}"))?;

    info!("registered, continue at {}", submitted.redirect_to);

    print_json(&submitted.user)
}

/// Print the session, signing in first when credentials are configured.
///
/// # Errors
/// Returns an error if the client cannot be built or a configured sign-in fails.
pub async fn whoami(globals: &GlobalArgs) -> Result<()> {
    let provider = SessionProvider::new(globals.client()?, SessionConfig::default());
    let mut session = provider.ready().await;

    if !session.is_authenticated() && globals.email.is_some() && globals.password.is_some() {
        sign_in(globals, &provider).await?;
        session = provider.session();
    }

    print_json(&SessionOutput::from(&session))
}

/// Sign in, end the session and print the resulting state.
///
/// # Errors
/// Returns an error if the sign-in fails; a failed remote logout is only logged.
pub async fn logout(globals: &GlobalArgs) -> Result<()> {
    let provider = signed_in(globals, SessionConfig::default()).await?;

    provider.logout().await;

    print_json(&SessionOutput::from(&provider.session()))
}

/// Sign in, refresh the session and print the user.
///
/// # Errors
/// Returns an error if the sign-in or the refresh fails.
pub async fn refresh(globals: &GlobalArgs) -> Result<()> {
    let provider = signed_in(globals, SessionConfig::default()).await?;

    let user = provider
        .refresh_session()
        .await
        .context("Could not refresh the session")?;

    print_json(&user)
}
