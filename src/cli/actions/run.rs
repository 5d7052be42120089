use crate::cli::actions::{api_keys, session, watch, Action};
use anyhow::Result;

/// Execute the provided action.
// This is the single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Login(globals) => session::login(&globals).await,
        Action::Register(args) => session::register(args).await,
        Action::Whoami(globals) => session::whoami(&globals).await,
        Action::Logout(globals) => session::logout(&globals).await,
        Action::Refresh(globals) => session::refresh(&globals).await,
        Action::ApiKeys(args) => api_keys::execute(args).await,
        Action::Watch(args) => watch::execute(args).await,
    }
}
