use super::{print_json, signed_in};
use crate::{
    cli::globals::GlobalArgs,
    client::types::CreateAPIKeyRequest,
    session::SessionConfig,
};
use anyhow::{Context, Result};
use serde_json::json;
use tracing::info;

#[derive(Debug)]
pub enum Command {
    List,
    Create(CreateAPIKeyRequest),
    Revoke { id: String },
}

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub command: Command,
}

/// Sign in and run the API key command.
///
/// # Errors
/// Returns an error if the sign-in or the API key call fails.
pub async fn execute(args: Args) -> Result<()> {
    let provider = signed_in(&args.globals, SessionConfig::default()).await?;
    let session = provider.handle();

    match args.command {
        Command::List => {
            let keys = session.api_keys().await.context("Could not list API keys")?;
            info!("found {} API keys", keys.len());
            print_json(&keys)
        }

        Command::Create(request) => {
            let key = session
                .create_api_key(&request)
                .await
                .with_context(|| format!("Could not create API key {}", request.name))?;
            info!("created API key {}", key.id);
            print_json(&key)
        }

        Command::Revoke { id } => {
            session
                .revoke_api_key(&id)
                .await
                .with_context(|| format!("Could not revoke API key {id}"))?;
            info!("revoked API key {}", id);
            print_json(&json!({ "id": id, "revoked": true }))
        }
    }
}
