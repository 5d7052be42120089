use super::{print_json, signed_in, SessionOutput};
use crate::{
    cli::globals::GlobalArgs,
    session::{SessionConfig, SessionStatus},
};
use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub interval: Duration,
}

/// Hold a session open, refreshing it in the background, until Ctrl-C or
/// until the session is lost.
///
/// # Errors
/// Returns an error if the sign-in fails or the signal handler cannot be installed.
pub async fn execute(args: Args) -> Result<()> {
    let config = SessionConfig {
        refresh_interval: args.interval,
    };

    let provider = signed_in(&args.globals, config).await?;
    let mut receiver = provider.subscribe();

    info!(
        "watching session, refreshing every {} seconds",
        args.interval.as_secs()
    );

    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for Ctrl-C")?;
                info!("interrupted, signing out");
                provider.logout().await;
                break;
            }

            changed = receiver.changed() => {
                if changed.is_err() {
                    break;
                }

                let session = receiver.borrow_and_update().clone();

                match session.status() {
                    SessionStatus::Authenticated => info!("session refreshed"),
                    SessionStatus::Anonymous => {
                        warn!("session ended");
                        break;
                    }
                    SessionStatus::Initializing => {}
                }
            }
        }
    }

    print_json(&SessionOutput::from(&provider.session()))
}
