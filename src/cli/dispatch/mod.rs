//! Maps validated CLI matches to an `Action`.

use crate::cli::{
    actions::{api_keys, session::RegisterArgs, watch, Action},
    commands,
    globals::GlobalArgs,
};
use crate::client::types::CreateAPIKeyRequest;
use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;
use std::time::Duration;

/// # Errors
/// Returns an error if required arguments are missing or the subcommand is unknown.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let globals = globals(matches)?;

    match matches.subcommand() {
        Some(("login", _)) => Ok(Action::Login(globals)),
        Some(("register", sub_m)) => Ok(Action::Register(RegisterArgs {
            globals,
            name: sub_m.get_one::<String>("name").cloned(),
        })),
        Some(("whoami", _)) => Ok(Action::Whoami(globals)),
        Some(("logout", _)) => Ok(Action::Logout(globals)),
        Some(("refresh", _)) => Ok(Action::Refresh(globals)),
        Some((commands::api_keys::COMMAND, sub_m)) => Ok(Action::ApiKeys(api_keys::Args {
            globals,
            command: api_keys_command(sub_m)?,
        })),
        Some(("watch", sub_m)) => Ok(Action::Watch(watch::Args {
            globals,
            interval: Duration::from_secs(
                sub_m
                    .get_one::<u64>("interval")
                    .copied()
                    .context("missing required argument: --interval")?,
            ),
        })),
        Some((name, _)) => Err(anyhow!("unknown subcommand: {name}")),
        None => Err(anyhow!("missing subcommand")),
    }
}

fn globals(matches: &clap::ArgMatches) -> Result<GlobalArgs> {
    let api_url = matches
        .get_one::<String>("api-url")
        .cloned()
        .context("missing required argument: --api-url")?;

    let mut globals = GlobalArgs::new(api_url);

    globals.set_credentials(
        matches.get_one::<String>("email").cloned(),
        matches
            .get_one::<String>("password")
            .map(|password| SecretString::from(password.clone())),
    );

    if let Some(timeout) = matches.get_one::<u64>("timeout") {
        globals.timeout = Duration::from_secs(*timeout);
    }

    Ok(globals)
}

fn api_keys_command(matches: &clap::ArgMatches) -> Result<api_keys::Command> {
    match matches.subcommand() {
        Some(("list", _)) => Ok(api_keys::Command::List),
        Some(("create", sub_m)) => Ok(api_keys::Command::Create(CreateAPIKeyRequest {
            name: sub_m
                .get_one::<String>("name")
                .cloned()
                .context("missing required argument: --name")?,
            permissions: sub_m
                .get_many::<String>("permission")
                .map(|values| values.cloned().collect())
                .unwrap_or_default(),
            graph_id: sub_m.get_one::<String>("graph-id").cloned(),
            expires_at: sub_m.get_one::<String>("expires-at").cloned(),
        })),
        Some(("revoke", sub_m)) => Ok(api_keys::Command::Revoke {
            id: sub_m
                .get_one::<String>("id")
                .cloned()
                .context("missing required argument: <id>")?,
        }),
        Some((name, _)) => Err(anyhow!("unknown api-keys subcommand: {name}")),
        None => Err(anyhow!("missing api-keys subcommand")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn matches(args: &[&str]) -> clap::ArgMatches {
        let mut argv = vec!["robosystems-auth", "--api-url", "http://localhost:8000"];
        argv.extend_from_slice(args);
        commands::new().get_matches_from(argv)
    }

    fn with_clean_env<F: FnOnce()>(f: F) {
        temp_env::with_vars(
            [
                ("ROBOSYSTEMS_API_URL", None::<&str>),
                ("ROBOSYSTEMS_EMAIL", None),
                ("ROBOSYSTEMS_PASSWORD", None),
                ("ROBOSYSTEMS_TIMEOUT", None),
                ("ROBOSYSTEMS_REFRESH_INTERVAL", None),
            ],
            f,
        );
    }

    #[test]
    fn login_carries_credentials() {
        with_clean_env(|| {
            let action = handler(&matches(&[
                "--email",
                "a@b.com",
                "--password",
                "secret",
                "--timeout",
                "5",
                "login",
            ]));

            match action {
                Ok(Action::Login(globals)) => {
                    assert_eq!(globals.api_url, "http://localhost:8000");
                    assert_eq!(globals.email.as_deref(), Some("a@b.com"));
                    assert_eq!(
                        globals.password.as_ref().map(|p| p.expose_secret().to_string()),
                        Some("secret".to_string())
                    );
                    assert_eq!(globals.timeout, Duration::from_secs(5));
                }
                other => panic!("unexpected action: {other:?}"),
            }
        });
    }

    #[test]
    fn register_takes_optional_name() {
        with_clean_env(|| {
            let action = handler(&matches(&["register", "--name", "Ada"]));
            assert!(matches!(
                action,
                Ok(Action::Register(RegisterArgs { name: Some(ref name), .. })) if name == "Ada"
            ));

            let action = handler(&matches(&["register"]));
            assert!(matches!(
                action,
                Ok(Action::Register(RegisterArgs { name: None, .. }))
            ));
        });
    }

    #[test]
    fn api_keys_create_builds_request() {
        with_clean_env(|| {
            let action = handler(&matches(&[
                "api-keys",
                "create",
                "--name",
                "ci",
                "--permission",
                "read",
                "--expires-at",
                "2030-01-01T00:00:00Z",
            ]));

            match action {
                Ok(Action::ApiKeys(api_keys::Args {
                    command: api_keys::Command::Create(request),
                    ..
                })) => {
                    assert_eq!(
                        request,
                        CreateAPIKeyRequest {
                            name: "ci".to_string(),
                            permissions: vec!["read".to_string()],
                            graph_id: None,
                            expires_at: Some("2030-01-01T00:00:00Z".to_string()),
                        }
                    );
                }
                other => panic!("unexpected action: {other:?}"),
            }
        });
    }

    #[test]
    fn api_keys_revoke_takes_id() {
        with_clean_env(|| {
            let action = handler(&matches(&["api-keys", "revoke", "key-1"]));
            assert!(matches!(
                action,
                Ok(Action::ApiKeys(api_keys::Args {
                    command: api_keys::Command::Revoke { ref id },
                    ..
                })) if id == "key-1"
            ));
        });
    }

    #[test]
    fn watch_interval_in_seconds() {
        with_clean_env(|| {
            let action = handler(&matches(&["watch", "--interval", "30"]));
            assert!(matches!(
                action,
                Ok(Action::Watch(watch::Args { interval, .. })) if interval == Duration::from_secs(30)
            ));
        });
    }
}
