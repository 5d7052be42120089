pub mod api_keys;
pub mod logging;

use crate::session::MAX_REFRESH_INTERVAL;
use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

pub const DEFAULT_TIMEOUT_SECONDS: &str = "10";
pub const DEFAULT_WATCH_INTERVAL_SECONDS: &str = "600";
pub const MAX_WATCH_INTERVAL_SECONDS: u64 = MAX_REFRESH_INTERVAL.as_secs();

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("robosystems-auth")
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .help("Base URL of the RoboSystems API, example: https://api.robosystems.ai")
                .env("ROBOSYSTEMS_API_URL")
                .required(true),
        )
        .arg(
            Arg::new("email")
                .short('e')
                .long("email")
                .help("Account email used to sign in")
                .env("ROBOSYSTEMS_EMAIL"),
        )
        .arg(
            Arg::new("password")
                .long("password")
                .help("Account password used to sign in")
                .env("ROBOSYSTEMS_PASSWORD")
                .hide_env_values(true),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .help("Per-request timeout in seconds")
                .env("ROBOSYSTEMS_TIMEOUT")
                .default_value(DEFAULT_TIMEOUT_SECONDS)
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .subcommand(Command::new("login").about("Sign in and print the user"))
        .subcommand(
            Command::new("register")
                .about("Create an account and print the user")
                .arg(
                    Arg::new("name")
                        .long("name")
                        .help("Display name for the new account"),
                ),
        )
        .subcommand(Command::new("whoami").about("Print the current session"))
        .subcommand(Command::new("logout").about("Sign in, then end the session"))
        .subcommand(Command::new("refresh").about("Sign in, then refresh the session"))
        .subcommand(api_keys::subcommand())
        .subcommand(
            Command::new("watch")
                .about("Keep a session alive with periodic refreshes until Ctrl-C")
                .arg(
                    Arg::new("interval")
                        .long("interval")
                        .help("Seconds between session refreshes")
                        .env("ROBOSYSTEMS_REFRESH_INTERVAL")
                        .default_value(DEFAULT_WATCH_INTERVAL_SECONDS)
                        .value_parser(
                            clap::value_parser!(u64).range(1..=MAX_WATCH_INTERVAL_SECONDS),
                        ),
                ),
        );

    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENV_VARS: [&str; 7] = [
        "ROBOSYSTEMS_API_URL",
        "ROBOSYSTEMS_EMAIL",
        "ROBOSYSTEMS_PASSWORD",
        "ROBOSYSTEMS_TIMEOUT",
        "ROBOSYSTEMS_LOG_LEVEL",
        "ROBOSYSTEMS_LOG_FORMAT",
        "ROBOSYSTEMS_REFRESH_INTERVAL",
    ];

    fn clean_env<F: FnOnce()>(f: F) {
        temp_env::with_vars(ENV_VARS.map(|var| (var, None::<&str>)), f);
    }

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "robosystems-auth");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some(env!("CARGO_PKG_DESCRIPTION").to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_check_args() {
        clean_env(|| {
            let matches = new().get_matches_from(vec![
                "robosystems-auth",
                "--api-url",
                "https://api.robosystems.ai",
                "--email",
                "a@b.com",
                "--password",
                "secret",
                "--timeout",
                "30",
                "whoami",
            ]);

            assert_eq!(
                matches.get_one::<String>("api-url").cloned(),
                Some("https://api.robosystems.ai".to_string())
            );
            assert_eq!(
                matches.get_one::<String>("email").cloned(),
                Some("a@b.com".to_string())
            );
            assert_eq!(matches.get_one::<u64>("timeout").copied(), Some(30));
            assert_eq!(matches.subcommand_name(), Some("whoami"));
        });
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("ROBOSYSTEMS_API_URL", Some("https://api.robosystems.ai")),
                ("ROBOSYSTEMS_EMAIL", Some("a@b.com")),
                ("ROBOSYSTEMS_PASSWORD", Some("secret")),
                ("ROBOSYSTEMS_TIMEOUT", None),
                ("ROBOSYSTEMS_LOG_LEVEL", Some("info")),
                ("ROBOSYSTEMS_LOG_FORMAT", Some("json")),
                ("ROBOSYSTEMS_REFRESH_INTERVAL", None),
            ],
            || {
                let matches = new().get_matches_from(vec!["robosystems-auth", "login"]);

                assert_eq!(
                    matches.get_one::<String>("api-url").cloned(),
                    Some("https://api.robosystems.ai".to_string())
                );
                assert_eq!(
                    matches.get_one::<String>("password").cloned(),
                    Some("secret".to_string())
                );
                assert_eq!(matches.get_one::<u64>("timeout").copied(), Some(10));
                assert_eq!(matches.get_one::<u8>("verbosity").copied(), Some(2));
                assert_eq!(
                    matches.get_one::<String>("log-format").cloned(),
                    Some("json".to_string())
                );
            },
        );
    }

    #[test]
    fn test_check_log_level_verbosity() {
        let levels = ["error", "warn", "info", "debug", "trace"];
        for (index, _) in levels.iter().enumerate() {
            clean_env(|| {
                let mut args = vec![
                    "robosystems-auth".to_string(),
                    "--api-url".to_string(),
                    "http://localhost:8000".to_string(),
                ];

                // Add the appropriate number of "-v" flags based on the index
                if index > 0 {
                    args.push(format!("-{}", "v".repeat(index)));
                }

                args.push("whoami".to_string());

                let matches = new().get_matches_from(args);

                assert_eq!(
                    matches.get_one::<u8>("verbosity").copied(),
                    u8::try_from(index).ok()
                );
            });
        }
    }

    #[test]
    fn test_api_url_required() {
        clean_env(|| {
            let result = new().try_get_matches_from(vec!["robosystems-auth", "whoami"]);
            assert_eq!(
                result.map_err(|e| e.kind()).err(),
                Some(clap::error::ErrorKind::MissingRequiredArgument)
            );
        });
    }

    #[test]
    fn test_timeout_must_be_positive() {
        clean_env(|| {
            let result = new().try_get_matches_from(vec![
                "robosystems-auth",
                "--api-url",
                "http://localhost:8000",
                "--timeout",
                "0",
                "whoami",
            ]);
            assert_eq!(
                result.map_err(|e| e.kind()).err(),
                Some(clap::error::ErrorKind::ValueValidation)
            );
        });
    }

    #[test]
    fn test_api_keys_create() {
        clean_env(|| {
            let matches = new().get_matches_from(vec![
                "robosystems-auth",
                "--api-url",
                "http://localhost:8000",
                "api-keys",
                "create",
                "--name",
                "ci",
                "--permission",
                "read",
                "--permission",
                "write",
                "--graph-id",
                "kg1",
            ]);

            let create = matches
                .subcommand_matches("api-keys")
                .and_then(|m| m.subcommand_matches("create"));
            let permissions: Vec<String> = create
                .and_then(|m| m.get_many::<String>("permission"))
                .map(|values| values.cloned().collect())
                .unwrap_or_default();

            assert_eq!(permissions, vec!["read".to_string(), "write".to_string()]);
            assert_eq!(
                create.and_then(|m| m.get_one::<String>("graph-id")).cloned(),
                Some("kg1".to_string())
            );
        });
    }

    #[test]
    fn test_watch_interval_default() {
        clean_env(|| {
            let matches = new().get_matches_from(vec![
                "robosystems-auth",
                "--api-url",
                "http://localhost:8000",
                "watch",
            ]);

            assert_eq!(
                matches
                    .subcommand_matches("watch")
                    .and_then(|m| m.get_one::<u64>("interval"))
                    .copied(),
                Some(600)
            );
        });
    }

    #[test]
    fn test_watch_interval_is_bounded() {
        clean_env(|| {
            let result = new().try_get_matches_from(vec![
                "robosystems-auth",
                "--api-url",
                "http://localhost:8000",
                "watch",
                "--interval",
                "18446744073709551615",
            ]);
            assert_eq!(
                result.map_err(|e| e.kind()).err(),
                Some(clap::error::ErrorKind::ValueValidation)
            );

            let matches = new().get_matches_from(vec![
                "robosystems-auth",
                "--api-url",
                "http://localhost:8000",
                "watch",
                "--interval",
                "86400",
            ]);
            assert_eq!(
                matches
                    .subcommand_matches("watch")
                    .and_then(|m| m.get_one::<u64>("interval"))
                    .copied(),
                Some(86_400)
            );
        });
    }
}
