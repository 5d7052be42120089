use clap::{Arg, ArgAction, Command};

pub const COMMAND: &str = "api-keys";

#[must_use]
pub fn subcommand() -> Command {
    Command::new(COMMAND)
        .about("Manage API keys for the signed-in user")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(Command::new("list").about("List API keys"))
        .subcommand(
            Command::new("create")
                .about("Create an API key; the secret is printed once")
                .arg(
                    Arg::new("name")
                        .long("name")
                        .help("Name of the key")
                        .required(true),
                )
                .arg(
                    Arg::new("permission")
                        .long("permission")
                        .help("Permission granted to the key, may be repeated")
                        .action(ArgAction::Append)
                        .required(true),
                )
                .arg(
                    Arg::new("graph-id")
                        .long("graph-id")
                        .help("Restrict the key to one graph"),
                )
                .arg(
                    Arg::new("expires-at")
                        .long("expires-at")
                        .help("Expiry timestamp, ISO 8601"),
                ),
        )
        .subcommand(
            Command::new("revoke").about("Revoke an API key").arg(
                Arg::new("id")
                    .help("Id of the key to revoke")
                    .required(true),
            ),
        )
}
