use clap::{Arg, Command};

pub const CMD_LOGIN: &str = "login";
pub const CMD_LOGOUT: &str = "logout";
pub const CMD_WHOAMI: &str = "whoami";
pub const CMD_OPEN: &str = "open";

pub const ARG_USERNAME: &str = "username";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_LOCATION: &str = "location";

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command
        .subcommand(
            Command::new(CMD_LOGIN)
                .about("Log in and store the session tokens")
                .arg(
                    Arg::new(ARG_USERNAME)
                        .help("Account username")
                        .required(true),
                )
                .arg(
                    Arg::new(ARG_PASSWORD)
                        .long(ARG_PASSWORD)
                        .help("Account password; read from stdin when omitted")
                        .env("RAKMEDIA_PASSWORD")
                        .hide_env_values(true),
                ),
        )
        .subcommand(Command::new(CMD_LOGOUT).about("Clear the stored session"))
        .subcommand(Command::new(CMD_WHOAMI).about("Show the logged-in employee"))
        .subcommand(
            Command::new(CMD_OPEN)
                .about("Check whether a screen is reachable with the current session")
                .arg(
                    Arg::new(ARG_LOCATION)
                        .help("Screen path, example: /manager-dashboard")
                        .required(true),
                ),
        )
}
