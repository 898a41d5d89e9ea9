use crate::config::{Overrides, ENV_API_BASE_URL, ENV_STORE_DIR, ENV_TIMEOUT_SECS};
use clap::{Arg, ArgAction, ArgMatches, Command};

pub const ARG_API_URL: &str = "api-url";
pub const ARG_STORE_DIR: &str = "store-dir";
pub const ARG_EPHEMERAL: &str = "ephemeral";
pub const ARG_TIMEOUT: &str = "timeout";

#[derive(Debug, Default)]
pub struct Options {
    pub overrides: Overrides,
    pub ephemeral: bool,
}

impl Options {
    #[must_use]
    pub fn parse(matches: &ArgMatches) -> Self {
        let read = |id: &str| matches.get_one::<String>(id).map(String::as_str);
        Self {
            overrides: Overrides::new(read(ARG_API_URL), read(ARG_STORE_DIR), read(ARG_TIMEOUT)),
            ephemeral: matches.get_flag(ARG_EPHEMERAL),
        }
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_URL)
                .long(ARG_API_URL)
                .help("Base URL of the task API, example: https://tasks.example.com/api/")
                .env(ENV_API_BASE_URL)
                .global(true),
        )
        .arg(
            Arg::new(ARG_STORE_DIR)
                .long(ARG_STORE_DIR)
                .help("Directory holding session tokens (default: ~/.rakmedia)")
                .env(ENV_STORE_DIR)
                .global(true),
        )
        .arg(
            Arg::new(ARG_EPHEMERAL)
                .long(ARG_EPHEMERAL)
                .help("Keep the session in memory only; nothing is written to disk")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .long(ARG_TIMEOUT)
                .help("Request timeout in seconds (default: none)")
                .env(ENV_TIMEOUT_SECS)
                .global(true),
        )
}
