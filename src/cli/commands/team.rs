use clap::{value_parser, Arg, Command};

pub const CMD_TEAM: &str = "team";
pub const CMD_PROFILE: &str = "profile";

pub const ARG_ASSIGNEE: &str = "to";
pub const ARG_TITLE: &str = "title";
pub const ARG_DESCRIPTION: &str = "description";
pub const ARG_DUE: &str = "due";
pub const ARG_FILE: &str = "file";
pub const ARG_FILE_DESCRIPTION: &str = "file-description";
pub const ARG_EMAIL: &str = "email";
pub const ARG_PICTURE: &str = "picture";

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command
        .subcommand(
            Command::new(CMD_TEAM)
                .about("Manage the employees of your departments")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(Command::new("employees").about("List your department's employees"))
                .subcommand(Command::new("tasks").about("List assigned tasks grouped by employee"))
                .subcommand(
                    Command::new("assign")
                        .about("Assign a new task to an employee")
                        .arg(
                            Arg::new(ARG_ASSIGNEE)
                                .long(ARG_ASSIGNEE)
                                .help("Employee id")
                                .required(true)
                                .value_parser(value_parser!(u64)),
                        )
                        .arg(
                            Arg::new(ARG_TITLE)
                                .long(ARG_TITLE)
                                .help("Task title")
                                .default_value(""),
                        )
                        .arg(
                            Arg::new(ARG_DESCRIPTION)
                                .long(ARG_DESCRIPTION)
                                .help("Task description")
                                .default_value(""),
                        )
                        .arg(
                            Arg::new(ARG_DUE)
                                .long(ARG_DUE)
                                .help("Due date, example: 2026-10-31")
                                .default_value(""),
                        )
                        .arg(
                            Arg::new(ARG_FILE)
                                .long(ARG_FILE)
                                .help("File to attach to the new task"),
                        )
                        .arg(
                            Arg::new(ARG_FILE_DESCRIPTION)
                                .long(ARG_FILE_DESCRIPTION)
                                .help("Description of the attached file")
                                .requires(ARG_FILE),
                        ),
                ),
        )
        .subcommand(
            Command::new(CMD_PROFILE)
                .about("Your employee profile")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(
                    Command::new("update")
                        .about("Change your e-mail address or profile picture")
                        .arg(Arg::new(ARG_EMAIL).long(ARG_EMAIL).help("New e-mail address"))
                        .arg(
                            Arg::new(ARG_PICTURE)
                                .long(ARG_PICTURE)
                                .help("Image file for the profile picture"),
                        ),
                ),
        )
}
