use clap::{value_parser, Arg, Command};

pub const CMD_TASKS: &str = "tasks";
pub const CMD_FILES: &str = "files";

pub const ARG_TASK_ID: &str = "task-id";
pub const ARG_FILE_ID: &str = "file-id";
pub const ARG_PATH: &str = "path";
pub const ARG_DESCRIPTION: &str = "description";
pub const ARG_OUTPUT: &str = "output";

fn task_id() -> Arg {
    Arg::new(ARG_TASK_ID)
        .help("Task id")
        .required(true)
        .value_parser(value_parser!(u64))
}

fn file_id() -> Arg {
    Arg::new(ARG_FILE_ID)
        .help("File id")
        .required(true)
        .value_parser(value_parser!(u64))
}

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command
        .subcommand(
            Command::new(CMD_TASKS)
                .about("Tasks assigned to you")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(Command::new("list").about("List your tasks"))
                .subcommand(Command::new("done").about("Mark a task as completed").arg(task_id()))
                .subcommand(
                    Command::new("undo")
                        .about("Mark a task as not completed")
                        .arg(task_id()),
                )
                .subcommand(Command::new("delete").about("Delete a task").arg(task_id())),
        )
        .subcommand(
            Command::new(CMD_FILES)
                .about("Files attached to a task")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(Command::new("list").about("List the files of a task").arg(task_id()))
                .subcommand(
                    Command::new("upload")
                        .about("Attach a file to a task")
                        .arg(task_id())
                        .arg(Arg::new(ARG_PATH).help("File to upload").required(true))
                        .arg(
                            Arg::new(ARG_DESCRIPTION)
                                .short('d')
                                .long(ARG_DESCRIPTION)
                                .help("Short description of the file"),
                        ),
                )
                .subcommand(
                    Command::new("delete")
                        .about("Remove a file from a task")
                        .arg(task_id())
                        .arg(file_id()),
                )
                .subcommand(
                    Command::new("download")
                        .about("Download a file of a task")
                        .arg(task_id())
                        .arg(file_id())
                        .arg(
                            Arg::new(ARG_OUTPUT)
                                .short('o')
                                .long(ARG_OUTPUT)
                                .help("Destination path (default: the file's name)"),
                        ),
                ),
        )
}
