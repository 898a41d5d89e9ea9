//! Maps validated CLI matches to an [`Action`] and the global settings it
//! runs with.

use crate::api::types::NewTask;
use crate::cli::{
    actions::{
        files::FileAction, profile::UpdateArgs, session::LoginArgs, tasks::TaskAction,
        team::TeamAction, Action,
    },
    commands::{connection, session, tasks, team},
    globals::GlobalArgs,
};
use crate::config::{apply_overrides, AppConfig};
use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use secrecy::SecretString;
use std::path::PathBuf;

/// Configuration with command-line flags applied over the environment.
#[must_use]
pub fn globals(matches: &ArgMatches) -> GlobalArgs {
    let options = connection::Options::parse(matches);
    let mut config = AppConfig::load();
    apply_overrides(&mut config, options.overrides);
    GlobalArgs::new(config, options.ephemeral)
}

fn task_id(matches: &ArgMatches) -> Result<u64> {
    matches
        .get_one::<u64>(tasks::ARG_TASK_ID)
        .copied()
        .context("missing required argument: <task-id>")
}

fn file_id(matches: &ArgMatches) -> Result<u64> {
    matches
        .get_one::<u64>(tasks::ARG_FILE_ID)
        .copied()
        .context("missing required argument: <file-id>")
}

fn string(matches: &ArgMatches, id: &str) -> Option<String> {
    matches
        .get_one::<String>(id)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn path(matches: &ArgMatches, id: &str) -> Option<PathBuf> {
    string(matches, id).map(PathBuf::from)
}

fn task_action(matches: &ArgMatches) -> Result<TaskAction> {
    match matches.subcommand() {
        Some(("list", _)) => Ok(TaskAction::List),
        Some(("done", sub)) => Ok(TaskAction::SetCompleted {
            task_id: task_id(sub)?,
            completed: true,
        }),
        Some(("undo", sub)) => Ok(TaskAction::SetCompleted {
            task_id: task_id(sub)?,
            completed: false,
        }),
        Some(("delete", sub)) => Ok(TaskAction::Delete {
            task_id: task_id(sub)?,
        }),
        _ => Err(anyhow!("unknown tasks command")),
    }
}

fn file_action(matches: &ArgMatches) -> Result<FileAction> {
    match matches.subcommand() {
        Some(("list", sub)) => Ok(FileAction::List {
            task_id: task_id(sub)?,
        }),
        Some(("upload", sub)) => Ok(FileAction::Upload {
            task_id: task_id(sub)?,
            path: path(sub, tasks::ARG_PATH).context("missing required argument: <path>")?,
            description: string(sub, tasks::ARG_DESCRIPTION),
        }),
        Some(("delete", sub)) => Ok(FileAction::Delete {
            task_id: task_id(sub)?,
            file_id: file_id(sub)?,
        }),
        Some(("download", sub)) => Ok(FileAction::Download {
            task_id: task_id(sub)?,
            file_id: file_id(sub)?,
            output: path(sub, tasks::ARG_OUTPUT),
        }),
        _ => Err(anyhow!("unknown files command")),
    }
}

fn team_action(matches: &ArgMatches) -> Result<TeamAction> {
    match matches.subcommand() {
        Some(("employees", _)) => Ok(TeamAction::Employees),
        Some(("tasks", _)) => Ok(TeamAction::Tasks),
        Some(("assign", sub)) => Ok(TeamAction::Assign {
            task: NewTask {
                title: string(sub, team::ARG_TITLE).unwrap_or_default(),
                description: string(sub, team::ARG_DESCRIPTION).unwrap_or_default(),
                due_date: string(sub, team::ARG_DUE).unwrap_or_default(),
                assigned_to: sub
                    .get_one::<u64>(team::ARG_ASSIGNEE)
                    .copied()
                    .context("missing required argument: --to")?,
            },
            file: path(sub, team::ARG_FILE),
            file_description: string(sub, team::ARG_FILE_DESCRIPTION),
        }),
        _ => Err(anyhow!("unknown team command")),
    }
}

/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    match matches.subcommand() {
        Some((session::CMD_LOGIN, sub)) => Ok(Action::Login(LoginArgs {
            username: string(sub, session::ARG_USERNAME)
                .context("missing required argument: <username>")?,
            password: sub
                .get_one::<String>(session::ARG_PASSWORD)
                .filter(|value| !value.is_empty())
                .map(|value| SecretString::from(value.clone())),
        })),
        Some((session::CMD_LOGOUT, _)) => Ok(Action::Logout),
        Some((session::CMD_WHOAMI, _)) => Ok(Action::WhoAmI),
        Some((session::CMD_OPEN, sub)) => Ok(Action::Open {
            location: sub
                .get_one::<String>(session::ARG_LOCATION)
                .cloned()
                .context("missing required argument: <location>")?,
        }),
        Some((tasks::CMD_TASKS, sub)) => Ok(Action::Tasks(task_action(sub)?)),
        Some((tasks::CMD_FILES, sub)) => Ok(Action::Files(file_action(sub)?)),
        Some((team::CMD_TEAM, sub)) => Ok(Action::Team(team_action(sub)?)),
        Some((team::CMD_PROFILE, sub)) => match sub.subcommand() {
            Some(("update", update)) => Ok(Action::Profile(UpdateArgs {
                email: string(update, team::ARG_EMAIL),
                picture: path(update, team::ARG_PICTURE),
            })),
            _ => Err(anyhow!("unknown profile command")),
        },
        _ => Err(anyhow!("no command given, see --help")),
    }
}
