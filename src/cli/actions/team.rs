use crate::{
    api::types::{FileUpload, NewTask},
    cli::actions::{print_json, require},
    routes::Route,
    session::context::Session,
};
use anyhow::Result;
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug)]
pub enum TeamAction {
    Employees,
    Tasks,
    Assign {
        task: NewTask,
        file: Option<PathBuf>,
        file_description: Option<String>,
    },
}

/// # Errors
/// Returns an error if the session is not a manager's or the API call fails.
pub async fn execute(session: &Session, action: TeamAction) -> Result<()> {
    require(session, &[Route::ManagerDashboard])?;
    let api = session.api();

    match action {
        TeamAction::Employees => print_json(&api.department_employees().await?),
        TeamAction::Tasks => print_json(&api.manager_tasks_by_assignee().await?),
        TeamAction::Assign {
            task,
            file,
            file_description,
        } => {
            // Checked up front so a bad form never reads the attachment.
            task.validate()?;
            let attachment = match file {
                Some(path) => Some(FileUpload::from_path(&path, file_description).await?),
                None => None,
            };

            let assignment = api.assign_task(task, attachment).await?;
            println!(
                "Task {} \"{}\" assigned",
                assignment.task.id, assignment.task.title
            );
            match assignment.attachment {
                Some(Ok(file)) => println!("Attached {}", file.display_name()),
                Some(Err(err)) => warn!("task created without its attachment: {err}"),
                None => {}
            }
            Ok(())
        }
    }
}
