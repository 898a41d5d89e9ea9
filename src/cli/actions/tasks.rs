use crate::{
    cli::actions::{print_json, require},
    routes::Route,
    session::context::Session,
};
use anyhow::Result;

#[derive(Debug, PartialEq, Eq)]
pub enum TaskAction {
    List,
    SetCompleted { task_id: u64, completed: bool },
    Delete { task_id: u64 },
}

/// # Errors
/// Returns an error if the session may not use tasks or the API call fails.
pub async fn execute(session: &Session, action: TaskAction) -> Result<()> {
    let api = session.api();
    match action {
        TaskAction::List => {
            require(session, &[Route::Dashboard])?;
            print_json(&api.tasks().await?)
        }
        TaskAction::SetCompleted { task_id, completed } => {
            require(session, &[Route::Dashboard, Route::ManagerDashboard])?;
            let task = api.set_task_completed(task_id, completed).await?;
            let state = if task.completed { "completed" } else { "pending" };
            println!("Task {} \"{}\" is {state}", task.id, task.title);
            Ok(())
        }
        TaskAction::Delete { task_id } => {
            require(session, &[Route::Dashboard, Route::ManagerDashboard])?;
            api.delete_task(task_id).await?;
            println!("Task {task_id} deleted");
            Ok(())
        }
    }
}
