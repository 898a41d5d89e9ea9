use crate::{
    api::{
        types::{FileUpload, NewTask, Task, TaskFile},
        ApiClient,
    },
    error::Error,
};
use reqwest::Method;
use std::collections::BTreeMap;
use tracing::{info, warn};

pub const MANAGER_TASKS_PATH: &str = "manager-tasks/";

/// Result of [`ApiClient::assign_task`]. The task exists once this is
/// returned; a failed attachment does not roll it back.
#[derive(Debug)]
pub struct Assignment {
    pub task: Task,
    pub attachment: Option<Result<TaskFile, Error>>,
}

impl ApiClient {
    /// Tasks the logged-in manager has assigned.
    ///
    /// # Errors
    /// Returns auth, transport, HTTP or decode errors.
    pub async fn manager_tasks(&self) -> Result<Vec<Task>, Error> {
        self.collect(MANAGER_TASKS_PATH).await
    }

    /// Manager tasks keyed by assignee id. Unassigned tasks are skipped.
    ///
    /// # Errors
    /// Returns auth, transport, HTTP or decode errors.
    pub async fn manager_tasks_by_assignee(&self) -> Result<BTreeMap<u64, Vec<Task>>, Error> {
        Ok(group_by_assignee(self.manager_tasks().await?))
    }

    /// Creates a task for an employee and optionally attaches a file to it.
    ///
    /// # Errors
    /// Returns `ValidationError::MissingField` before any request, or the
    /// error of the create call.
    pub async fn assign_task(
        &self,
        task: NewTask,
        attachment: Option<FileUpload>,
    ) -> Result<Assignment, Error> {
        task.validate()?;

        let created: Task = self
            .send_json(Method::POST, MANAGER_TASKS_PATH, &task.body())
            .await?;
        info!(task_id = created.id, assigned_to = task.assigned_to, "task assigned");

        let attachment = match attachment {
            Some(upload) => {
                let result = self.upload_task_file(created.id, upload).await;
                if let Err(err) = &result {
                    warn!(task_id = created.id, "task created but file upload failed: {err}");
                }
                Some(result)
            }
            None => None,
        };

        Ok(Assignment {
            task: created,
            attachment,
        })
    }
}

fn group_by_assignee(tasks: Vec<Task>) -> BTreeMap<u64, Vec<Task>> {
    let mut grouped: BTreeMap<u64, Vec<Task>> = BTreeMap::new();
    for task in tasks {
        if let Some(assignee) = task.assigned_to {
            grouped.entry(assignee).or_default().push(task);
        }
    }
    grouped
}
