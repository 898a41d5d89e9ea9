use crate::{
    api::{
        types::{Task, TaskUpdate},
        ApiClient,
    },
    error::Error,
};
use reqwest::Method;

pub const TASKS_PATH: &str = "tasks/";

fn task_path(task_id: u64) -> String {
    format!("tasks/{task_id}/")
}

impl ApiClient {
    /// Every task assigned to the logged-in employee, across all pages.
    ///
    /// # Errors
    /// Returns auth, transport, HTTP or decode errors.
    pub async fn tasks(&self) -> Result<Vec<Task>, Error> {
        self.collect(TASKS_PATH).await
    }

    /// # Errors
    /// Returns auth, transport, HTTP or decode errors.
    pub async fn update_task(&self, task_id: u64, update: &TaskUpdate) -> Result<Task, Error> {
        self.send_json(Method::PATCH, &task_path(task_id), update)
            .await
    }

    /// Marks a task complete or incomplete and returns the server's copy.
    ///
    /// # Errors
    /// Returns auth, transport, HTTP or decode errors.
    pub async fn set_task_completed(&self, task_id: u64, completed: bool) -> Result<Task, Error> {
        let update = TaskUpdate {
            completed: Some(completed),
            ..TaskUpdate::default()
        };
        self.update_task(task_id, &update).await
    }

    /// # Errors
    /// Returns auth, transport or HTTP errors.
    pub async fn delete_task(&self, task_id: u64) -> Result<(), Error> {
        self.delete(&task_path(task_id)).await
    }
}
