use crate::{
    api::types::FileUpload,
    cli::actions::{print_json, require},
    routes::Route,
    session::context::Session,
};
use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;

#[derive(Debug, PartialEq, Eq)]
pub enum FileAction {
    List {
        task_id: u64,
    },
    Upload {
        task_id: u64,
        path: PathBuf,
        description: Option<String>,
    },
    Delete {
        task_id: u64,
        file_id: u64,
    },
    Download {
        task_id: u64,
        file_id: u64,
        output: Option<PathBuf>,
    },
}

/// # Errors
/// Returns an error if the session may not handle files or the API call fails.
pub async fn execute(session: &Session, action: FileAction) -> Result<()> {
    require(session, &[Route::Dashboard, Route::ManagerDashboard])?;
    let api = session.api();

    match action {
        FileAction::List { task_id } => print_json(&api.task_files(task_id).await?),
        FileAction::Upload {
            task_id,
            path,
            description,
        } => {
            let upload = FileUpload::from_path(&path, description).await?;
            let file = api.upload_task_file(task_id, upload).await?;
            println!("Uploaded {} as file {}", file.display_name(), file.id);
            Ok(())
        }
        FileAction::Delete { task_id, file_id } => {
            api.delete_task_file(task_id, file_id).await?;
            println!("File {file_id} removed from task {task_id}");
            Ok(())
        }
        FileAction::Download {
            task_id,
            file_id,
            output,
        } => {
            let file = api
                .task_files(task_id)
                .await?
                .into_iter()
                .find(|file| file.id == file_id)
                .ok_or_else(|| anyhow!("task {task_id} has no file {file_id}"))?;

            let bytes = api.download_file(file.file.as_deref()).await?;
            let output = output.unwrap_or_else(|| PathBuf::from(file.display_name()));
            tokio::fs::write(&output, &bytes)
                .await
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!("Saved {} bytes to {}", bytes.len(), output.display());
            Ok(())
        }
    }
}
