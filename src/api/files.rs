use crate::{
    api::{
        types::{FileUpload, TaskFile},
        ApiClient,
    },
    error::{Error, ValidationError},
};
use reqwest::{
    multipart::{Form, Part},
    Method,
};

fn files_path(task_id: u64) -> String {
    format!("tasks/{task_id}/files/")
}

fn upload_path(task_id: u64) -> String {
    format!("tasks/{task_id}/upload-file/")
}

fn file_path(task_id: u64, file_id: u64) -> String {
    format!("tasks/{task_id}/files/{file_id}/")
}

impl ApiClient {
    /// Files attached to a task.
    ///
    /// # Errors
    /// Returns auth, transport, HTTP or decode errors.
    pub async fn task_files(&self, task_id: u64) -> Result<Vec<TaskFile>, Error> {
        self.collect(&files_path(task_id)).await
    }

    /// # Errors
    /// Returns auth, transport, HTTP or decode errors.
    pub async fn upload_task_file(
        &self,
        task_id: u64,
        upload: FileUpload,
    ) -> Result<TaskFile, Error> {
        let mut form = Form::new().part(
            "file",
            Part::bytes(upload.bytes).file_name(upload.file_name),
        );
        if let Some(description) = upload.description {
            form = form.text("description", description);
        }
        self.send_form(Method::POST, &upload_path(task_id), form)
            .await
    }

    /// The API only lets the uploader or a manager delete a file.
    ///
    /// # Errors
    /// Returns auth, transport or HTTP errors.
    pub async fn delete_task_file(&self, task_id: u64, file_id: u64) -> Result<(), Error> {
        self.delete(&file_path(task_id, file_id)).await
    }

    /// Downloads a file by its URL, absolute or relative to the API base.
    ///
    /// # Errors
    /// Returns `ValidationError::MissingFileUrl` before any request for a blank URL.
    pub async fn download_file(&self, file_url: Option<&str>) -> Result<Vec<u8>, Error> {
        let url = file_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(ValidationError::MissingFileUrl)?;
        self.get_bytes(url).await
    }
}
