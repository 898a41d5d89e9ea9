//! Request and response payloads for the task API. `Employee` is the user
//! record the session holds; it carries no secrets and may be cached.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

use crate::error::{Error, ValidationError};

/// `employees/me/` payload.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Employee {
    pub id: u64,
    pub employee_code: Option<String>,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub user_email: Option<String>,
    pub job_role: Option<String>,
    pub employee_type: Option<String>,
    pub hire_date: Option<String>,
    pub salary: Option<serde_json::Value>,
    pub department: Vec<String>,
    pub profile_picture: Option<String>,
    pub role: Option<String>,
}

impl Employee {
    /// Lower-cased employee type, the value route access is decided on.
    #[must_use]
    pub fn role_name(&self) -> Option<String> {
        self.employee_type
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_lowercase)
    }

    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

/// Entry of `department-employees/`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TeamMember {
    pub id: u64,
    pub employee_code: Option<String>,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TaskFile {
    pub id: u64,
    pub file: Option<String>,
    pub description: Option<String>,
    pub uploaded_at: Option<String>,
    pub uploaded_by_name: Option<String>,
}

impl TaskFile {
    /// Last path segment of the file URL, else the description, else `file`.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.file
            .as_deref()
            .and_then(|url| url.rsplit('/').next())
            .filter(|name| !name.is_empty())
            .or_else(|| self.description.as_deref().filter(|d| !d.is_empty()))
            .unwrap_or("file")
            .to_string()
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub description: Option<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub files: Vec<TaskFile>,
    pub assigned_to: Option<u64>,
    pub assigned_to_name: Option<String>,
    pub assigned_by: Option<u64>,
    pub assigned_by_name: Option<String>,
    pub due_date: Option<String>,
    pub completed: bool,
    pub created_at: Option<String>,
}

/// List endpoints answer either with a bare array or with a page.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Listing<T> {
    Items(Vec<T>),
    Page(Page<T>),
}

#[derive(Debug, Deserialize)]
pub(crate) struct Page<T> {
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

/// Accepts `null`, a single object, or an array.
fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(
        match Option::<OneOrMany<T>>::deserialize(deserializer)? {
            None => Vec::new(),
            Some(OneOrMany::Many(items)) => items,
            Some(OneOrMany::One(item)) => vec![item],
        },
    )
}

/// Partial task update; unset fields are left out of the PATCH body.
#[derive(Clone, Debug, Default, Serialize)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

/// Task assignment form. Title and due date are required.
#[derive(Clone, Debug, Default)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub assigned_to: u64,
}

#[derive(Serialize)]
pub(crate) struct NewTaskBody<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub due_date: &'a str,
    pub assigned_to: u64,
}

impl NewTask {
    /// # Errors
    /// Returns `ValidationError::MissingField` for a blank title or due date.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingField("title"));
        }
        if self.due_date.trim().is_empty() {
            return Err(ValidationError::MissingField("due date"));
        }
        Ok(())
    }

    pub(crate) fn body(&self) -> NewTaskBody<'_> {
        NewTaskBody {
            title: self.title.trim(),
            description: self.description.trim(),
            due_date: self.due_date.trim(),
            assigned_to: self.assigned_to,
        }
    }
}

/// File content for multipart uploads.
#[derive(Clone, Debug)]
pub struct FileUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub description: Option<String>,
}

impl FileUpload {
    /// Reads `path` into memory.
    ///
    /// # Errors
    /// Returns `Error::Config` if the file cannot be read.
    pub async fn from_path(path: &Path, description: Option<String>) -> Result<Self, Error> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|err| Error::Config(format!("Failed to read {}: {err}", path.display())))?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("file")
            .to_string();
        Ok(Self {
            file_name,
            bytes,
            description: description.filter(|d| !d.trim().is_empty()),
        })
    }
}

/// Profile changes; at least one field must be set.
#[derive(Clone, Debug, Default)]
pub struct ProfileUpdate {
    pub user_email: Option<String>,
    pub profile_picture: Option<FileUpload>,
}
