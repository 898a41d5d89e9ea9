use crate::{
    api::{
        types::{Employee, ProfileUpdate, TeamMember},
        ApiClient,
    },
    error::{Error, ValidationError},
};
use reqwest::{
    multipart::{Form, Part},
    Method,
};

pub const ME_PATH: &str = "employees/me/";
pub const DEPARTMENT_EMPLOYEES_PATH: &str = "department-employees/";

impl ApiClient {
    /// Fetches the record of the logged-in employee.
    ///
    /// # Errors
    /// Returns auth, transport, HTTP or decode errors.
    pub async fn me(&self) -> Result<Employee, Error> {
        self.get_json(ME_PATH).await
    }

    /// Updates the e-mail and/or profile picture of the logged-in employee.
    ///
    /// # Errors
    /// Returns `ValidationError::EmptyUpdate` before any request when nothing is set.
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<Employee, Error> {
        let email = update
            .user_email
            .map(|email| email.trim().to_string())
            .filter(|email| !email.is_empty());

        if email.is_none() && update.profile_picture.is_none() {
            return Err(ValidationError::EmptyUpdate.into());
        }

        let mut form = Form::new();
        if let Some(picture) = update.profile_picture {
            form = form.part(
                "profile_picture",
                Part::bytes(picture.bytes).file_name(picture.file_name),
            );
        }
        if let Some(email) = email {
            form = form.text("user_email", email);
        }

        self.send_form(Method::PATCH, ME_PATH, form).await
    }

    /// Employees in the manager's departments; empty for non-managers.
    ///
    /// # Errors
    /// Returns auth, transport, HTTP or decode errors.
    pub async fn department_employees(&self) -> Result<Vec<TeamMember>, Error> {
        self.collect(DEPARTMENT_EMPLOYEES_PATH).await
    }
}
