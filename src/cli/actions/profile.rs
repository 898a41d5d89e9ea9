use crate::{
    api::types::{FileUpload, ProfileUpdate},
    cli::actions::{print_json, require},
    routes::Route,
    session::context::Session,
};
use anyhow::Result;
use std::path::PathBuf;

#[derive(Debug, PartialEq, Eq)]
pub struct UpdateArgs {
    pub email: Option<String>,
    pub picture: Option<PathBuf>,
}

/// # Errors
/// Returns an error if nothing is set to change or the API call fails.
pub async fn execute(session: &Session, args: UpdateArgs) -> Result<()> {
    require(session, &[Route::Profile])?;

    let profile_picture = match args.picture {
        Some(path) => Some(FileUpload::from_path(&path, None).await?),
        None => None,
    };
    let updated = session
        .api()
        .update_profile(ProfileUpdate {
            user_email: args.email,
            profile_picture,
        })
        .await?;

    // Keep the session and the snapshot in step with the server.
    session.fetch_user().await?;
    print_json(&updated)
}
