use crate::cli::{
    actions::{files, profile, session, tasks, team, Action},
    globals::GlobalArgs,
};
use crate::{error::Error, session::context::Session};
use anyhow::{Context, Result};

/// Execute the provided action.
// Single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action, globals: &GlobalArgs) -> Result<()> {
    let session = Session::connect(&globals.config, globals.store()?)
        .context("failed to initialize session")?;

    // Logout works offline; everything else resolves the stored session first.
    if !matches!(action, Action::Logout) {
        session.start().await;
    }

    let login = matches!(action, Action::Login(_));
    let result = match action {
        Action::Login(args) => session::login(&session, args).await,
        Action::Logout => {
            session::logout(&session);
            Ok(())
        }
        Action::WhoAmI => session::whoami(&session),
        Action::Open { location } => {
            session::open(&session, &location);
            Ok(())
        }
        Action::Tasks(action) => tasks::execute(&session, action).await,
        Action::Files(action) => files::execute(&session, action).await,
        Action::Team(action) => team::execute(&session, action).await,
        Action::Profile(args) => profile::execute(&session, args).await,
    };

    if login {
        result
    } else {
        result.map_err(with_login_hint)
    }
}

/// Points the user at `login` when the API rejected the stored credentials.
fn with_login_hint(err: anyhow::Error) -> anyhow::Error {
    match err.downcast_ref::<Error>() {
        Some(inner) if inner.is_auth() => {
            err.context("session is no longer valid, run `rakmedia login <username>`")
        }
        _ => err,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthError;

    #[test]
    fn test_auth_errors_get_login_hint() {
        let err = with_login_hint(Error::from(AuthError::NoRefreshToken).into());
        assert!(err.to_string().contains("rakmedia login"));
        assert!(err.downcast_ref::<Error>().is_some_and(Error::is_auth));
    }

    #[test]
    fn test_other_errors_pass_through() {
        let err = with_login_hint(Error::Network("unreachable".to_string()).into());
        assert_eq!(err.to_string(), "Network error: unreachable");
    }
}
