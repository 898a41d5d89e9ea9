pub mod files;
pub mod profile;
pub mod session;
pub mod tasks;
pub mod team;

mod run;

use crate::{
    cli::globals::GlobalArgs,
    routes::{
        guard::{GuardDecision, RedirectReason},
        Route,
    },
    session::context::Session,
};
use anyhow::{anyhow, Result};
use serde::Serialize;

#[derive(Debug)]
pub enum Action {
    Login(session::LoginArgs),
    Logout,
    WhoAmI,
    Open { location: String },
    Tasks(tasks::TaskAction),
    Files(files::FileAction),
    Team(team::TeamAction),
    Profile(profile::UpdateArgs),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self, globals: &GlobalArgs) -> Result<()> {
        run::execute(self, globals).await
    }
}

/// Passes when any of `screens` would render for the current session.
fn require(session: &Session, screens: &[Route]) -> Result<()> {
    let mut denied = None;
    for screen in screens {
        match session.navigate(screen.path()) {
            GuardDecision::Render => return Ok(()),
            decision => {
                denied.get_or_insert((*screen, decision));
            }
        }
    }

    match denied {
        Some((screen, decision)) => Err(anyhow!("{}", describe(screen, &decision))),
        None => Ok(()),
    }
}

/// One-line explanation of a guard decision for `screen`.
pub(crate) fn describe(screen: Route, decision: &GuardDecision) -> String {
    match decision {
        GuardDecision::Render => format!("{screen} is available"),
        GuardDecision::Pending => "session is still loading".to_string(),
        GuardDecision::NotFound => "no such screen".to_string(),
        GuardDecision::Redirect(redirect) => {
            let why = match &redirect.reason {
                RedirectReason::Unauthenticated => {
                    "not logged in, run `rakmedia login <username>`".to_string()
                }
                RedirectReason::MissingRole => "your account has no employee type".to_string(),
                RedirectReason::UnrecognizedRole(role) => {
                    format!("unrecognized employee type \"{role}\"")
                }
                RedirectReason::RoleNotAllowed(role) => {
                    let allowed = screen
                        .allow_list()
                        .map(|list| {
                            list.roles()
                                .iter()
                                .map(|role| role.as_str())
                                .collect::<Vec<_>>()
                                .join(", ")
                        })
                        .unwrap_or_default();
                    format!("{screen} is not available to {role} employees (allowed: {allowed})")
                }
                RedirectReason::Root => "start page".to_string(),
                RedirectReason::Logout => "logged out".to_string(),
            };
            format!("redirected to {}: {why}", redirect.to)
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
