//! Navigation guard. A pure function of the session state and the screen's
//! allow-list; nothing is cached between navigations. This is a UX gate only,
//! the API enforces access on its own.

use crate::{
    routes::{AllowList, Role, Route},
    session::context::SessionState,
};
use tracing::{debug, warn};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still resolving; show nothing and do not redirect.
    Pending,
    Render,
    Redirect(Redirect),
    NotFound,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Redirect {
    pub to: Route,
    /// Location the user asked for, kept for a post-login return.
    pub from: Option<String>,
    /// Replace the current history entry instead of pushing.
    pub replace: bool,
    /// Drop all in-memory state, as a full page reload would.
    pub reload: bool,
    pub reason: RedirectReason,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RedirectReason {
    Unauthenticated,
    MissingRole,
    UnrecognizedRole(String),
    RoleNotAllowed(Role),
    Root,
    Logout,
}

impl Redirect {
    fn to_login(reason: RedirectReason) -> Self {
        Self {
            to: Route::Login,
            from: None,
            replace: true,
            reload: false,
            reason,
        }
    }

    /// Hard redirect issued by logout.
    #[must_use]
    pub fn logout() -> Self {
        Self {
            reload: true,
            ..Self::to_login(RedirectReason::Logout)
        }
    }
}

/// Decides whether `requested` may render for the current session.
#[must_use]
pub fn check(state: &SessionState, allow: &AllowList, requested: &str) -> GuardDecision {
    let user = match state {
        SessionState::Uninitialized | SessionState::Loading => return GuardDecision::Pending,
        SessionState::Anonymous => {
            return GuardDecision::Redirect(Redirect {
                from: Some(requested.to_string()),
                ..Redirect::to_login(RedirectReason::Unauthenticated)
            });
        }
        SessionState::Authenticated(user) => user,
    };

    let Some(role_name) = user.role_name() else {
        warn!(username = %user.username, "employee type missing, redirecting to login");
        return GuardDecision::Redirect(Redirect::to_login(RedirectReason::MissingRole));
    };

    let role = match role_name.parse::<Role>() {
        Ok(role) => role,
        Err(err) => {
            warn!(username = %user.username, "{err}");
            return GuardDecision::Redirect(Redirect::to_login(
                RedirectReason::UnrecognizedRole(role_name),
            ));
        }
    };

    if allow.contains(role) {
        GuardDecision::Render
    } else {
        warn!(%role, location = requested, "access denied for role");
        GuardDecision::Redirect(Redirect::to_login(RedirectReason::RoleNotAllowed(role)))
    }
}

/// Resolves a location to a screen and applies [`check`] to it.
#[must_use]
pub fn navigate(state: &SessionState, location: &str) -> GuardDecision {
    let Some(route) = Route::from_path(location) else {
        debug!(location, "no screen for location");
        return GuardDecision::NotFound;
    };

    match route {
        Route::Root => GuardDecision::Redirect(Redirect::to_login(RedirectReason::Root)),
        Route::Login => GuardDecision::Render,
        _ => match route.allow_list() {
            Some(allow) => check(state, &allow, location),
            None => GuardDecision::Render,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::Employee;

    fn signed_in(employee_type: Option<&str>) -> SessionState {
        SessionState::Authenticated(Box::new(Employee {
            id: 1,
            username: "nadia".to_string(),
            employee_type: employee_type.map(str::to_string),
            ..Employee::default()
        }))
    }

    fn managers() -> AllowList {
        AllowList::new([Role::Manager, Role::Officer])
    }

    #[test]
    fn loading_states_are_pending() {
        for state in [SessionState::Uninitialized, SessionState::Loading] {
            assert_eq!(check(&state, &managers(), "/manager-dashboard"), GuardDecision::Pending);
        }
    }

    #[test]
    fn anonymous_redirects_with_origin() {
        let decision = check(&SessionState::Anonymous, &managers(), "/manager-dashboard");
        assert_eq!(
            decision,
            GuardDecision::Redirect(Redirect {
                to: Route::Login,
                from: Some("/manager-dashboard".to_string()),
                replace: true,
                reload: false,
                reason: RedirectReason::Unauthenticated,
            })
        );
    }

    #[test]
    fn role_decisions() {
        let cases = [
            (Some("Manager"), GuardDecision::Render),
            (Some("officer"), GuardDecision::Render),
            (
                Some("blue collar"),
                GuardDecision::Redirect(Redirect::to_login(RedirectReason::RoleNotAllowed(
                    Role::BlueCollar,
                ))),
            ),
            (
                None,
                GuardDecision::Redirect(Redirect::to_login(RedirectReason::MissingRole)),
            ),
            (
                Some("Contractor"),
                GuardDecision::Redirect(Redirect::to_login(RedirectReason::UnrecognizedRole(
                    "contractor".to_string(),
                ))),
            ),
        ];

        for (employee_type, expected) in cases {
            let decision = check(&signed_in(employee_type), &managers(), "/manager-dashboard");
            assert_eq!(decision, expected, "employee_type {employee_type:?}");
        }
    }

    #[test]
    fn navigate_uses_screen_allow_lists() {
        let worker = signed_in(Some("White Collar"));
        assert_eq!(navigate(&worker, "/dashboard"), GuardDecision::Render);
        assert_eq!(navigate(&worker, "/profile"), GuardDecision::Render);
        assert!(matches!(
            navigate(&worker, "/manager-dashboard"),
            GuardDecision::Redirect(Redirect { to: Route::Login, .. })
        ));
    }

    #[test]
    fn navigate_handles_public_and_unknown_locations() {
        assert_eq!(navigate(&SessionState::Anonymous, "/login"), GuardDecision::Render);
        assert_eq!(navigate(&SessionState::Anonymous, "/reports"), GuardDecision::NotFound);
        assert_eq!(
            navigate(&SessionState::Anonymous, "/"),
            GuardDecision::Redirect(Redirect::to_login(RedirectReason::Root))
        );
    }

    #[test]
    fn logout_redirect_reloads() {
        let redirect = Redirect::logout();
        assert_eq!(redirect.to, Route::Login);
        assert!(redirect.reload);
        assert_eq!(redirect.reason, RedirectReason::Logout);
    }
}
