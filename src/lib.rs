//! # Rakmedia (employee task management client)
//!
//! `rakmedia` is the client side of a role-gated task manager: employees log
//! in, work through the tasks assigned to them and attach files; managers see
//! the employees of their departments and assign them work. All persistence
//! and business rules live behind the REST API; this crate keeps the session
//! in sync with it.
//!
//! ## Session
//!
//! Login exchanges a username and password for an access/refresh token pair.
//! Both tokens and a snapshot of the employee record are kept in a
//! [`TokenStore`](session::store::TokenStore) scoped to the API origin. Every
//! request goes through the
//! [`RequestAuthorizer`](session::authorizer::RequestAuthorizer), which
//! refreshes an expired access token before the request is sent.
//!
//! ## Screens and roles
//!
//! Each screen carries an allow-list of employee types (`white collar`,
//! `blue collar`, `manager`, `officer`). The [route guard](routes::guard)
//! decides from the session state alone whether a screen renders or the user
//! is sent back to `/login`.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod routes;
pub mod session;

pub use self::error::Error;

pub const GIT_COMMIT_HASH: &str = env!("RAKMEDIA_GIT_SHA");

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
pub(crate) mod test_support {
    use crate::session::token::encode_unsigned;
    use serde_json::{json, Value};
    use std::net::TcpListener;

    pub(crate) fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    /// Access token expiring in 2096.
    pub(crate) fn fresh_token() -> String {
        encode_unsigned(&json!({"token_type": "access", "exp": 4_000_000_000_u64, "user_id": 1}))
    }

    pub(crate) fn expired_token() -> String {
        encode_unsigned(&json!({"token_type": "access", "exp": 1_000_000_000_u64, "user_id": 1}))
    }

    pub(crate) fn employee_json(employee_type: &str) -> Value {
        json!({
            "id": 1,
            "employee_code": "EMP-001",
            "username": "nadia",
            "first_name": "Nadia",
            "last_name": "Karim",
            "user_email": "nadia@rakmedia.test",
            "job_role": "Team Lead",
            "employee_type": employee_type,
            "hire_date": "2021-03-01",
            "salary": "4200.00",
            "department": ["Engineering"],
            "profile_picture": null,
            "role": employee_type.to_lowercase()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
