//! Error taxonomy for the client. Auth failures, transport failures and local
//! validation failures are kept apart so callers can decide which ones reach
//! the user and which ones downgrade the session silently.

use thiserror::Error;

/// Maximum number of error body characters surfaced to the user.
const MAX_ERROR_CHARS: usize = 200;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("login rejected ({status}): {message}")]
    LoginRejected { status: u16, message: String },
    #[error("no refresh token stored")]
    NoRefreshToken,
    #[error("token refresh rejected ({status})")]
    RefreshRejected { status: u16 },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("file URL is missing")]
    MissingFileUrl,
    #[error("nothing to update")]
    EmptyUpdate,
}

#[derive(Clone, Debug, Error)]
pub enum Error {
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("Request failed ({status}): {message}")]
    Http { status: u16, message: String },
    #[error("Response error: {0}")]
    Parse(String),
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Builds an `Http` error from a status and a raw response body.
    pub(crate) fn http(status: u16, body: &str) -> Self {
        Self::Http {
            status,
            message: sanitize_body(body),
        }
    }

    /// True for failures caused by credentials rather than the transport.
    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout("Request timed out. Please try again.".to_string())
        } else if err.is_decode() {
            Self::Parse(format!("Failed to decode response: {err}"))
        } else {
            Self::Network(format!("Unable to reach the server: {err}"))
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::Config(format!("Invalid URL: {err}"))
    }
}

/// Trims and truncates HTTP error bodies for user-facing messages.
pub(crate) fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}
