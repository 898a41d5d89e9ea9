//! Transport construction shared by the refresher, the login call and the
//! authorized API client.

use crate::{config::AppConfig, error::Error, APP_USER_AGENT};
use reqwest::Client;
use ulid::Ulid;

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Builds the HTTP client. Without a configured timeout the transport default
/// applies.
///
/// # Errors
/// Returns `Error::Config` if the TLS backend cannot be initialized.
pub fn client(config: &AppConfig) -> Result<Client, Error> {
    let mut builder = Client::builder().user_agent(APP_USER_AGENT);
    if let Some(timeout) = config.request_timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|err| Error::Config(format!("Failed to build HTTP client: {err}")))
}

/// Correlation id for one outbound request.
#[must_use]
pub fn request_id() -> String {
    Ulid::new().to_string()
}
