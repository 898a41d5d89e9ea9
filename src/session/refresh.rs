use crate::{
    error::{AuthError, Error},
    http::{request_id, REQUEST_ID_HEADER},
    session::store::{StorageKey, TokenStore},
};
use reqwest::Client;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info_span, Instrument};
use url::Url;

pub const REFRESH_PATH: &str = "token/refresh/";

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

#[derive(Deserialize)]
struct RefreshResponse {
    access: String,
}

/// Exchanges the stored refresh token for a new access token.
///
/// Talks to the transport directly: going through the authorizer would
/// re-enter the refresh path on an expired token.
pub struct TokenRefresher {
    http: Client,
    endpoint: Url,
    store: Arc<dyn TokenStore>,
}

impl TokenRefresher {
    /// # Errors
    /// Returns `Error::Config` if the refresh endpoint cannot be derived from `api_base`.
    pub fn new(http: Client, api_base: &Url, store: Arc<dyn TokenStore>) -> Result<Self, Error> {
        Ok(Self {
            http,
            endpoint: api_base.join(REFRESH_PATH)?,
            store,
        })
    }

    /// Requests a new access token and stores it, replacing the previous one.
    /// The stored refresh token is left untouched even if the server rotates it.
    ///
    /// # Errors
    /// - `AuthError::NoRefreshToken` if nothing is stored; no request is made.
    /// - `AuthError::RefreshRejected` on a non-success status.
    /// - transport and decode errors otherwise.
    pub async fn refresh(&self) -> Result<SecretString, Error> {
        let refresh = self
            .store
            .get(StorageKey::Refresh)
            .ok_or(AuthError::NoRefreshToken)?;

        let request_id = request_id();
        let span = info_span!(
            "session.refresh",
            http.method = "POST",
            url = %self.endpoint,
            request_id = %request_id
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .header(REQUEST_ID_HEADER, request_id.as_str())
            .json(&RefreshRequest { refresh: &refresh })
            .send()
            .instrument(span)
            .await?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "refresh rejected");
            return Err(AuthError::RefreshRejected {
                status: status.as_u16(),
            }
            .into());
        }

        let body: RefreshResponse = response
            .json()
            .await
            .map_err(|err| Error::Parse(format!("Failed to decode refresh response: {err}")))?;

        self.store.set(StorageKey::Access, &body.access);
        debug!("access token refreshed");

        Ok(SecretString::from(body.access))
    }
}
