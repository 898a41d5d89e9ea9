use crate::{
    api::{types::Employee, ApiClient},
    config::AppConfig,
    error::{sanitize_body, AuthError, Error},
    http::{self, request_id, REQUEST_ID_HEADER},
    routes::guard::{self, GuardDecision, Redirect},
    session::{
        authorizer::RequestAuthorizer,
        refresh::TokenRefresher,
        store::{StorageKey, TokenStore},
    },
};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, info_span, warn, Instrument};
use url::Url;

pub const TOKEN_PATH: &str = "token/";

/// Lifecycle of the process-wide session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Uninitialized,
    /// Startup fetch in flight.
    Loading,
    Authenticated(Box<Employee>),
    Anonymous,
}

impl SessionState {
    #[must_use]
    pub fn user(&self) -> Option<&Employee> {
        match self {
            Self::Authenticated(user) => Some(user.as_ref()),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenPair {
    access: String,
    refresh: String,
}

/// Owns the session state and the operations that move it between states.
/// Consumers hold a reference (or a [`watch::Receiver`] from
/// [`Session::subscribe`]) rather than reaching for a global.
pub struct Session {
    store: Arc<dyn TokenStore>,
    api: ApiClient,
    http: Client,
    token_endpoint: Url,
    state: watch::Sender<SessionState>,
}

impl Session {
    /// Wires transport, refresher, authorizer and API client for `config`.
    ///
    /// # Errors
    /// Returns `Error::Config` for an invalid base URL or transport setup.
    pub fn connect(config: &AppConfig, store: Arc<dyn TokenStore>) -> Result<Self, Error> {
        let http = http::client(config)?;
        let api_base = config.api_base()?;
        Self::new(http, api_base, store)
    }

    /// # Errors
    /// Returns `Error::Config` if an endpoint cannot be derived from `api_base`.
    pub fn new(http: Client, api_base: Url, store: Arc<dyn TokenStore>) -> Result<Self, Error> {
        let refresher = TokenRefresher::new(http.clone(), &api_base, store.clone())?;
        let authorizer = Arc::new(RequestAuthorizer::new(http.clone(), store.clone(), refresher));
        let token_endpoint = api_base.join(TOKEN_PATH)?;
        let (state, _) = watch::channel(SessionState::Uninitialized);

        Ok(Self {
            store,
            api: ApiClient::new(api_base, authorizer),
            http,
            token_endpoint,
            state,
        })
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn user(&self) -> Option<Employee> {
        self.state.borrow().user().cloned()
    }

    /// True only while the startup fetch is in flight.
    #[must_use]
    pub fn loading(&self) -> bool {
        matches!(*self.state.borrow(), SessionState::Loading)
    }

    /// Receiver notified on every state transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Last user snapshot written by a successful fetch. May be stale.
    #[must_use]
    pub fn cached_user(&self) -> Option<Employee> {
        let raw = self.store.get(StorageKey::UserData)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(err) => {
                debug!("ignoring unreadable user snapshot: {err}");
                None
            }
        }
    }

    /// Guard decision for `location` under the current state.
    #[must_use]
    pub fn navigate(&self, location: &str) -> GuardDecision {
        guard::navigate(&self.state.borrow(), location)
    }

    /// Resolves the initial state. Failures are logged and leave the
    /// session anonymous; they are never returned. Only the first call on an
    /// uninitialized session does anything.
    pub async fn start(&self) {
        let has_token = self.store.get(StorageKey::Access).is_some();
        let started = self.state.send_if_modified(|state| {
            if *state != SessionState::Uninitialized {
                return false;
            }
            *state = if has_token {
                SessionState::Loading
            } else {
                SessionState::Anonymous
            };
            true
        });

        if !started {
            debug!("session already started");
            return;
        }
        if !has_token {
            debug!("no access token stored, starting anonymous");
            return;
        }

        if let Err(err) = self.fetch_user().await {
            warn!("startup user fetch failed: {err}");
        }
    }

    /// Exchanges credentials for a token pair, stores both tokens and loads
    /// the user. A failed user fetch after a successful exchange still
    /// returns `Ok`; the session is then anonymous.
    ///
    /// # Errors
    /// - `AuthError::LoginRejected` on a non-success status; nothing is stored
    ///   and the state is unchanged.
    /// - transport and decode errors, with the same guarantees.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), Error> {
        let request_id = request_id();
        let span = info_span!(
            "session.login",
            http.method = "POST",
            url = %self.token_endpoint,
            request_id = %request_id
        );

        let response = self
            .http
            .post(self.token_endpoint.clone())
            .header(REQUEST_ID_HEADER, request_id.as_str())
            .json(&Credentials {
                username,
                password: password.expose_secret(),
            })
            .send()
            .instrument(span)
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::LoginRejected {
                status: status.as_u16(),
                message: sanitize_body(&body),
            }
            .into());
        }

        let tokens: TokenPair = response
            .json()
            .await
            .map_err(|err| Error::Parse(format!("Failed to decode token response: {err}")))?;

        self.store.set(StorageKey::Access, &tokens.access);
        self.store.set(StorageKey::Refresh, &tokens.refresh);
        info!(username, "logged in");

        if let Err(err) = self.fetch_user().await {
            warn!("user fetch after login failed: {err}");
        }
        Ok(())
    }

    /// Loads `employees/me/` into the session and the snapshot.
    ///
    /// # Errors
    /// Returns the fetch error after moving the session to `Anonymous`.
    pub async fn fetch_user(&self) -> Result<Employee, Error> {
        match self.api.me().await {
            Ok(user) => {
                match serde_json::to_string(&user) {
                    Ok(snapshot) => self.store.set(StorageKey::UserData, &snapshot),
                    Err(err) => warn!("failed to serialize user snapshot: {err}"),
                }
                self.state
                    .send_replace(SessionState::Authenticated(Box::new(user.clone())));
                Ok(user)
            }
            Err(err) => {
                self.state.send_replace(SessionState::Anonymous);
                Err(err)
            }
        }
    }

    /// Clears every piece of client-held state. Always succeeds.
    pub fn logout(&self) -> Redirect {
        for key in StorageKey::ALL {
            self.store.clear(key);
        }
        self.state.send_replace(SessionState::Anonymous);
        info!("logged out");
        Redirect::logout()
    }
}
