use crate::{
    error::Error,
    http::{request_id, REQUEST_ID_HEADER},
    session::{
        refresh::TokenRefresher,
        store::{StorageKey, TokenStore},
        token,
    },
};
use reqwest::{Client, Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::{debug, info_span, Instrument};
use url::Url;

/// Decorator around the HTTP client that attaches the bearer token to every
/// request, refreshing it first when the stored one has expired.
///
/// There is no coordination between concurrent requests: two requests that
/// both see an expired token will both refresh, and the last write to the
/// store wins.
pub struct RequestAuthorizer {
    http: Client,
    store: Arc<dyn TokenStore>,
    refresher: TokenRefresher,
}

impl RequestAuthorizer {
    #[must_use]
    pub fn new(http: Client, store: Arc<dyn TokenStore>, refresher: TokenRefresher) -> Self {
        Self {
            http,
            store,
            refresher,
        }
    }

    /// Starts a request against `url`; send it through [`Self::send`].
    #[must_use]
    pub fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http.request(method, url)
    }

    /// Current access token, refreshed first if it has expired.
    ///
    /// # Errors
    /// Propagates refresher failures unchanged.
    pub async fn access_token(&self) -> Result<Option<SecretString>, Error> {
        let Some(access) = self.store.get(StorageKey::Access) else {
            return Ok(None);
        };

        if token::is_expired(&access) {
            debug!("access token expired, refreshing before request");
            return self.refresher.refresh().await.map(Some);
        }

        Ok(Some(SecretString::from(access)))
    }

    /// Attaches the bearer credential when one is available.
    ///
    /// # Errors
    /// Propagates refresher failures; the request is then never sent.
    pub async fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder, Error> {
        Ok(match self.access_token().await? {
            Some(access) => request.bearer_auth(access.expose_secret()),
            None => request,
        })
    }

    /// Authorizes and sends `request`. The refresh, when triggered, always
    /// completes before the request leaves.
    ///
    /// # Errors
    /// Returns refresher failures or transport errors. Non-success statuses
    /// are returned as responses.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response, Error> {
        let request_id = request_id();
        let request = self
            .authorize(request)
            .await?
            .header(REQUEST_ID_HEADER, request_id.as_str());

        let built = request
            .build()
            .map_err(|err| Error::Config(format!("Failed to build request: {err}")))?;

        let span = info_span!(
            "api.request",
            http.method = %built.method(),
            url = %built.url(),
            request_id = %request_id
        );

        let response = self.http.execute(built).instrument(span).await?;
        debug!(status = response.status().as_u16(), "response received");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthError;
    use crate::session::store::MemoryTokenStore;
    use crate::test_support::{can_bind_localhost, expired_token, fresh_token};
    use anyhow::{anyhow, Result};
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn authorizer(
        server: &MockServer,
        store: Arc<MemoryTokenStore>,
    ) -> Result<(RequestAuthorizer, Url)> {
        let base = Url::parse(&format!("{}/api/", server.uri()))?;
        let http = Client::new();
        let refresher = TokenRefresher::new(http.clone(), &base, store.clone())?;
        Ok((RequestAuthorizer::new(http, store, refresher), base))
    }

    #[tokio::test]
    async fn expired_token_is_refreshed_before_request() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let renewed = fresh_token();

        Mock::given(method("POST"))
            .and(path("/api/token/refresh/"))
            .and(body_json(json!({"refresh": "refresh-1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": renewed})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/tasks/"))
            .and(header("Authorization", format!("Bearer {renewed}").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryTokenStore::new());
        store.set(StorageKey::Access, &expired_token());
        store.set(StorageKey::Refresh, "refresh-1");

        let (authorizer, base) = authorizer(&server, store.clone())?;
        let response = authorizer
            .send(authorizer.request(Method::GET, base.join("tasks/")?))
            .await?;

        assert!(response.status().is_success());
        assert_eq!(store.get(StorageKey::Access), Some(renewed));
        assert_eq!(store.get(StorageKey::Refresh), Some("refresh-1".to_string()));
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_expired_requests_each_refresh() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let renewed = fresh_token();

        Mock::given(method("POST"))
            .and(path("/api/token/refresh/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"access": renewed}))
                    .set_delay(Duration::from_millis(200)),
            )
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/tasks/"))
            .and(header("Authorization", format!("Bearer {renewed}").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(2)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryTokenStore::new());
        store.set(StorageKey::Access, &expired_token());
        store.set(StorageKey::Refresh, "refresh-1");

        let (authorizer, base) = authorizer(&server, store.clone())?;
        let url = base.join("tasks/")?;
        let (first, second) = tokio::join!(
            authorizer.send(authorizer.request(Method::GET, url.clone())),
            authorizer.send(authorizer.request(Method::GET, url)),
        );

        assert!(first?.status().is_success());
        assert!(second?.status().is_success());
        assert_eq!(store.get(StorageKey::Access), Some(renewed));
        Ok(())
    }

    #[tokio::test]
    async fn valid_token_is_attached_without_refresh() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let access = fresh_token();

        Mock::given(method("POST"))
            .and(path("/api/token/refresh/"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/employees/me/"))
            .and(header("Authorization", format!("Bearer {access}").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryTokenStore::new());
        store.set(StorageKey::Access, &access);

        let (authorizer, base) = authorizer(&server, store)?;
        authorizer
            .send(authorizer.request(Method::GET, base.join("employees/me/")?))
            .await?;
        Ok(())
    }

    #[tokio::test]
    async fn missing_token_sends_request_unauthenticated() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tasks/"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryTokenStore::new());
        let (authorizer, base) = authorizer(&server, store)?;
        let response = authorizer
            .send(authorizer.request(Method::GET, base.join("tasks/")?))
            .await?;
        assert_eq!(response.status().as_u16(), 401);

        let received = server
            .received_requests()
            .await
            .ok_or_else(|| anyhow!("request recording disabled"))?;
        assert_eq!(received.len(), 1);
        assert!(!received[0].headers.contains_key("authorization"));
        assert!(received[0].headers.contains_key("x-request-id"));
        Ok(())
    }

    #[tokio::test]
    async fn expired_token_without_refresh_token_never_sends() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tasks/"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryTokenStore::new());
        store.set(StorageKey::Access, &expired_token());

        let (authorizer, base) = authorizer(&server, store)?;
        let err = authorizer
            .send(authorizer.request(Method::GET, base.join("tasks/")?))
            .await
            .err()
            .ok_or_else(|| anyhow!("expected error"))?;

        assert!(matches!(err, Error::Auth(AuthError::NoRefreshToken)));
        Ok(())
    }

    #[tokio::test]
    async fn rejected_refresh_fails_the_request() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/token/refresh/"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/tasks/"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let store = Arc::new(MemoryTokenStore::new());
        store.set(StorageKey::Access, &expired_token());
        store.set(StorageKey::Refresh, "stale-refresh");

        let (authorizer, base) = authorizer(&server, store)?;
        let result = authorizer
            .send(authorizer.request(Method::GET, base.join("tasks/")?))
            .await;

        assert!(matches!(
            result,
            Err(Error::Auth(AuthError::RefreshRejected { status: 401 }))
        ));
        Ok(())
    }
}
