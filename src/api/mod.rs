//! Typed client for the task API. Every call goes through the
//! [`RequestAuthorizer`], so feature modules never handle tokens; they only
//! build paths and payloads.

pub mod employees;
pub mod files;
pub mod manager;
pub mod tasks;
pub mod types;

use crate::{
    error::Error,
    session::authorizer::RequestAuthorizer,
};
use reqwest::{multipart::Form, Method, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::{collections::HashSet, sync::Arc};
use tracing::debug;
use url::Url;

use self::types::Listing;

#[derive(Clone)]
pub struct ApiClient {
    base: Url,
    authorizer: Arc<RequestAuthorizer>,
}

impl ApiClient {
    /// `base` must end with `/`; see `AppConfig::api_base`.
    #[must_use]
    pub fn new(base: Url, authorizer: Arc<RequestAuthorizer>) -> Self {
        Self { base, authorizer }
    }

    /// Resolves `path` under the base URL. Absolute URLs pass through.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base.join(path.trim().trim_start_matches('/'))?)
    }

    async fn send(&self, method: Method, url: Url) -> Result<Response, Error> {
        self.authorizer
            .send(self.authorizer.request(method, url))
            .await
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        handle_json_response(self.send(Method::GET, url).await?).await
    }

    pub(crate) async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        let request = self.authorizer.request(method, url).json(body);
        handle_json_response(self.authorizer.send(request).await?).await
    }

    pub(crate) async fn send_form<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        form: Form,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        let request = self.authorizer.request(method, url).multipart(form);
        handle_json_response(self.authorizer.send(request).await?).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        handle_empty_response(self.send(Method::DELETE, url).await?).await
    }

    pub(crate) async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, Error> {
        let url = self.url(path)?;
        let response = self.send(Method::GET, url).await?;
        let status = response.status();
        if status.is_success() {
            Ok(response.bytes().await?.to_vec())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(Error::http(status.as_u16(), &body))
        }
    }

    /// Collects a list endpoint, following `next` links until exhausted.
    ///
    /// # Errors
    /// Returns `Error::Parse` when a `next` link points at a page already
    /// fetched.
    pub(crate) async fn collect<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, Error> {
        let mut items = Vec::new();
        let mut visited = HashSet::new();
        let mut next = Some(path.to_string());

        while let Some(current) = next.take() {
            let url = self.url(&current)?;
            if !visited.insert(url.clone()) {
                return Err(Error::Parse(format!("Pagination loops back to {url}")));
            }
            let response = self.send(Method::GET, url).await?;
            match handle_json_response::<Listing<T>>(response).await? {
                Listing::Items(mut page) => {
                    items.append(&mut page);
                }
                Listing::Page(mut page) => {
                    items.append(&mut page.results);
                    next = page.next.filter(|link| !link.trim().is_empty());
                    if let Some(link) = &next {
                        debug!(next = %link, "following next page");
                    }
                }
            }
        }

        Ok(items)
    }
}

/// Parses JSON responses and surfaces HTTP errors with sanitized bodies.
async fn handle_json_response<T: DeserializeOwned>(response: Response) -> Result<T, Error> {
    let status = response.status();
    if status.is_success() {
        response
            .json::<T>()
            .await
            .map_err(|err| Error::Parse(format!("Failed to decode response: {err}")))
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(Error::http(status.as_u16(), &body))
    }
}

/// Handles empty responses and returns sanitized HTTP errors when needed.
async fn handle_empty_response(response: Response) -> Result<(), Error> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(Error::http(status.as_u16(), &body))
    }
}
