//! HTTP client for the DigitalOcean v2 API.
//!
//! Responses wrap their payload in a named key (`{"droplet": {...}}`,
//! `{"images": [...], "links": {...}}`). The helpers here take the key to
//! extract, so endpoint methods stay one-liners.

mod actions;
mod catalog;
mod droplets;
mod images;
mod keys;

use std::collections::HashSet;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::config::Config;
use crate::error::ApiError;

/// Client for the DigitalOcean API.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct DigitalOceanClient {
    http: reqwest::Client,
    base_url: String,
    page_size: u32,
}

impl DigitalOceanClient {
    /// Create a client from provider configuration.
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|_| ApiError::InvalidToken("token contains invalid characters".into()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("nimbus/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            page_size: config.page_size.max(1),
        })
    }

    /// Build a URL for an endpoint.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Build a URL for one member of a collection, percent-encoding
    /// `segment` so it can only ever name a single path segment.
    fn member_url(&self, collection: &str, segment: &str) -> Result<Url, ApiError> {
        let mut url =
            Url::parse(&self.url(collection)).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }

    /// GET a resource and extract `key` from the body.
    async fn get<T: DeserializeOwned>(&self, path: &str, key: &'static str) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(method = "GET", url = %url, "API request");
        let response = self.http.get(&url).send().await?;
        let body = self.handle_response(response).await?;
        extract(body, key)
    }

    /// Like [`get`](Self::get), but a 404 is `None`.
    async fn get_optional<T: DeserializeOwned>(
        &self,
        path: &str,
        key: &'static str,
    ) -> Result<Option<T>, ApiError> {
        self.get_optional_at(self.url(path), key).await
    }

    async fn get_optional_at<T: DeserializeOwned>(
        &self,
        url: String,
        key: &'static str,
    ) -> Result<Option<T>, ApiError> {
        debug!(method = "GET", url = %url, "API request");
        let response = self.http.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            trace!(url = %url, "Resource not found");
            return Ok(None);
        }

        let body = self.handle_response(response).await?;
        extract(body, key).map(Some)
    }

    /// POST a body and decode the whole response.
    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(method = "POST", url = %url, "API request");
        let response = self.http.post(&url).json(body).send().await?;
        let body = self.handle_response(response).await?;
        serde_json::from_value(body).map_err(|source| ApiError::Decode {
            field: "body",
            source,
        })
    }

    /// POST a body and extract `key` from the response.
    async fn post_for<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        key: &'static str,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(method = "POST", url = %url, "API request");
        let response = self.http.post(&url).json(body).send().await?;
        let body = self.handle_response(response).await?;
        extract(body, key)
    }

    /// DELETE a resource. The API answers 204 with an empty body.
    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let url = self.url(path);
        debug!(method = "DELETE", url = %url, "API request");
        let response = self.http.delete(&url).send().await?;

        if response.status().is_success() {
            Ok(())
        } else {
            self.handle_error(response).await
        }
    }

    /// GET every page of a collection, following `links.pages.next`.
    ///
    /// Stops at the first `next` link that points at a page already fetched.
    async fn list<T: DeserializeOwned>(
        &self,
        path: &str,
        key: &'static str,
    ) -> Result<Vec<T>, ApiError> {
        let mut items = Vec::new();
        let mut fetched: HashSet<Url> = HashSet::new();
        let mut request = self
            .http
            .get(self.url(path))
            .query(&[("per_page", self.page_size)]);

        loop {
            let response = request.send().await?;
            debug!(url = %response.url(), "API list page");
            fetched.insert(response.url().clone());
            let mut body = self.handle_response(response).await?;

            let next = body
                .get_mut("links")
                .map(Value::take)
                .map(serde_json::from_value::<Links>)
                .transpose()
                .map_err(|source| ApiError::Decode {
                    field: "links",
                    source,
                })?
                .and_then(|links| links.pages)
                .and_then(|pages| pages.next);

            let page: Vec<T> = extract(body, key)?;
            items.extend(page);

            let Some(next) = next else { break };
            let next = Url::parse(&next).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
            if fetched.contains(&next) {
                warn!(key, url = %next, "Pagination link repeats a fetched page, stopping");
                break;
            }
            request = self.http.get(next);
        }

        trace!(key, count = items.len(), "Listed collection");
        Ok(items)
    }

    /// Handle a successful or error response.
    async fn handle_response(&self, response: Response) -> Result<Value, ApiError> {
        if !response.status().is_success() {
            return self.handle_error(response).await;
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode {
            field: "body",
            source,
        })
    }

    /// Handle an error response.
    async fn handle_error<T>(&self, response: Response) -> Result<T, ApiError> {
        let status = response.status().as_u16();

        // Try to parse error response
        let error_body: ErrorResponse =
            response.json().await.unwrap_or_else(|_| ErrorResponse {
                id: "unknown".to_string(),
                message: "Unknown error".to_string(),
            });

        debug!(status, id = %error_body.id, message = %error_body.message, "API error");

        if status == 401 {
            return Err(ApiError::Unauthorized {
                message: error_body.message,
            });
        }

        Err(ApiError::Api {
            status,
            id: error_body.id,
            message: error_body.message,
        })
    }
}

/// Take `key` out of a response body and decode it.
fn extract<T: DeserializeOwned>(mut body: Value, key: &'static str) -> Result<T, ApiError> {
    let value = body
        .get_mut(key)
        .map(Value::take)
        .ok_or(ApiError::MissingField(key))?;
    serde_json::from_value(value).map_err(|source| ApiError::Decode { field: key, source })
}

/// Error body returned by the API.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    id: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Default, Deserialize)]
struct Links {
    #[serde(default)]
    pages: Option<Pages>,
}

#[derive(Debug, Default, Deserialize)]
struct Pages {
    #[serde(default)]
    next: Option<String>,
}
