//! Session gateway wrapping every outbound request to the backend.
//!
//! The gateway attaches the bearer token from the [`TokenStore`] and turns an
//! HTTP 401 into [`GatewayError::LoginRequired`], which the panel answers with
//! a redirect to the login entry point. Callers that must keep the user on the
//! page (modal flows with unsaved input) set
//! [`RequestOptions::suppress_auth_redirect`] and receive the 401 response
//! untouched instead. There are no retries.

use std::time::Duration;

use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

pub mod token;

pub use token::{MemoryTokenStore, TokenStore};

#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered 401 and redirection was not suppressed.
    #[error("authentication required")]
    LoginRequired,
}

/// Per-request options.
#[derive(Clone, Debug)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    pub suppress_auth_redirect: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::new(Method::GET)
    }
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            headers: Vec::new(),
            query: Vec::new(),
            body: None,
            suppress_auth_redirect: false,
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    pub fn put() -> Self {
        Self::new(Method::PUT)
    }

    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn query_pairs<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn suppress_auth_redirect(mut self, suppress: bool) -> Self {
        self.suppress_auth_redirect = suppress;
        self
    }
}

/// Status and body of a completed backend call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatewayResponse {
    status: StatusCode,
    body: String,
}

impl GatewayResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn text(&self) -> &str {
        &self.body
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Creates the shared HTTP client used for every backend call.
///
/// # Errors
///
/// Returns error if the TLS backend cannot be initialized.
pub fn create_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .pool_max_idle_per_host(10)
        .timeout(timeout)
        .build()
}

/// Authenticated entry point to the backend REST API.
#[derive(Debug)]
pub struct SessionGateway<S> {
    http: Client,
    base_url: String,
    tokens: S,
}

impl<S: TokenStore> SessionGateway<S> {
    pub fn new(http: Client, base_url: impl Into<String>, tokens: S) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
        }
    }

    pub fn tokens(&self) -> &S {
        &self.tokens
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends `options.method` to `path` relative to the backend base URL.
    ///
    /// Non-2xx responses other than 401 are returned as-is; interpreting them
    /// is the caller's job.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Network`] when no response arrives,
    /// [`GatewayError::LoginRequired`] on an unsuppressed 401.
    pub async fn request(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<GatewayResponse, GatewayError> {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self.http.request(options.method.clone(), &url);

        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        for (name, value) in &options.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(token) = self.tokens.load() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &options.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|err| {
            log::warn!("Request {} {path} failed: {err}", options.method);
            GatewayError::Network(err)
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED && !options.suppress_auth_redirect {
            log::info!("Backend rejected the session on {path}, redirecting to login");
            return Err(GatewayError::LoginRequired);
        }

        let body = response.text().await?;
        log::debug!("{} {path} -> {status}", options.method);

        Ok(GatewayResponse { status, body })
    }
}
