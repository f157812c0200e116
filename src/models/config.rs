//! Configuration model loaded from external sources.

use std::time::Duration;

use serde::Deserialize;

use crate::services::reports::DEFAULT_ACTIVITY_LIMIT;

fn default_token_cookie() -> String {
    "gym_admin_token".to_string()
}

const fn default_page_size() -> usize {
    50
}

const fn default_request_timeout_secs() -> u64 {
    30
}

const fn default_activity_limit() -> usize {
    DEFAULT_ACTIVITY_LIMIT
}

#[derive(Clone, Debug, Deserialize)]
/// Settings shared across handlers.
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    /// Base URL of the membership REST backend.
    pub backend_url: String,
    /// Where the browser is sent when the backend rejects the session.
    pub login_url: String,
    #[serde(default = "default_token_cookie")]
    pub token_cookie: String,
    /// Rows per payments page, and cap per client in multi-client listings.
    #[serde(default = "default_page_size")]
    pub payment_page_size: usize,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_activity_limit")]
    pub activity_limit: usize,
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
