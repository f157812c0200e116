use thiserror::Error;

use crate::gateway::{GatewayError, GatewayResponse};

/// Words in an error body that mark a uniqueness conflict.
const CONFLICT_MARKERS: &[&str] = &["duplicate", "duplicado", "exists", "existe"];

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Login required")]
    LoginRequired,

    #[error("Session expired")]
    SessionExpired,

    #[error("Entity not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    #[error("Unexpected payload: {0}")]
    Payload(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<GatewayError> for RepositoryError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Network(e) => RepositoryError::Network(e.to_string()),
            GatewayError::LoginRequired => RepositoryError::LoginRequired,
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Payload(err.to_string())
    }
}

impl RepositoryError {
    /// Classifies a non-2xx backend response.
    ///
    /// The backend has no structured error codes, so a conflict is recognized
    /// either by status 409 or by wording in the body.
    pub fn from_response(response: &GatewayResponse) -> Self {
        let status = response.status().as_u16();
        let message = error_message(response);

        match status {
            401 => RepositoryError::SessionExpired,
            404 => RepositoryError::NotFound,
            409 => RepositoryError::Conflict(message),
            _ if looks_like_conflict(&message) => RepositoryError::Conflict(message),
            _ => RepositoryError::Backend { status, message },
        }
    }

    /// Whether the error is a user-actionable validation problem.
    pub fn is_conflict(&self) -> bool {
        matches!(self, RepositoryError::Conflict(_))
    }
}

fn looks_like_conflict(message: &str) -> bool {
    let lowered = message.to_lowercase();
    CONFLICT_MARKERS.iter().any(|marker| lowered.contains(marker))
}

/// Extracts readable text from an error body: a JSON `message`/`error` field
/// when present, otherwise the raw text, otherwise the status reason.
pub(crate) fn error_message(response: &GatewayResponse) -> String {
    let text = response.text().trim();

    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(text) {
        for key in ["message", "error"] {
            if let Some(serde_json::Value::String(message)) = map.get(key) {
                return message.clone();
            }
        }
    }

    if text.is_empty() {
        response
            .status()
            .canonical_reason()
            .unwrap_or("error")
            .to_string()
    } else {
        text.to_string()
    }
}
