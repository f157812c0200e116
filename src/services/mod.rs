//! Business operations shared by the panel routes and the admin session.

use thiserror::Error;

use crate::repository::errors::RepositoryError;

pub mod auth;
pub mod clients;
pub mod filters;
pub mod payments;
pub mod reports;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("form error: {0}")]
    Form(String),

    #[error("type constraint violation: {0}")]
    TypeConstraint(String),

    #[error("not found")]
    NotFound,

    /// User-actionable uniqueness violation reported by the backend.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The backend rejected the session and the caller should be sent to login.
    #[error("login required")]
    LoginRequired,

    /// The backend rejected the session on a call that must stay on the page.
    #[error("session expired")]
    SessionExpired,

    #[error("network error: {0}")]
    Network(String),

    #[error("backend error: {0}")]
    Backend(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Network(msg) => ServiceError::Network(msg),
            RepositoryError::LoginRequired => ServiceError::LoginRequired,
            RepositoryError::SessionExpired => ServiceError::SessionExpired,
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::Conflict(msg) => ServiceError::Conflict(msg),
            RepositoryError::Backend { message, .. } => ServiceError::Backend(message),
            RepositoryError::Payload(msg) => ServiceError::Internal(msg),
            RepositoryError::ValidationError(msg) => ServiceError::TypeConstraint(msg),
        }
    }
}

impl ServiceError {
    /// Text shown to the operator.
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Form(msg) | ServiceError::TypeConstraint(msg) => msg.clone(),
            ServiceError::NotFound => "El registro solicitado no existe.".to_string(),
            ServiceError::Conflict(msg) if !msg.trim().is_empty() => msg.clone(),
            ServiceError::Conflict(_) => "Ya existe un registro con esos datos.".to_string(),
            ServiceError::LoginRequired => "Debe iniciar sesión.".to_string(),
            ServiceError::SessionExpired => {
                "Su sesión expiró. Vuelva a iniciar sesión.".to_string()
            }
            ServiceError::Network(_) => "Error de red. Intente nuevamente.".to_string(),
            ServiceError::Backend(msg) if !msg.trim().is_empty() => msg.clone(),
            ServiceError::Backend(_) | ServiceError::Internal(_) => {
                "Ocurrió un error inesperado.".to_string()
            }
        }
    }

    /// Whether the error ends the session rather than the current operation.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            ServiceError::LoginRequired | ServiceError::SessionExpired
        )
    }
}
