//! Panel HTTP surface.
//!
//! Every handler builds a fresh repository from the incoming request: the
//! bearer token comes from the `Authorization` header or the token cookie, and
//! `X-Suppress-Auth-Redirect: true` keeps an expired session from redirecting.

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse};
use serde::Serialize;

use crate::gateway::{MemoryTokenStore, SessionGateway};
use crate::models::config::ServerConfig;
use crate::repository::HttpRepository;
use crate::services::ServiceError;
use crate::session::AdminSession;

pub mod auth;
pub mod clients;
pub mod payments;
pub mod reports;

pub const SUPPRESS_AUTH_REDIRECT_HEADER: &str = "X-Suppress-Auth-Redirect";

pub type PanelRepository = HttpRepository<MemoryTokenStore>;

/// Plain message body.
#[derive(Debug, Serialize)]
pub struct Notice {
    pub message: String,
}

impl Notice {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Token carried by the request, header first.
pub fn request_token(req: &HttpRequest, cookie_name: &str) -> Option<String> {
    let from_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string());

    from_header.or_else(|| req.cookie(cookie_name).map(|c| c.value().to_string()))
}

pub fn suppresses_auth_redirect(req: &HttpRequest) -> bool {
    req.headers()
        .get(SUPPRESS_AUTH_REDIRECT_HEADER)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.trim().eq_ignore_ascii_case("true"))
}

pub fn backend(
    req: &HttpRequest,
    http: &reqwest::Client,
    config: &ServerConfig,
) -> PanelRepository {
    let tokens = MemoryTokenStore::with_token(request_token(req, &config.token_cookie));
    HttpRepository::new(SessionGateway::new(
        http.clone(),
        config.backend_url.as_str(),
        tokens,
    ))
    .suppress_auth_redirect(suppresses_auth_redirect(req))
}

pub fn panel_session(
    req: &HttpRequest,
    http: &reqwest::Client,
    config: &ServerConfig,
) -> AdminSession<PanelRepository> {
    AdminSession::new(backend(req, http, config), config.payment_page_size)
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Maps a service failure to the panel response.
pub fn error_response(err: &ServiceError, config: &ServerConfig) -> HttpResponse {
    let notice = Notice::new(err.user_message());
    match err {
        ServiceError::LoginRequired => redirect(&config.login_url),
        ServiceError::SessionExpired => HttpResponse::Unauthorized().json(notice),
        ServiceError::Form(_) | ServiceError::TypeConstraint(_) => {
            HttpResponse::BadRequest().json(notice)
        }
        ServiceError::NotFound => HttpResponse::NotFound().json(notice),
        ServiceError::Conflict(_) => HttpResponse::Conflict().json(notice),
        ServiceError::Network(_) | ServiceError::Backend(_) => {
            HttpResponse::BadGateway().json(notice)
        }
        ServiceError::Internal(_) => HttpResponse::InternalServerError().json(notice),
    }
}

/// Failure of a list load: session errors as usual, anything else as the
/// failed table itself.
pub fn list_failure<T: Serialize>(
    err: &ServiceError,
    view: Option<T>,
    config: &ServerConfig,
) -> HttpResponse {
    match (err, view) {
        (ServiceError::Network(_) | ServiceError::Backend(_), Some(view)) => {
            HttpResponse::BadGateway().json(view)
        }
        _ => error_response(err, config),
    }
}
