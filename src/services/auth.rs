use validator::Validate;

use crate::forms::FormError;
use crate::forms::auth::LoginForm;
use crate::gateway::TokenStore;
use crate::repository::SessionWriter;
use crate::repository::errors::RepositoryError;
use crate::services::{ServiceError, ServiceResult};

/// Exchanges the credentials for a token.
///
/// The repository stores the token on success. A rejected login reports the
/// backend text, or a generic message when there is none.
pub async fn login<R: SessionWriter>(repo: &R, form: &LoginForm) -> ServiceResult<String> {
    let form = form.normalized();
    form.validate().map_err(FormError::from)?;

    repo.login(&form.email, &form.password)
        .await
        .map_err(|err| {
            log::warn!("Login failed for {}: {err}", form.email);
            match err {
                RepositoryError::Network(msg) => ServiceError::Network(msg),
                RepositoryError::Backend { message, .. } | RepositoryError::Conflict(message)
                    if !message.trim().is_empty() =>
                {
                    ServiceError::Backend(message)
                }
                _ => ServiceError::Backend("No se pudo iniciar sesión.".to_string()),
            }
        })
}

/// Forgets the stored token.
pub fn logout<S: TokenStore>(tokens: &S) {
    tokens.clear();
    log::info!("Session token cleared");
}
