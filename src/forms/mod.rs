//! Validated input accepted by the panel routes.

use chrono::NaiveDate;
use thiserror::Error;
use validator::ValidationErrors;

pub mod auth;
pub mod clients;
pub mod payments;
pub mod reports;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid email address")]
    InvalidEmail,

    #[error("invalid client id")]
    InvalidClientId,

    #[error("invalid date `{0}`, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("both dates are required")]
    MissingDateRange,

    #[error("end date is before start date")]
    InvalidDateRange,

    #[error("amount must be greater than zero")]
    InvalidAmount,

    #[error("unsupported duration of {0} days")]
    InvalidDuration(u32),

    #[error("invalid value: {0}")]
    InvalidValue(String),
}

impl FormError {
    /// Text shown next to the form.
    pub fn user_message(&self) -> String {
        match self {
            FormError::Validation(errors) => {
                let field_errors = errors.field_errors();
                let mut fields: Vec<&str> =
                    field_errors.keys().map(|field| field.as_ref()).collect();
                fields.sort_unstable();
                format!("Revise los campos: {}.", fields.join(", "))
            }
            FormError::InvalidEmail => "El email no es válido.".to_string(),
            FormError::InvalidClientId => "Seleccione un cliente válido.".to_string(),
            FormError::InvalidDate(value) => {
                format!("La fecha «{value}» no es válida (AAAA-MM-DD).")
            }
            FormError::MissingDateRange => "Indique ambas fechas.".to_string(),
            FormError::InvalidDateRange => {
                "La fecha de fin no puede ser anterior a la de inicio.".to_string()
            }
            FormError::InvalidAmount => "El monto debe ser mayor a cero.".to_string(),
            FormError::InvalidDuration(_) => "La duración debe ser de 15 o 30 días.".to_string(),
            FormError::InvalidValue(value) => value.clone(),
        }
    }
}

/// Parses a `YYYY-MM-DD` calendar date.
pub(crate) fn parse_date(value: &str) -> Result<NaiveDate, FormError> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| FormError::InvalidDate(value.to_string()))
}

/// Parses an optional date field, treating blank input as absent.
pub(crate) fn parse_optional_date(value: Option<&str>) -> Result<Option<NaiveDate>, FormError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => parse_date(value).map(Some),
        None => Ok(None),
    }
}

/// Trims optional free text, dropping blanks.
pub(crate) fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
