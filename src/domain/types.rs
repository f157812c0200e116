//! Strongly-typed value objects used by domain entities.
//!
//! Ids are positive, emails are trimmed and lower-cased, and payment status
//! filters only take the backend's technical spelling.
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::ValidateEmail;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided identifier is zero or negative.
    #[error("id must be greater than zero")]
    NonPositiveId,
    /// Provided email failed format validation.
    #[error("invalid email address")]
    InvalidEmail,
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// Positive backend identifier newtype.
macro_rules! id_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub fn new(value: i64) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId)
                }
            }

            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(ClientId, "Unique identifier for a gym member.");
id_newtype!(PaymentId, "Unique identifier for a registered payment.");

/// Lower-cased and validated email address of a member.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ClientEmail(String);

impl ClientEmail {
    pub fn new(email: impl Into<String>) -> Result<Self, TypeConstraintError> {
        let email = email.into().trim().to_lowercase();
        if email.validate_email() {
            Ok(Self(email))
        } else {
            Err(TypeConstraintError::InvalidEmail)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ClientEmail {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonical payment-status constraint understood by the backend filter.
///
/// This is the closed set the UI is allowed to filter by; `PENDING` exists on
/// payments but is never a filter value.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatusFilter {
    UpToDate,
    Expired,
    Voided,
}

impl PaymentStatusFilter {
    /// Wire value sent as the `state`/`payment` query parameter.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UpToDate => "UP_TO_DATE",
            Self::Expired => "EXPIRED",
            Self::Voided => "VOIDED",
        }
    }
}

impl Display for PaymentStatusFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatusFilter {
    type Err = TypeConstraintError;

    /// Parses only the technical spelling; localized text goes through the
    /// filter resolver.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UP_TO_DATE" => Ok(Self::UpToDate),
            "EXPIRED" => Ok(Self::Expired),
            "VOIDED" => Ok(Self::Voided),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}
