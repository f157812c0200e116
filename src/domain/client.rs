use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::{ClientEmail, ClientId, TypeConstraintError};

/// Gym member as returned by the backend.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: ClientId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, alias = "isActive")]
    pub active: bool,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub paused_from: Option<NaiveDate>,
    #[serde(default)]
    pub paused_to: Option<NaiveDate>,
    #[serde(default)]
    pub pause_reason: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

/// Display status derived from the `active` flag and the pause window.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MembershipStatus {
    Active,
    Paused,
    Inactive,
}

impl MembershipStatus {
    /// Label shown in the members table.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "Activo",
            Self::Paused => "Pausado",
            Self::Inactive => "Inactivo",
        }
    }
}

/// Today's calendar date in the local timezone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

impl Client {
    /// First and last name joined by a single space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    /// Whether `as_of` falls inside the inclusive pause window.
    ///
    /// A window with only one bound, or with `paused_to` before `paused_from`,
    /// contains no dates. The `active` flag plays no part here.
    pub fn is_currently_paused(&self, as_of: NaiveDate) -> bool {
        match (self.paused_from, self.paused_to) {
            (Some(from), Some(to)) => from <= as_of && as_of <= to,
            _ => false,
        }
    }

    pub fn derived_status(&self, as_of: NaiveDate) -> MembershipStatus {
        if !self.active {
            MembershipStatus::Inactive
        } else if self.is_currently_paused(as_of) {
            MembershipStatus::Paused
        } else {
            MembershipStatus::Active
        }
    }

    /// Case-insensitive substring match against full name and email.
    ///
    /// `needle` must already be lower-cased.
    pub fn matches_text(&self, needle: &str) -> bool {
        if self.full_name().to_lowercase().contains(needle) {
            return true;
        }
        self.email
            .as_deref()
            .is_some_and(|email| email.to_lowercase().contains(needle))
    }
}

/// Validated inclusive pause window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PauseWindow {
    from: NaiveDate,
    to: NaiveDate,
}

impl PauseWindow {
    /// Rejects windows that end before they start.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, TypeConstraintError> {
        if to < from {
            return Err(TypeConstraintError::InvalidValue(format!(
                "pause window ends ({to}) before it starts ({from})"
            )));
        }
        Ok(Self { from, to })
    }

    pub const fn from(&self) -> NaiveDate {
        self.from
    }

    pub const fn to(&self) -> NaiveDate {
        self.to
    }

    /// Number of calendar days covered, both ends included.
    pub fn duration_days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }
}

/// Payload sent to register a new member.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewClient {
    pub first_name: String,
    pub last_name: String,
    pub email: ClientEmail,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub active: bool,
    pub start_date: NaiveDate,
}

impl NewClient {
    #[must_use]
    pub fn new(
        first_name: &str,
        last_name: &str,
        email: ClientEmail,
        phone: Option<String>,
        notes: Option<String>,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            email,
            phone: phone
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            notes: notes
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            active: true,
            start_date,
        }
    }
}

/// Payload sent when editing an existing member.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClient {
    pub first_name: String,
    pub last_name: String,
    pub email: ClientEmail,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

impl UpdateClient {
    #[must_use]
    pub fn new(
        first_name: &str,
        last_name: &str,
        email: ClientEmail,
        phone: Option<String>,
        notes: Option<String>,
    ) -> Self {
        Self {
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            email,
            phone: phone
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            notes: notes
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }
}
