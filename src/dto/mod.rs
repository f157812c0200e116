//! DTOs bridging services with the panel's JSON views.

use serde::Serialize;

pub mod clients;
pub mod payments;
pub mod reports;

/// Load state of a list view.
///
/// `Empty` (the request succeeded with no rows) and `Failed` (the request did
/// not succeed) are shown differently.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListState {
    Loaded,
    Empty,
    Failed,
}

/// Formats an amount the way the tables show it.
pub fn format_amount(amount: f64) -> String {
    format!("${amount:.2}")
}
