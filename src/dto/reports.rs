use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::report::{Activity, DashboardStats, ExpiringClient, OverdueClient};
use crate::dto::{ListState, format_amount};

/// Report table with its load state.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportView<T> {
    pub state: ListState,
    pub message: Option<String>,
    pub rows: Vec<T>,
}

impl<T> ReportView<T> {
    pub fn new(rows: Vec<T>, empty_message: &str) -> Self {
        if rows.is_empty() {
            Self {
                state: ListState::Empty,
                message: Some(empty_message.to_string()),
                rows,
            }
        } else {
            Self {
                state: ListState::Loaded,
                message: None,
                rows,
            }
        }
    }
}

pub type ExpiringView = ReportView<ExpiringClient>;
pub type OverdueView = ReportView<OverdueClient>;

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CashflowView {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub total: f64,
    pub label: String,
}

impl CashflowView {
    pub fn new(from: NaiveDate, to: NaiveDate, total: f64) -> Self {
        Self {
            from,
            to,
            total,
            label: format!("Total: {}", format_amount(total)),
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub stats: DashboardStats,
    pub activities: Vec<Activity>,
}
