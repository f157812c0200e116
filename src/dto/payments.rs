//! Payments table view.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::cache::ClientCache;
use crate::domain::payment::{Payment, PaymentMethod, PaymentState};
use crate::domain::types::{ClientId, PaymentId};
use crate::dto::{ListState, format_amount};
use crate::pagination::Pager;

/// Raw filter inputs of the payments table.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct PaymentsQuery {
    /// Client id, name or email fragment.
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    /// One-based page of a single-request listing.
    #[serde(default)]
    pub page: Option<usize>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRow {
    pub id: PaymentId,
    pub client_id: Option<ClientId>,
    pub client_name: String,
    pub amount: f64,
    pub amount_label: String,
    pub method: Option<PaymentMethod>,
    pub method_label: Option<String>,
    pub payment_date: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
    pub duration_days: Option<u32>,
    pub state: Option<PaymentState>,
    pub state_label: &'static str,
    pub voided: bool,
    pub void_reason: Option<String>,
}

impl PaymentRow {
    /// Resolves the member name from the payment itself, then from the cache.
    pub fn new(payment: &Payment, cache: &ClientCache) -> Self {
        let voided = payment.is_voided();
        let state = if voided {
            Some(PaymentState::Voided)
        } else {
            payment.state
        };
        let client_name = payment
            .client_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .or_else(|| {
                payment
                    .client_id
                    .and_then(|id| cache.find(id))
                    .map(|client| client.full_name())
            })
            .or_else(|| payment.client_email.clone())
            .unwrap_or_else(|| "-".to_string());

        Self {
            id: payment.id,
            client_id: payment.client_id,
            client_name,
            amount: payment.amount,
            amount_label: format_amount(payment.amount),
            method: payment.method,
            method_label: payment.method.map(|m| m.to_string()),
            payment_date: payment.payment_date,
            expiration_date: payment.expiration_date,
            duration_days: payment.duration_days,
            state,
            state_label: state.map_or("-", PaymentState::label),
            voided,
            void_reason: payment.void_reason.clone(),
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentsView {
    pub state: ListState,
    pub message: Option<String>,
    pub payments: Vec<PaymentRow>,
    pub total: usize,
    /// Present only for single-request listings.
    pub pager: Option<Pager>,
}

impl PaymentsView {
    pub fn loaded(
        payments: &[Payment],
        total: usize,
        pager: Option<Pager>,
        cache: &ClientCache,
    ) -> Self {
        let rows: Vec<PaymentRow> = payments.iter().map(|p| PaymentRow::new(p, cache)).collect();
        if rows.is_empty() {
            return Self::no_results();
        }
        Self {
            state: ListState::Loaded,
            message: None,
            payments: rows,
            total,
            pager,
        }
    }

    /// Empty result, including a client search that matched nobody.
    pub fn no_results() -> Self {
        Self {
            state: ListState::Empty,
            message: Some("No se encontraron pagos.".to_string()),
            payments: Vec::new(),
            total: 0,
            pager: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            state: ListState::Failed,
            message: Some(message.into()),
            payments: Vec::new(),
            total: 0,
            pager: None,
        }
    }
}
