//! Immutable filter criteria sent to the backend list endpoints.
//!
//! Values here are already normalized: free text is trimmed and non-empty,
//! status constraints use the canonical enum, and an absent field means "no
//! constraint". Builders consume `self`, so a value handed to a repository
//! cannot change underneath it.

use chrono::NaiveDate;

use crate::domain::types::{ClientId, PaymentStatusFilter};

/// Constraints for the members list (`GET /api/clients`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClientFilters {
    query: Option<String>,
    active: Option<bool>,
    payment: Option<PaymentStatusFilter>,
}

impl ClientFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, text: impl Into<String>) -> Self {
        self.query = Some(text.into());
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    pub fn payment(mut self, status: PaymentStatusFilter) -> Self {
        self.payment = Some(status);
        self
    }

    pub fn text(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn active_flag(&self) -> Option<bool> {
        self.active
    }

    pub fn payment_status(&self) -> Option<PaymentStatusFilter> {
        self.payment
    }

    /// Query-string pairs; constraints that are not set produce no key.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(q) = &self.query {
            pairs.push(("q", q.clone()));
        }
        if let Some(active) = self.active {
            pairs.push(("active", active.to_string()));
        }
        if let Some(status) = self.payment {
            pairs.push(("payment", status.as_str().to_string()));
        }
        pairs
    }
}

/// Constraints for the payments list shared by every per-client request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PaymentFilters {
    client_ids: Vec<ClientId>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    state: Option<PaymentStatusFilter>,
}

impl PaymentFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client_ids(mut self, ids: Vec<ClientId>) -> Self {
        self.client_ids = ids;
        self
    }

    pub fn client_id(self, id: ClientId) -> Self {
        self.client_ids(vec![id])
    }

    pub fn from(mut self, date: NaiveDate) -> Self {
        self.from = Some(date);
        self
    }

    pub fn to(mut self, date: NaiveDate) -> Self {
        self.to = Some(date);
        self
    }

    pub fn state(mut self, state: PaymentStatusFilter) -> Self {
        self.state = Some(state);
        self
    }

    pub fn ids(&self) -> &[ClientId] {
        &self.client_ids
    }

    pub fn date_from(&self) -> Option<NaiveDate> {
        self.from
    }

    pub fn date_to(&self) -> Option<NaiveDate> {
        self.to
    }

    pub fn status(&self) -> Option<PaymentStatusFilter> {
        self.state
    }
}
