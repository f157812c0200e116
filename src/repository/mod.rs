//! Typed access to the membership backend.
//!
//! The traits are async and their futures are not required to be `Send`:
//! everything runs cooperatively on one worker thread, so borrowed
//! repositories can be fanned out with `join_all`.
#![allow(async_fn_in_trait)]

use chrono::NaiveDate;

use crate::domain::client::{Client, NewClient, PauseWindow, UpdateClient};
use crate::domain::filters::{ClientFilters, PaymentFilters};
use crate::domain::payment::{NewPayment, Payment};
use crate::domain::report::{Activity, DashboardStats, ExpiringClient, OverdueClient};
use crate::domain::types::{ClientId, PaymentId, PaymentStatusFilter};
use crate::repository::errors::RepositoryResult;

pub mod errors;
pub mod http;

pub use http::HttpRepository;

/// One request against `GET /api/payments`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentListQuery {
    pub client_id: Option<ClientId>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub state: Option<PaymentStatusFilter>,
    /// Zero-based page index.
    pub page: usize,
    pub size: usize,
}

impl PaymentListQuery {
    /// Builds the request sharing the date range and status of `filters`.
    pub fn new(filters: &PaymentFilters, size: usize) -> Self {
        Self {
            client_id: None,
            from: filters.date_from(),
            to: filters.date_to(),
            state: filters.status(),
            page: 0,
            size,
        }
    }

    pub fn client(mut self, client_id: ClientId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    pub fn page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(id) = self.client_id {
            pairs.push(("clientId", id.to_string()));
        }
        if let Some(from) = self.from {
            pairs.push(("from", from.to_string()));
        }
        if let Some(to) = self.to {
            pairs.push(("to", to.to_string()));
        }
        if let Some(state) = self.state {
            pairs.push(("state", state.as_str().to_string()));
        }
        pairs.push(("page", self.page.to_string()));
        pairs.push(("size", self.size.to_string()));
        pairs
    }
}

/// Payments list normalized from either a bare list or a page envelope.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PaymentPage {
    pub payments: Vec<Payment>,
    pub total: usize,
}

pub trait ClientReader {
    async fn list_clients(&self, filters: &ClientFilters) -> RepositoryResult<Vec<Client>>;
}

pub trait ClientWriter {
    async fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client>;
    async fn update_client(&self, id: ClientId, updates: &UpdateClient)
    -> RepositoryResult<Client>;
    /// Soft deactivation; the backend keeps the record.
    async fn deactivate_client(&self, id: ClientId) -> RepositoryResult<()>;
    async fn activate_client(&self, id: ClientId) -> RepositoryResult<()>;
    async fn pause_client(
        &self,
        id: ClientId,
        window: &PauseWindow,
        reason: Option<&str>,
    ) -> RepositoryResult<()>;
    async fn resume_client(&self, id: ClientId) -> RepositoryResult<()>;
}

pub trait PaymentReader {
    async fn list_payments(&self, query: &PaymentListQuery) -> RepositoryResult<PaymentPage>;
}

pub trait PaymentWriter {
    async fn create_payment(&self, payment: &NewPayment) -> RepositoryResult<Payment>;
    async fn void_payment(&self, id: PaymentId, reason: Option<&str>) -> RepositoryResult<()>;
}

pub trait ReportReader {
    async fn expiring_clients(&self) -> RepositoryResult<Vec<ExpiringClient>>;
    async fn overdue_clients(&self) -> RepositoryResult<Vec<OverdueClient>>;
    async fn cashflow(&self, from: NaiveDate, to: NaiveDate) -> RepositoryResult<f64>;
    async fn dashboard_stats(&self) -> RepositoryResult<DashboardStats>;
    async fn recent_activities(&self, limit: usize) -> RepositoryResult<Vec<Activity>>;
}

pub trait SessionWriter {
    /// Exchanges credentials for a bearer token.
    async fn login(&self, email: &str, password: &str) -> RepositoryResult<String>;
}
