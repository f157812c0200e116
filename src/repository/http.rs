//! REST implementation of the repository traits on top of the session gateway.

use chrono::NaiveDate;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::domain::client::{Client, NewClient, PauseWindow, UpdateClient};
use crate::domain::filters::ClientFilters;
use crate::domain::payment::{NewPayment, Payment};
use crate::domain::report::{Activity, DashboardStats, ExpiringClient, OverdueClient};
use crate::domain::types::{ClientId, PaymentId};
use crate::gateway::{GatewayResponse, RequestOptions, SessionGateway, TokenStore};
use crate::repository::errors::{RepositoryError, RepositoryResult, error_message};
use crate::repository::{
    ClientReader, ClientWriter, PaymentListQuery, PaymentPage, PaymentReader, PaymentWriter,
    ReportReader, SessionWriter,
};

/// Either response shape of `GET /api/payments`.
#[derive(Deserialize)]
#[serde(untagged)]
enum PaymentsBody {
    Envelope {
        content: Vec<Payment>,
        #[serde(rename = "totalElements")]
        total_elements: Option<usize>,
    },
    Bare(Vec<Payment>),
}

impl From<PaymentsBody> for PaymentPage {
    fn from(body: PaymentsBody) -> Self {
        match body {
            PaymentsBody::Envelope {
                content,
                total_elements,
            } => {
                let total = total_elements.unwrap_or(content.len());
                PaymentPage {
                    payments: content,
                    total,
                }
            }
            PaymentsBody::Bare(payments) => PaymentPage {
                total: payments.len(),
                payments,
            },
        }
    }
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

/// Repository backed by the gateway.
///
/// `suppress_auth_redirect` applies to every call made through this value; the
/// panel builds one per incoming request.
#[derive(Debug)]
pub struct HttpRepository<S> {
    gateway: SessionGateway<S>,
    suppress_auth_redirect: bool,
}

impl<S: TokenStore> HttpRepository<S> {
    pub fn new(gateway: SessionGateway<S>) -> Self {
        Self {
            gateway,
            suppress_auth_redirect: false,
        }
    }

    pub fn suppress_auth_redirect(mut self, suppress: bool) -> Self {
        self.suppress_auth_redirect = suppress;
        self
    }

    pub fn gateway(&self) -> &SessionGateway<S> {
        &self.gateway
    }

    async fn send(&self, path: &str, options: RequestOptions) -> RepositoryResult<GatewayResponse> {
        let suppress = options.suppress_auth_redirect || self.suppress_auth_redirect;
        let response = self
            .gateway
            .request(path, options.suppress_auth_redirect(suppress))
            .await?;

        if response.is_success() {
            Ok(response)
        } else {
            let err = RepositoryError::from_response(&response);
            log::warn!("Backend call {path} failed: {err}");
            Err(err)
        }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> RepositoryResult<T> {
        let response = self.send(path, options).await?;
        Ok(response.json()?)
    }
}

impl<S: TokenStore> ClientReader for HttpRepository<S> {
    async fn list_clients(&self, filters: &ClientFilters) -> RepositoryResult<Vec<Client>> {
        let options = RequestOptions::get().query_pairs(filters.to_query_pairs());
        self.fetch("/api/clients", options).await
    }
}

impl<S: TokenStore> ClientWriter for HttpRepository<S> {
    async fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client> {
        let options = RequestOptions::post().json(serde_json::to_value(new_client)?);
        self.fetch("/api/clients", options).await
    }

    async fn update_client(
        &self,
        id: ClientId,
        updates: &UpdateClient,
    ) -> RepositoryResult<Client> {
        let options = RequestOptions::put().json(serde_json::to_value(updates)?);
        self.fetch(&format!("/api/clients/{id}"), options).await
    }

    async fn deactivate_client(&self, id: ClientId) -> RepositoryResult<()> {
        self.send(&format!("/api/clients/{id}"), RequestOptions::delete())
            .await
            .map(|_| ())
    }

    async fn activate_client(&self, id: ClientId) -> RepositoryResult<()> {
        self.send(&format!("/api/clients/{id}/activate"), RequestOptions::post())
            .await
            .map(|_| ())
    }

    async fn pause_client(
        &self,
        id: ClientId,
        window: &PauseWindow,
        reason: Option<&str>,
    ) -> RepositoryResult<()> {
        let mut options = RequestOptions::post()
            .query("from", window.from().to_string())
            .query("to", window.to().to_string());
        if let Some(reason) = reason {
            options = options.query("reason", reason);
        }
        self.send(&format!("/api/clients/{id}/pause"), options)
            .await
            .map(|_| ())
    }

    async fn resume_client(&self, id: ClientId) -> RepositoryResult<()> {
        self.send(&format!("/api/clients/{id}/resume"), RequestOptions::post())
            .await
            .map(|_| ())
    }
}

impl<S: TokenStore> PaymentReader for HttpRepository<S> {
    async fn list_payments(&self, query: &PaymentListQuery) -> RepositoryResult<PaymentPage> {
        let options = RequestOptions::get().query_pairs(query.to_query_pairs());
        let body: PaymentsBody = self.fetch("/api/payments", options).await?;
        Ok(body.into())
    }
}

impl<S: TokenStore> PaymentWriter for HttpRepository<S> {
    async fn create_payment(&self, payment: &NewPayment) -> RepositoryResult<Payment> {
        let options = RequestOptions::post().json(serde_json::to_value(payment)?);
        self.fetch("/api/payments", options).await
    }

    async fn void_payment(&self, id: PaymentId, reason: Option<&str>) -> RepositoryResult<()> {
        let mut options = RequestOptions::post();
        if let Some(reason) = reason {
            options = options.query("reason", reason);
        }
        self.send(&format!("/api/payments/{id}/void"), options)
            .await
            .map(|_| ())
    }
}

impl<S: TokenStore> ReportReader for HttpRepository<S> {
    async fn expiring_clients(&self) -> RepositoryResult<Vec<ExpiringClient>> {
        self.fetch("/api/reports/expiring", RequestOptions::get())
            .await
    }

    async fn overdue_clients(&self) -> RepositoryResult<Vec<OverdueClient>> {
        self.fetch("/api/reports/overdue", RequestOptions::get())
            .await
    }

    async fn cashflow(&self, from: NaiveDate, to: NaiveDate) -> RepositoryResult<f64> {
        let options = RequestOptions::get()
            .query("from", from.to_string())
            .query("to", to.to_string());
        self.fetch("/api/reports/cashflow", options).await
    }

    async fn dashboard_stats(&self) -> RepositoryResult<DashboardStats> {
        self.fetch("/api/dashboard/stats", RequestOptions::get())
            .await
    }

    async fn recent_activities(&self, limit: usize) -> RepositoryResult<Vec<Activity>> {
        let options = RequestOptions::get().query("limit", limit.to_string());
        self.fetch("/api/dashboard/activities", options).await
    }
}

impl<S: TokenStore> SessionWriter for HttpRepository<S> {
    async fn login(&self, email: &str, password: &str) -> RepositoryResult<String> {
        let options = RequestOptions::post()
            .json(json!({ "email": email, "password": password }))
            .suppress_auth_redirect(true);
        let response = self.gateway.request("/auth/login", options).await?;

        if !response.is_success() {
            // A 401 here means bad credentials, not an expired session.
            return Err(match RepositoryError::from_response(&response) {
                RepositoryError::SessionExpired => RepositoryError::Backend {
                    status: 401,
                    message: error_message(&response),
                },
                other => other,
            });
        }

        let body: LoginResponse = response.json()?;
        self.gateway.tokens().save(&body.token);
        Ok(body.token)
    }
}
