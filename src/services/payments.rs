//! Payment listing, registration and voiding.
//!
//! A payments query naming several clients becomes one request per client,
//! all in flight at once and joined with an all-settled barrier. A client
//! whose request fails contributes no rows; only an ended session aborts the
//! aggregation. Whatever the path, rows come back newest first.

use chrono::NaiveDate;
use futures::future::join_all;
use serde::Serialize;

use crate::cache::ClientCache;
use crate::domain::filters::PaymentFilters;
use crate::domain::payment::{Payment, sort_newest_first};
use crate::domain::types::PaymentId;
use crate::dto::payments::PaymentsView;
use crate::forms::payments::PaymentForm;
use crate::pagination::Pager;
use crate::repository::errors::RepositoryError;
use crate::repository::{PaymentListQuery, PaymentPage, PaymentReader, PaymentWriter};
use crate::services::{ServiceError, ServiceResult};

/// Loads payments matching `filters`, newest first.
///
/// `page` is one-based and only applies to single-request listings; each
/// per-client request of a multi-client query asks for the first `page_size`
/// rows.
pub async fn load_payments<R>(
    repo: &R,
    filters: &PaymentFilters,
    page: usize,
    page_size: usize,
) -> ServiceResult<PaymentPage>
where
    R: PaymentReader,
{
    let base = PaymentListQuery::new(filters, page_size);

    let mut result = match filters.ids() {
        [] => fetch_page(repo, &base.page(page.saturating_sub(1))).await?,
        [id] => fetch_page(repo, &base.client(*id).page(page.saturating_sub(1))).await?,
        ids => {
            let queries: Vec<PaymentListQuery> =
                ids.iter().map(|id| base.clone().client(*id)).collect();
            let settled = join_all(queries.iter().map(|query| repo.list_payments(query))).await;

            let mut payments = Vec::new();
            for (query, outcome) in queries.iter().zip(settled) {
                match outcome {
                    Ok(page) => payments.extend(page.payments),
                    Err(
                        err @ (RepositoryError::LoginRequired | RepositoryError::SessionExpired),
                    ) => return Err(err.into()),
                    Err(err) => log::warn!(
                        "Skipping payments of client {:?}: {err}",
                        query.client_id
                    ),
                }
            }
            PaymentPage {
                total: payments.len(),
                payments,
            }
        }
    };

    sort_newest_first(&mut result.payments);
    Ok(result)
}

async fn fetch_page<R: PaymentReader>(
    repo: &R,
    query: &PaymentListQuery,
) -> ServiceResult<PaymentPage> {
    repo.list_payments(query).await.map_err(|err| {
        log::error!("Failed to list payments: {err}");
        ServiceError::from(err)
    })
}

/// Builds the table for a loaded result; only single requests get a pager.
pub fn payments_view(
    filters: &PaymentFilters,
    page: usize,
    page_size: usize,
    result: PaymentPage,
    cache: &ClientCache,
) -> PaymentsView {
    let pager = (filters.ids().len() <= 1).then(|| Pager::new(page, result.total, page_size));
    PaymentsView::loaded(&result.payments, result.total, pager, cache)
}

pub async fn register_payment<R>(
    repo: &R,
    form: PaymentForm,
    today: NaiveDate,
) -> ServiceResult<Payment>
where
    R: PaymentWriter,
{
    let payment = form.into_new_payment(today)?;
    repo.create_payment(&payment).await.map_err(|err| {
        log::error!(
            "Failed to register payment for client {}: {err}",
            payment.client_id
        );
        ServiceError::from(err)
    })
}

/// Asks the operator to confirm a destructive step.
#[allow(async_fn_in_trait)]
pub trait Confirm {
    async fn confirm(&self, prompt: &str) -> bool;
}

/// Steps of the void dialog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoidState {
    /// Dialog shown, nothing sent.
    Presented,
    /// Request in flight.
    Submitted,
    /// Backend accepted the void.
    Voided,
}

#[derive(Debug)]
pub enum VoidOutcome {
    /// Operator backed out at the confirmation; nothing was sent.
    Cancelled,
    /// Backend refused; the dialog stays open with this text.
    Failed(String),
    /// Backend accepted the void.
    Voided,
}

impl VoidOutcome {
    /// State the dialog ends in.
    pub fn state(&self) -> VoidState {
        match self {
            VoidOutcome::Cancelled | VoidOutcome::Failed(_) => VoidState::Presented,
            VoidOutcome::Voided => VoidState::Voided,
        }
    }
}

pub const VOID_PROMPT: &str = "¿Anular este pago? Esta acción no se puede deshacer.";

/// Runs the void dialog for payment `id`.
///
/// Only an ended session is returned as an error; any other failure of the
/// void request keeps the dialog open with the server text. Reloading the
/// table afterwards is up to the caller.
pub async fn void_payment<R, C>(
    repo: &R,
    confirm: &C,
    id: PaymentId,
    reason: Option<&str>,
) -> ServiceResult<VoidOutcome>
where
    R: PaymentWriter,
    C: Confirm,
{
    if !confirm.confirm(VOID_PROMPT).await {
        log::debug!("Void of payment {id} cancelled");
        return Ok(VoidOutcome::Cancelled);
    }

    log::debug!("Payment {id} void {:?}", VoidState::Submitted);
    if let Err(err) = repo.void_payment(id, reason).await {
        log::warn!("Failed to void payment {id}: {err}");
        let err = ServiceError::from(err);
        if err.is_auth() {
            return Err(err);
        }
        return Ok(VoidOutcome::Failed(err.user_message()));
    }

    log::info!("Payment {id} voided");
    Ok(VoidOutcome::Voided)
}
