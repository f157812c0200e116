use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use serde::Serialize;

use crate::domain::client::today;
use crate::domain::payment::Payment;
use crate::domain::types::PaymentId;
use crate::dto::payments::{PaymentsQuery, PaymentsView};
use crate::forms::payments::{PaymentForm, VoidForm};
use crate::models::config::ServerConfig;
use crate::routes::{error_response, list_failure, panel_session};
use crate::services::ServiceError;
use crate::services::payments::{Confirm, VoidOutcome, VoidState};

/// Decision already taken in the browser dialog.
struct Decided(bool);

impl Confirm for Decided {
    async fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}

#[derive(Serialize)]
struct RegisteredPayment {
    message: &'static str,
    payment: Payment,
    #[serde(skip_serializing_if = "Option::is_none")]
    payments: Option<PaymentsView>,
}

#[derive(Serialize)]
struct VoidResponse {
    state: VoidState,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payments: Option<PaymentsView>,
}

#[get("/payments")]
pub async fn list_payments(
    req: HttpRequest,
    params: web::Query<PaymentsQuery>,
    http: web::Data<reqwest::Client>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let session = panel_session(&req, &http, &server_config);

    match session.load_payments(params.into_inner()).await {
        Ok(_) => HttpResponse::Ok().json(session.payments_view()),
        Err(err) => list_failure(&err, session.payments_view(), &server_config),
    }
}

/// Registers a payment; the query string carries the table filters to reload with.
#[post("/payments")]
pub async fn register_payment(
    req: HttpRequest,
    params: web::Query<PaymentsQuery>,
    http: web::Data<reqwest::Client>,
    server_config: web::Data<ServerConfig>,
    web::Json(form): web::Json<PaymentForm>,
) -> impl Responder {
    let session =
        panel_session(&req, &http, &server_config).with_payments_query(params.into_inner());

    match session.register_payment(form, today()).await {
        Ok(payment) => HttpResponse::Created().json(RegisteredPayment {
            message: "Pago registrado.",
            payment,
            payments: session.payments_view(),
        }),
        Err(err) => error_response(&err, &server_config),
    }
}

/// Voids a payment; the query string carries the table filters to reload with.
#[post("/payments/{id}/void")]
pub async fn void_payment(
    req: HttpRequest,
    path: web::Path<i64>,
    params: web::Query<PaymentsQuery>,
    http: web::Data<reqwest::Client>,
    server_config: web::Data<ServerConfig>,
    web::Json(form): web::Json<VoidForm>,
) -> impl Responder {
    let id = match PaymentId::new(path.into_inner()) {
        Ok(id) => id,
        Err(err) => return error_response(&ServiceError::from(err), &server_config),
    };

    let session =
        panel_session(&req, &http, &server_config).with_payments_query(params.into_inner());
    let reason = form.reason();
    let outcome = session
        .void_payment(id, reason.as_deref(), &Decided(form.confirmed))
        .await;

    match outcome {
        Ok(VoidOutcome::Cancelled) => HttpResponse::Ok().json(VoidResponse {
            state: VoidState::Presented,
            message: None,
            payments: None,
        }),
        Ok(VoidOutcome::Failed(message)) => HttpResponse::BadRequest().json(VoidResponse {
            state: VoidState::Presented,
            message: Some(message),
            payments: None,
        }),
        Ok(VoidOutcome::Voided) => HttpResponse::Ok().json(VoidResponse {
            state: VoidState::Voided,
            message: Some("Pago anulado.".to_string()),
            payments: session.payments_view(),
        }),
        Err(err) => error_response(&err, &server_config),
    }
}
