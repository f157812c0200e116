use actix_web::{HttpRequest, HttpResponse, Responder, get, web};

use crate::forms::reports::CashflowForm;
use crate::models::config::ServerConfig;
use crate::routes::{backend, error_response};
use crate::services::reports;

#[get("/reports/expiring")]
pub async fn expiring(
    req: HttpRequest,
    http: web::Data<reqwest::Client>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let repo = backend(&req, &http, &server_config);
    match reports::expiring_report(&repo).await {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(err) => error_response(&err, &server_config),
    }
}

#[get("/reports/overdue")]
pub async fn overdue(
    req: HttpRequest,
    http: web::Data<reqwest::Client>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let repo = backend(&req, &http, &server_config);
    match reports::overdue_report(&repo).await {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(err) => error_response(&err, &server_config),
    }
}

#[get("/reports/cashflow")]
pub async fn cashflow(
    req: HttpRequest,
    params: web::Query<CashflowForm>,
    http: web::Data<reqwest::Client>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let repo = backend(&req, &http, &server_config);
    match reports::cashflow_report(&repo, &params).await {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(err) => error_response(&err, &server_config),
    }
}

#[get("/dashboard")]
pub async fn dashboard(
    req: HttpRequest,
    http: web::Data<reqwest::Client>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let repo = backend(&req, &http, &server_config);
    match reports::dashboard(&repo, server_config.activity_limit).await {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(err) => error_response(&err, &server_config),
    }
}
