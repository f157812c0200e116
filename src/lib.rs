use actix_web::{App, HttpServer, middleware, web};

use crate::gateway::create_http_client;
use crate::models::config::ServerConfig;
use crate::routes::auth::{login, logout};
use crate::routes::clients::{client_action, list_clients, register_client, update_client};
use crate::routes::payments::{list_payments, register_payment, void_payment};
use crate::routes::reports::{cashflow, dashboard, expiring, overdue};

pub mod cache;
pub mod domain;
pub mod dto;
pub mod error_conversions;
pub mod forms;
pub mod gateway;
pub mod models;
pub mod pagination;
pub mod repository;
pub mod routes;
pub mod services;
pub mod session;

/// Registers the panel routes on `cfg`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(login)
        .service(logout)
        .service(list_clients)
        .service(register_client)
        .service(update_client)
        .service(client_action)
        .service(list_payments)
        .service(register_payment)
        .service(void_payment)
        .service(expiring)
        .service(overdue)
        .service(cashflow)
        .service(dashboard);
}

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    let http = create_http_client(server_config.request_timeout())
        .map_err(|e| std::io::Error::other(format!("Failed to build HTTP client: {e}")))?;

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!(
        "Serving panel on {}:{} against {}",
        bind_address.0,
        bind_address.1,
        server_config.backend_url
    );

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .configure(configure)
            .app_data(web::Data::new(http.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
