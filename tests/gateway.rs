use std::time::Duration;

use chrono::NaiveDate;
use gym_admin::domain::client::NewClient;
use gym_admin::domain::filters::{ClientFilters, PaymentFilters};
use gym_admin::domain::types::ClientEmail;
use gym_admin::gateway::{
    GatewayError, MemoryTokenStore, RequestOptions, SessionGateway, TokenStore, create_http_client,
};
use gym_admin::repository::errors::RepositoryError;
use gym_admin::repository::{
    ClientReader, ClientWriter, HttpRepository, PaymentListQuery, PaymentReader, SessionWriter,
};

mod common;

fn gateway(url: &str, token: Option<&str>) -> SessionGateway<MemoryTokenStore> {
    let http = create_http_client(Duration::from_secs(5)).unwrap();
    SessionGateway::new(
        http,
        url,
        MemoryTokenStore::with_token(token.map(str::to_string)),
    )
}

#[actix_web::test]
async fn bearer_token_is_attached() {
    let backend = common::start();
    let repo = HttpRepository::new(gateway(&backend.url, Some(common::GOOD_TOKEN)));

    let clients = repo.list_clients(&ClientFilters::default()).await.unwrap();

    assert_eq!(clients.len(), 2);
    assert_eq!(clients[0].full_name(), "Ana Pérez");
    assert_eq!(backend.seen.requests(), vec!["GET /api/clients"]);
}

#[actix_web::test]
async fn unsuppressed_401_requires_login() {
    let backend = common::start();
    let gateway = gateway(&backend.url, Some("stale"));

    let result = gateway.request("/api/clients", RequestOptions::get()).await;

    assert!(matches!(result, Err(GatewayError::LoginRequired)));
}

#[actix_web::test]
async fn suppressed_401_is_returned_to_the_caller() {
    let backend = common::start();
    let gateway = gateway(&backend.url, None);

    let response = gateway
        .request(
            "/api/clients",
            RequestOptions::get().suppress_auth_redirect(true),
        )
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);

    let repo = HttpRepository::new(gateway).suppress_auth_redirect(true);
    let err = repo
        .list_clients(&ClientFilters::default())
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::SessionExpired));
}

#[actix_web::test]
async fn unreachable_backend_is_a_network_error() {
    let repo = HttpRepository::new(gateway(&common::dead_backend_url(), None));

    let err = repo
        .list_clients(&ClientFilters::default())
        .await
        .unwrap_err();

    assert!(matches!(err, RepositoryError::Network(_)));
}

#[actix_web::test]
async fn payment_envelope_is_normalized() {
    let backend = common::start();
    let repo = HttpRepository::new(gateway(&backend.url, Some(common::GOOD_TOKEN)));

    let query = PaymentListQuery::new(&PaymentFilters::new(), 25).page(2);
    let page = repo.list_payments(&query).await.unwrap();

    assert_eq!(page.total, 2);
    assert_eq!(page.payments.len(), 2);
    assert!(page.payments[1].is_voided());
    assert_eq!(
        backend.seen.requests(),
        vec!["GET /api/payments?page=2&size=25"]
    );
}

#[actix_web::test]
async fn login_stores_the_issued_token() {
    let backend = common::start();
    let repo = HttpRepository::new(gateway(&backend.url, None));

    let token = repo.login("admin@gym.cl", "secret").await.unwrap();

    assert_eq!(token, common::GOOD_TOKEN);
    assert_eq!(
        repo.gateway().tokens().load().as_deref(),
        Some(common::GOOD_TOKEN)
    );
}

#[actix_web::test]
async fn bad_credentials_do_not_redirect() {
    let backend = common::start();
    let repo = HttpRepository::new(gateway(&backend.url, None));

    let err = repo.login("admin@gym.cl", "wrong").await.unwrap_err();

    match err {
        RepositoryError::Backend { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Credenciales inválidas");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(repo.gateway().tokens().load().is_none());
}

#[actix_web::test]
async fn duplicate_email_is_a_conflict() {
    let backend = common::start();
    let repo = HttpRepository::new(gateway(&backend.url, Some(common::GOOD_TOKEN)));
    let client = NewClient::new(
        "Ana",
        "Pérez",
        ClientEmail::new("ana@gym.cl").unwrap(),
        None,
        None,
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
    );

    let err = repo.create_client(&client).await.unwrap_err();

    match err {
        RepositoryError::Conflict(message) => assert_eq!(message, "El email ya existe"),
        other => panic!("unexpected error: {other:?}"),
    }
}
