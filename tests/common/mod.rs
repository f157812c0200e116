//! In-process stand-in for the membership backend.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use actix_web::{App, HttpRequest, HttpResponse, HttpServer, http::header, web};
use serde_json::json;

use gym_admin::models::config::ServerConfig;

pub const GOOD_TOKEN: &str = "good-token";

/// Requests seen by the fake backend, as `"METHOD /path?query"`.
#[derive(Clone, Default)]
pub struct Seen(Arc<Mutex<Vec<String>>>);

impl Seen {
    fn record(&self, req: &HttpRequest) {
        let line = match req.query_string() {
            "" => format!("{} {}", req.method(), req.path()),
            query => format!("{} {}?{}", req.method(), req.path(), query),
        };
        self.0.lock().unwrap().push(line);
    }

    pub fn requests(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

pub struct FakeBackend {
    pub url: String,
    pub seen: Seen,
}

impl FakeBackend {
    pub fn config(&self) -> ServerConfig {
        ServerConfig {
            address: "127.0.0.1".into(),
            port: 0,
            backend_url: self.url.clone(),
            login_url: "/login.html".into(),
            token_cookie: "gym_admin_token".into(),
            payment_page_size: 50,
            request_timeout_secs: 5,
            activity_limit: 10,
        }
    }
}

fn authorized(req: &HttpRequest) -> bool {
    let expected = format!("Bearer {GOOD_TOKEN}");
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        == Some(expected.as_str())
}

async fn clients(req: HttpRequest, seen: web::Data<Seen>) -> HttpResponse {
    seen.record(&req);
    if !authorized(&req) {
        return HttpResponse::Unauthorized().finish();
    }
    HttpResponse::Ok().json(json!([
        {"id": 1, "firstName": "Ana", "lastName": "Pérez", "email": "ana@gym.cl", "active": true},
        {"id": 2, "firstName": "Bruno", "lastName": "Soto", "email": "bruno@gym.cl", "active": false},
    ]))
}

async fn payments(req: HttpRequest, seen: web::Data<Seen>) -> HttpResponse {
    seen.record(&req);
    if !authorized(&req) {
        return HttpResponse::Unauthorized().finish();
    }
    HttpResponse::Ok().json(json!({
        "content": [
            {"id": 10, "clientId": 1, "clientName": "Ana Pérez", "amount": 1500.0,
             "method": "CASH", "paymentDate": "2024-03-01", "state": "UP_TO_DATE"},
            {"id": 11, "clientId": 1, "amount": 900.0,
             "paymentDate": "2024-04-01", "voided": true},
        ],
        "totalElements": 2
    }))
}

async fn client_command(req: HttpRequest, seen: web::Data<Seen>) -> HttpResponse {
    seen.record(&req);
    if !authorized(&req) {
        return HttpResponse::Unauthorized().finish();
    }
    HttpResponse::Ok().finish()
}

async fn create_client(req: HttpRequest, seen: web::Data<Seen>) -> HttpResponse {
    seen.record(&req);
    HttpResponse::Conflict().json(json!({"message": "El email ya existe"}))
}

async fn login(
    req: HttpRequest,
    seen: web::Data<Seen>,
    body: web::Json<serde_json::Value>,
) -> HttpResponse {
    seen.record(&req);
    if body["password"] == "secret" {
        HttpResponse::Ok().json(json!({"token": GOOD_TOKEN}))
    } else {
        HttpResponse::Unauthorized().json(json!({"message": "Credenciales inválidas"}))
    }
}

async fn cashflow(req: HttpRequest, seen: web::Data<Seen>) -> HttpResponse {
    seen.record(&req);
    HttpResponse::Ok().json(2400.5)
}

/// Starts the fake backend on an ephemeral port.
///
/// Must be called from inside an actix system (`#[actix_web::test]`).
pub fn start() -> FakeBackend {
    let seen = Seen::default();
    let data = web::Data::new(seen.clone());

    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .route("/api/clients", web::get().to(clients))
            .route("/api/clients", web::post().to(create_client))
            .route("/api/clients/{id}/{action}", web::post().to(client_command))
            .route("/api/payments", web::get().to(payments))
            .route("/api/reports/cashflow", web::get().to(cashflow))
            .route("/auth/login", web::post().to(login))
    })
    .workers(1)
    .disable_signals()
    .bind(("127.0.0.1", 0))
    .unwrap();

    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());

    FakeBackend {
        url: format!("http://{addr}"),
        seen,
    }
}

/// Address nothing listens on.
pub fn dead_backend_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
