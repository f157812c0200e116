use actix_web::cookie::Cookie;
use actix_web::{HttpRequest, HttpResponse, Responder, post, web};
use serde::Serialize;

use crate::forms::auth::LoginForm;
use crate::models::config::ServerConfig;
use crate::routes::{Notice, backend, error_response};
use crate::services::{ServiceError, auth};

#[derive(Serialize)]
struct LoginResponse {
    token: String,
}

#[post("/login")]
pub async fn login(
    req: HttpRequest,
    http: web::Data<reqwest::Client>,
    server_config: web::Data<ServerConfig>,
    web::Json(form): web::Json<LoginForm>,
) -> impl Responder {
    let repo = backend(&req, &http, &server_config);

    match auth::login(&repo, &form).await {
        Ok(token) => {
            let cookie = Cookie::build(server_config.token_cookie.clone(), token.clone())
                .path("/")
                .http_only(true)
                .finish();
            HttpResponse::Ok().cookie(cookie).json(LoginResponse { token })
        }
        Err(err @ (ServiceError::Form(_) | ServiceError::Network(_))) => {
            error_response(&err, &server_config)
        }
        Err(err) => HttpResponse::Unauthorized().json(Notice::new(err.user_message())),
    }
}

#[post("/logout")]
pub async fn logout(
    req: HttpRequest,
    http: web::Data<reqwest::Client>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let repo = backend(&req, &http, &server_config);
    auth::logout(repo.gateway().tokens());

    let mut cookie = Cookie::new(server_config.token_cookie.clone(), "");
    cookie.set_path("/");
    cookie.make_removal();
    HttpResponse::Ok()
        .cookie(cookie)
        .json(Notice::new("Sesión cerrada."))
}
