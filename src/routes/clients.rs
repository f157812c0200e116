use actix_web::{HttpRequest, HttpResponse, Responder, get, post, put, web};
use serde::Serialize;
use serde_json::Value;

use crate::domain::client::{Client, today};
use crate::domain::types::ClientId;
use crate::dto::clients::{ClientsQuery, ClientsView};
use crate::forms::FormError;
use crate::forms::clients::{ClientForm, PauseForm};
use crate::models::config::ServerConfig;
use crate::routes::{error_response, list_failure, panel_session};
use crate::services::clients::{ClientAction, ClientCommand};
use crate::services::{ServiceError, ServiceResult};

#[derive(Serialize)]
struct MutationResponse {
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    client: Option<Client>,
    #[serde(skip_serializing_if = "Option::is_none")]
    clients: Option<ClientsView>,
}

#[get("/clients")]
pub async fn list_clients(
    req: HttpRequest,
    params: web::Query<ClientsQuery>,
    http: web::Data<reqwest::Client>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let session = panel_session(&req, &http, &server_config);

    match session.load_clients(params.into_inner(), today()).await {
        Ok(_) => HttpResponse::Ok().json(session.clients_view()),
        Err(err) => list_failure(&err, session.clients_view(), &server_config),
    }
}

#[post("/clients")]
pub async fn register_client(
    req: HttpRequest,
    params: web::Query<ClientsQuery>,
    http: web::Data<reqwest::Client>,
    server_config: web::Data<ServerConfig>,
    web::Json(form): web::Json<ClientForm>,
) -> impl Responder {
    let session =
        panel_session(&req, &http, &server_config).with_clients_query(params.into_inner());

    match session.register_client(form, today()).await {
        Ok(client) => HttpResponse::Created().json(MutationResponse {
            message: "Cliente registrado.",
            client: Some(client),
            clients: session.clients_view(),
        }),
        Err(err) => error_response(&err, &server_config),
    }
}

#[put("/clients/{id}")]
pub async fn update_client(
    req: HttpRequest,
    path: web::Path<i64>,
    params: web::Query<ClientsQuery>,
    http: web::Data<reqwest::Client>,
    server_config: web::Data<ServerConfig>,
    web::Json(form): web::Json<ClientForm>,
) -> impl Responder {
    let command = form
        .into_update_client()
        .map(ClientCommand::Edit)
        .map_err(ServiceError::from);
    run_command(&req, path.into_inner(), command, params.into_inner(), &http, &server_config).await
}

/// Row actions; the query string carries the table filters to reload with.
#[post("/clients/{id}/{action}")]
pub async fn client_action(
    req: HttpRequest,
    path: web::Path<(i64, String)>,
    params: web::Query<ClientsQuery>,
    http: web::Data<reqwest::Client>,
    server_config: web::Data<ServerConfig>,
    body: Option<web::Json<Value>>,
) -> impl Responder {
    let (id, action) = path.into_inner();
    let command = action
        .parse::<ClientAction>()
        .map_err(ServiceError::from)
        .and_then(|action| build_command(action, body.map(web::Json::into_inner)));
    run_command(&req, id, command, params.into_inner(), &http, &server_config).await
}

fn build_command(action: ClientAction, body: Option<Value>) -> ServiceResult<ClientCommand> {
    let body = body.unwrap_or(Value::Null);
    let command = match action {
        ClientAction::Edit => {
            let form: ClientForm = serde_json::from_value(body)
                .map_err(|err| FormError::InvalidValue(err.to_string()))?;
            ClientCommand::Edit(form.into_update_client()?)
        }
        ClientAction::Pause => {
            let form: PauseForm = serde_json::from_value(body)
                .map_err(|_| FormError::InvalidValue("Indique el período de pausa.".into()))?;
            ClientCommand::Pause {
                window: form.window()?,
                reason: form.reason(),
            }
        }
        ClientAction::Resume => ClientCommand::Resume,
        ClientAction::Activate => ClientCommand::Activate,
        ClientAction::Deactivate => ClientCommand::Deactivate,
    };
    Ok(command)
}

async fn run_command(
    req: &HttpRequest,
    id: i64,
    command: ServiceResult<ClientCommand>,
    filters: ClientsQuery,
    http: &reqwest::Client,
    server_config: &ServerConfig,
) -> HttpResponse {
    let id = match ClientId::new(id) {
        Ok(id) => id,
        Err(err) => return error_response(&ServiceError::from(err), server_config),
    };
    let command = match command {
        Ok(command) => command,
        Err(err) => return error_response(&err, server_config),
    };

    let session = panel_session(req, http, server_config).with_clients_query(filters);
    match session.execute(id, command, today()).await {
        Ok(message) => HttpResponse::Ok().json(MutationResponse {
            message,
            client: None,
            clients: session.clients_view(),
        }),
        Err(err) => error_response(&err, server_config),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn pause_needs_a_window() {
        assert!(matches!(
            build_command(ClientAction::Pause, None),
            Err(ServiceError::Form(_))
        ));

        let command = build_command(
            ClientAction::Pause,
            Some(json!({"from": "2024-03-01", "to": "2024-03-07", "reason": "Viaje"})),
        )
        .unwrap();
        assert_eq!(command.action(), ClientAction::Pause);
    }

    #[test]
    fn inverted_pause_is_a_form_error() {
        let err = build_command(
            ClientAction::Pause,
            Some(json!({"from": "2024-01-10", "to": "2024-01-09"})),
        )
        .unwrap_err();
        assert_eq!(
            err.user_message(),
            "La fecha de fin no puede ser anterior a la de inicio."
        );
    }

    #[test]
    fn bodiless_actions_ignore_the_body() {
        assert_eq!(
            build_command(ClientAction::Resume, Some(json!({"x": 1}))).unwrap(),
            ClientCommand::Resume
        );
    }
}
