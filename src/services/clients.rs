//! Member listing and mutations.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::NaiveDate;

use crate::domain::client::{Client, PauseWindow, UpdateClient};
use crate::domain::filters::ClientFilters;
use crate::domain::types::{ClientId, TypeConstraintError};
use crate::forms::clients::ClientForm;
use crate::repository::{ClientReader, ClientWriter};
use crate::services::{ServiceError, ServiceResult};

/// Row action picked in the members table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClientAction {
    Edit,
    Pause,
    Resume,
    Activate,
    Deactivate,
}

impl ClientAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Edit => "edit",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Activate => "activate",
            Self::Deactivate => "deactivate",
        }
    }
}

impl Display for ClientAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientAction {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "edit" => Ok(Self::Edit),
            "pause" => Ok(Self::Pause),
            "resume" => Ok(Self::Resume),
            "activate" => Ok(Self::Activate),
            "deactivate" => Ok(Self::Deactivate),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown client action `{other}`"
            ))),
        }
    }
}

/// A validated mutation of one member.
#[derive(Clone, Debug, PartialEq)]
pub enum ClientCommand {
    Edit(UpdateClient),
    Pause {
        window: PauseWindow,
        reason: Option<String>,
    },
    Resume,
    Activate,
    Deactivate,
}

impl ClientCommand {
    pub fn action(&self) -> ClientAction {
        match self {
            Self::Edit(_) => ClientAction::Edit,
            Self::Pause { .. } => ClientAction::Pause,
            Self::Resume => ClientAction::Resume,
            Self::Activate => ClientAction::Activate,
            Self::Deactivate => ClientAction::Deactivate,
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            Self::Edit(_) => "Cliente actualizado.",
            Self::Pause { .. } => "Membresía pausada.",
            Self::Resume => "Membresía reanudada.",
            Self::Activate => "Cliente activado.",
            Self::Deactivate => "Cliente desactivado.",
        }
    }
}

/// Fetches the members list without touching any cache.
pub async fn fetch_clients<R>(repo: &R, filters: &ClientFilters) -> ServiceResult<Vec<Client>>
where
    R: ClientReader,
{
    repo.list_clients(filters).await.map_err(|err| {
        log::error!("Failed to list clients: {err}");
        ServiceError::from(err)
    })
}

pub async fn register_client<R>(
    repo: &R,
    form: ClientForm,
    today: NaiveDate,
) -> ServiceResult<Client>
where
    R: ClientWriter,
{
    let new_client = form.into_new_client(today)?;
    repo.create_client(&new_client).await.map_err(|err| {
        log::error!("Failed to register client {}: {err}", new_client.email);
        ServiceError::from(err)
    })
}

/// Sends `command` for client `id`.
pub async fn execute_command<R>(
    repo: &R,
    id: ClientId,
    command: &ClientCommand,
) -> ServiceResult<()>
where
    R: ClientWriter,
{
    let result = match command {
        ClientCommand::Edit(updates) => repo.update_client(id, updates).await.map(|_| ()),
        ClientCommand::Pause { window, reason } => {
            repo.pause_client(id, window, reason.as_deref()).await
        }
        ClientCommand::Resume => repo.resume_client(id).await,
        ClientCommand::Activate => repo.activate_client(id).await,
        ClientCommand::Deactivate => repo.deactivate_client(id).await,
    };

    result.map_err(|err| {
        log::error!("Client {id} {} failed: {err}", command.action());
        ServiceError::from(err)
    })?;
    log::info!("Client {id} {} done", command.action());
    Ok(())
}
