//! Members table view.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::client::{Client, MembershipStatus};
use crate::domain::types::ClientId;
use crate::dto::ListState;

/// Raw filter inputs of the members table, exactly as typed or selected.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct ClientsQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub active: Option<String>,
    #[serde(default)]
    pub payment: Option<String>,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClientRow {
    pub id: ClientId,
    pub full_name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub active: bool,
    pub status: MembershipStatus,
    pub status_label: &'static str,
    pub start_date: Option<NaiveDate>,
    pub paused_from: Option<NaiveDate>,
    pub paused_to: Option<NaiveDate>,
    pub pause_reason: Option<String>,
    pub notes: Option<String>,
}

impl ClientRow {
    pub fn new(client: &Client, today: NaiveDate) -> Self {
        let status = client.derived_status(today);
        Self {
            id: client.id,
            full_name: client.full_name(),
            first_name: client.first_name.clone(),
            last_name: client.last_name.clone(),
            email: client.email.clone(),
            phone: client.phone.clone(),
            active: client.active,
            status,
            status_label: status.label(),
            start_date: client.start_date,
            paused_from: client.paused_from,
            paused_to: client.paused_to,
            pause_reason: client.pause_reason.clone(),
            notes: client.notes.clone(),
        }
    }
}

/// Members table with its load state and status counters.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClientsView {
    pub state: ListState,
    pub message: Option<String>,
    pub clients: Vec<ClientRow>,
    pub total: usize,
    pub active: usize,
    pub paused: usize,
    pub inactive: usize,
}

impl ClientsView {
    /// Builds the table; `filtered` picks the empty-state wording.
    pub fn loaded(clients: &[Client], today: NaiveDate, filtered: bool) -> Self {
        let rows: Vec<ClientRow> = clients.iter().map(|c| ClientRow::new(c, today)).collect();
        let count = |status| rows.iter().filter(|r| r.status == status).count();

        let (state, message) = match (rows.is_empty(), filtered) {
            (false, _) => (ListState::Loaded, None),
            (true, true) => (
                ListState::Empty,
                Some("No se encontraron clientes con esos filtros.".to_string()),
            ),
            (true, false) => (
                ListState::Empty,
                Some("No hay clientes registrados.".to_string()),
            ),
        };

        Self {
            state,
            message,
            total: rows.len(),
            active: count(MembershipStatus::Active),
            paused: count(MembershipStatus::Paused),
            inactive: count(MembershipStatus::Inactive),
            clients: rows,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            state: ListState::Failed,
            message: Some(message.into()),
            clients: Vec::new(),
            total: 0,
            active: 0,
            paused: 0,
            inactive: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::client::tests::{client, date};

    #[test]
    fn counts_derived_statuses() {
        let today = date(2024, 6, 10);
        let paused = Client {
            paused_from: Some(date(2024, 6, 1)),
            paused_to: Some(date(2024, 6, 30)),
            ..client(2, "Juan", "García", "juan@mail.com")
        };
        let inactive = Client {
            active: false,
            ..client(3, "Luis", "Rodríguez", "luis@mail.com")
        };
        let view = ClientsView::loaded(
            &[client(1, "Ana", "Pérez", "ana@mail.com"), paused, inactive],
            today,
            false,
        );

        assert_eq!(view.state, ListState::Loaded);
        assert_eq!((view.active, view.paused, view.inactive), (1, 1, 1));
        assert_eq!(view.clients[1].status_label, "Pausado");
    }

    #[test]
    fn empty_and_failed_are_distinct() {
        let empty = ClientsView::loaded(&[], date(2024, 1, 1), true);
        let failed = ClientsView::failed("Error de red. Intente nuevamente.");

        assert_eq!(empty.state, ListState::Empty);
        assert_eq!(
            empty.message.as_deref(),
            Some("No se encontraron clientes con esos filtros.")
        );
        assert_eq!(failed.state, ListState::Failed);
    }
}
