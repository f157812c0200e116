//! Session-scoped read cache of the last loaded members list.
//!
//! The cache only serves local lookups such as resolving typed text back to
//! client ids. It is replaced as a whole after every successful list fetch and
//! is never treated as authoritative: it is at most as fresh as that fetch.

use std::cell::RefCell;

use crate::domain::client::Client;
use crate::domain::types::ClientId;

#[derive(Debug, Default)]
pub struct ClientCache {
    clients: RefCell<Vec<Client>>,
}

impl ClientCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_clients(clients: Vec<Client>) -> Self {
        Self {
            clients: RefCell::new(clients),
        }
    }

    /// Swaps in a freshly fetched list, keeping its order.
    pub fn replace(&self, clients: Vec<Client>) {
        log::debug!("Client cache replaced with {} entries", clients.len());
        self.clients.replace(clients);
    }

    /// Runs `f` over the cached clients in fetch order.
    pub fn with_clients<T>(&self, f: impl FnOnce(&[Client]) -> T) -> T {
        f(&self.clients.borrow())
    }

    pub fn find(&self, id: ClientId) -> Option<Client> {
        self.clients.borrow().iter().find(|c| c.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.clients.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.borrow().is_empty()
    }
}
