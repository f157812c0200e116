//! Storage for the bearer token issued at login.

use std::cell::RefCell;

/// Client-side persisted storage for the session token.
#[cfg_attr(any(test, feature = "test-mocks"), mockall::automock)]
pub trait TokenStore {
    /// Returns the stored token, if any.
    fn load(&self) -> Option<String>;
    /// Replaces the stored token.
    fn save(&self, token: &str);
    /// Forgets the stored token.
    fn clear(&self);
}

impl<T: TokenStore + ?Sized> TokenStore for &T {
    fn load(&self) -> Option<String> {
        (**self).load()
    }

    fn save(&self, token: &str) {
        (**self).save(token)
    }

    fn clear(&self) {
        (**self).clear()
    }
}

/// In-memory token holder for a single session.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RefCell<Option<String>>,
}

impl MemoryTokenStore {
    /// Seeds the store with a token carried by the incoming request.
    pub fn with_token(token: Option<String>) -> Self {
        Self {
            token: RefCell::new(token.filter(|t| !t.trim().is_empty())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    fn save(&self, token: &str) {
        self.token.replace(Some(token.to_string()));
    }

    fn clear(&self) {
        self.token.replace(None);
    }
}
