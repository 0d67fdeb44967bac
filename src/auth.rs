//! Authentication context threaded into the store client.
//!
//! The context is created once per run from the persisted credential,
//! updated on login/register, and cleared on logout. Store calls read it
//! once at the start to choose between the authenticated and public
//! endpoint families.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::endpoints::Namespace;

/// Shared handle to the current bearer token, if any.
#[derive(Clone, Default)]
pub struct AuthContext {
    token: Arc<RwLock<Option<String>>>,
}

impl AuthContext {
    /// Creates a context holding `token`.
    #[must_use]
    pub fn new(token: Option<String>) -> Self {
        Self { token: Arc::new(RwLock::new(token.filter(|t| !t.trim().is_empty()))) }
    }

    /// Creates a context with no token.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Snapshot of the current token.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Returns true while a token is held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    /// Endpoint family matching the current token.
    #[must_use]
    pub fn namespace(&self) -> Namespace {
        self.session().0
    }

    /// Reads the token once and pairs it with its endpoint family, so a
    /// call never mixes a public path with a bearer header.
    #[must_use]
    pub fn session(&self) -> (Namespace, Option<String>) {
        let token = self.token();
        let ns = if token.is_some() { Namespace::Authenticated } else { Namespace::Public };
        (ns, token)
    }

    /// Stores a freshly issued token.
    pub fn set(&self, token: impl Into<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.into());
    }

    /// Forgets the token.
    pub fn clear(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContext").field("authenticated", &self.is_authenticated()).finish()
    }
}
