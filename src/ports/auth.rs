//! Account endpoints that issue bearer tokens.

use crate::model::{AuthToken, Credentials};

use super::task_store::StoreFuture;

/// Exchanges credentials for a bearer token.
pub trait AuthGateway: Send + Sync {
    /// Logs into an existing account.
    fn login(&self, credentials: &Credentials) -> StoreFuture<'_, AuthToken>;

    /// Creates an account and logs into it.
    fn register(&self, credentials: &Credentials) -> StoreFuture<'_, AuthToken>;
}
