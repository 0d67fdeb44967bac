//! Persisted bearer token.

use std::error::Error;

/// Stores the bearer token between runs.
///
/// The token is process-wide state: loaded once into the
/// [`AuthContext`](crate::auth::AuthContext) at startup, written on
/// login/register and removed on logout.
pub trait CredentialStore: Send + Sync {
    /// Returns the saved token, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn load(&self) -> Result<Option<String>, Box<dyn Error + Send + Sync>>;

    /// Saves `token`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn save(&self, token: &str) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Removes the saved token. Succeeds when nothing was saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be modified.
    fn clear(&self) -> Result<(), Box<dyn Error + Send + Sync>>;
}
