//! Port traits defining external boundaries.
//!
//! Each trait separates the board from one external system (the task
//! service, the auth endpoints, persisted credentials, time).
//! Implementations live in `src/adapters/`.

pub mod auth;
pub mod clock;
pub mod credentials;
pub mod task_store;

pub use auth::AuthGateway;
pub use clock::Clock;
pub use credentials::CredentialStore;
pub use task_store::{StoreFuture, TaskStore};
