//! Live adapters for real external interactions.

pub mod clock;
pub mod credentials;
pub mod http_store;

pub use clock::LiveClock;
pub use credentials::FileCredentialStore;
pub use http_store::HttpTaskStore;
