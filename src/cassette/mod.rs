//! Cassettes: YAML recordings of task store interactions.
//!
//! A cassette captures every store call of a session (operation, input,
//! and the `Ok`/`Err` result) so the session can be replayed later without
//! a server.

pub mod format;
pub mod recorder;
pub mod replayer;

pub use format::{Cassette, Interaction};
pub use recorder::CassetteRecorder;
pub use replayer::CassetteReplayer;
