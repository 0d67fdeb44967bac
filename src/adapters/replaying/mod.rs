//! Replaying adapters that serve recorded interactions.

pub mod task_store;

pub use task_store::ReplayingTaskStore;
