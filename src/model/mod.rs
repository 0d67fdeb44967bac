//! Domain types exchanged with the task service.

pub mod ai;
pub mod auth;
pub mod subtask;
pub mod task;

pub use ai::{AiDecision, AiDecisionLog};
pub use auth::{AuthToken, Credentials};
pub use subtask::{GenerateSubtasksRequest, Subtask, SubtaskId};
pub use task::{EditData, Priority, Task, TaskDraft, TaskId, TaskPatch, TaskState};
