//! AI state suggestions and their audit log.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::task::{TaskId, TaskState};

/// Advisory next state computed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiDecision {
    /// Suggested next lifecycle state.
    pub next_state: TaskState,
    /// Human-readable justification.
    pub reason: String,
}

/// Read-only audit record of a past suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiDecisionLog {
    /// Log identity.
    pub id: i64,
    /// Task the suggestion was made for.
    pub task_id: TaskId,
    /// State that was suggested.
    pub suggested_state: TaskState,
    /// Justification given at the time.
    pub reason: String,
    /// When the suggestion was made.
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}
