//! Error types for store calls and board operations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{SubtaskId, TaskId};

/// Failure of a single remote store call.
///
/// Serializable so recorded cassettes can replay the exact failure.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum StoreError {
    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Transport(String),
    /// 401 or 403.
    #[error("authentication required (HTTP {status})")]
    Unauthorized {
        /// Response status code.
        status: u16,
    },
    /// 404.
    #[error("not found")]
    NotFound,
    /// Any other 4xx.
    #[error("request rejected (HTTP {status}): {message}")]
    Client {
        /// Response status code.
        status: u16,
        /// Server-provided message, or the raw body.
        message: String,
    },
    /// 5xx.
    #[error("server error (HTTP {status}): {message}")]
    Server {
        /// Response status code.
        status: u16,
        /// Server-provided message, or the raw body.
        message: String,
    },
    /// The response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
    /// The call was superseded and abandoned. Not a failure.
    #[error("request canceled")]
    Canceled,
    /// A replayed cassette could not serve the call.
    #[error("replay error: {0}")]
    Replay(String),
}

impl StoreError {
    /// Maps a non-success HTTP status and body to an error.
    #[must_use]
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => Self::Unauthorized { status },
            404 => Self::NotFound,
            400..=499 => Self::Client { status, message },
            _ => Self::Server { status, message },
        }
    }

    /// Returns true for [`StoreError::Canceled`].
    #[must_use]
    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::from_status(status.as_u16(), err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Failure of a task list controller operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// The underlying store call failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// A task cannot be created or saved with a blank title.
    #[error("title must not be empty")]
    EmptyTitle,
    /// The id is not in the current collection.
    #[error("task {0} is not loaded")]
    UnknownTask(TaskId),
    /// The subtask is not in the loaded list of its task.
    #[error("subtask {subtask_id} of task {task_id} is not loaded")]
    UnknownSubtask {
        /// Parent task.
        task_id: TaskId,
        /// Missing subtask.
        subtask_id: SubtaskId,
    },
    /// `save_edit` was called while no row was being edited.
    #[error("no task is being edited")]
    NotEditing,
    /// `accept_suggestion` was called without a pending suggestion.
    #[error("no suggestion to apply")]
    NoSuggestion,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_status_codes_to_taxonomy() {
        assert_eq!(StoreError::from_status(401, String::new()), StoreError::Unauthorized { status: 401 });
        assert_eq!(StoreError::from_status(403, String::new()), StoreError::Unauthorized { status: 403 });
        assert_eq!(StoreError::from_status(404, "gone".into()), StoreError::NotFound);
        assert!(matches!(StoreError::from_status(422, "bad".into()), StoreError::Client { status: 422, .. }));
        assert!(matches!(StoreError::from_status(503, "down".into()), StoreError::Server { status: 503, .. }));
    }

    #[test]
    fn only_canceled_is_canceled() {
        assert!(StoreError::Canceled.is_canceled());
        assert!(!StoreError::NotFound.is_canceled());
        assert!(!BoardError::from(StoreError::Transport("x".into())).to_string().is_empty());
    }
}
