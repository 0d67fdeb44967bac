//! Client-side state of the task board.
//!
//! The controller owns the task collection and all mutations of it; the
//! view functions derive what is displayed; the subtask panel and click
//! detector cover the detail interactions.

pub mod click;
pub mod controller;
pub mod subtasks;
pub mod urgency;
pub mod view;

#[cfg(test)]
pub(crate) mod fake;

pub use click::{Activation, ClickDetector, ClickKind, DOUBLE_CLICK_WINDOW};
pub use controller::{EditSession, LoadingHandle, Notice, NoticeLevel, Suggestion, TaskListController};
pub use subtasks::{LoadOutcome, SubtaskPanel};
pub use urgency::Urgency;
pub use view::{progress, visible_tasks, Filter, Progress, SortOption};
