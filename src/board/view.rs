//! Derived views of the task collection: filtering, sorting, progress.
//!
//! Everything here is a pure function of its inputs and never mutates the
//! collection it reads.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::model::Task;

/// Which tasks are shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Filter {
    /// Every task.
    #[default]
    All,
    /// Tasks that are not done.
    Active,
    /// Tasks that are done.
    Completed,
}

impl Filter {
    /// Returns true if `task` passes the filter.
    #[must_use]
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.is_completed(),
            Self::Completed => task.is_completed(),
        }
    }
}

impl FromStr for Filter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" | "done" => Ok(Self::Completed),
            other => Err(format!("unknown filter {other:?} (expected all, active or completed)")),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        })
    }
}

/// Secondary ordering applied within each state group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOption {
    /// Server order.
    #[default]
    Default,
    /// Earliest due date first; undated tasks last.
    DueDate,
    /// High, then medium, then low.
    Priority,
}

impl FromStr for SortOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "due" | "due-date" | "duedate" => Ok(Self::DueDate),
            "priority" => Ok(Self::Priority),
            other => Err(format!("unknown sort {other:?} (expected default, due-date or priority)")),
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Default => "default",
            Self::DueDate => "due-date",
            Self::Priority => "priority",
        })
    }
}

/// Filters then sorts `tasks`.
///
/// The sort is stable. Tasks are grouped by state (executing, pending,
/// done); within a group `sort` decides; for due-date and priority sorts,
/// ties go to the newest `created_at`, and tasks that still tie keep their
/// input order.
#[must_use]
pub fn visible_tasks(tasks: &[Task], filter: Filter, sort: SortOption) -> Vec<&Task> {
    let mut visible: Vec<&Task> = tasks.iter().filter(|task| filter.matches(task)).collect();
    visible.sort_by(|a, b| compare(a, b, sort));
    visible
}

fn compare(a: &Task, b: &Task, sort: SortOption) -> Ordering {
    let by_state = a.state.progress_rank().cmp(&b.state.progress_rank());
    match sort {
        SortOption::Default => by_state,
        SortOption::DueDate => by_state
            .then_with(|| due_date_order(a, b))
            .then_with(|| b.created_at.cmp(&a.created_at)),
        SortOption::Priority => by_state
            .then_with(|| a.priority.rank().cmp(&b.priority.rank()))
            .then_with(|| b.created_at.cmp(&a.created_at)),
    }
}

fn due_date_order(a: &Task, b: &Task) -> Ordering {
    match (a.due_date, b.due_date) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Completion summary of a task collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    /// Tasks in state `DONE`.
    pub completed: usize,
    /// All tasks.
    pub total: usize,
    /// `round(100 * completed / total)`, or 0 for an empty collection.
    pub percent: u8,
}

/// Computes [`Progress`] over every task, regardless of filter.
#[must_use]
pub fn progress(tasks: &[Task]) -> Progress {
    let total = tasks.len();
    let completed = tasks.iter().filter(|task| task.is_completed()).count();
    let percent = if total == 0 {
        0
    } else {
        // Integer round-half-up of 100 * completed / total.
        u8::try_from((completed * 200 + total) / (total * 2)).unwrap_or(100)
    };
    Progress { completed, total, percent }
}
