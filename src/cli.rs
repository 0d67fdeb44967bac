//! CLI argument definitions.

use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};

use crate::board::{Filter, SortOption};
use crate::model::{Priority, SubtaskId, TaskId, TaskState};

/// Top-level CLI parser for `taskdeck`.
#[derive(Debug, Parser)]
#[command(name = "taskdeck", version, about = "Manage tasks on a taskdeck server")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List tasks with progress.
    List {
        /// Which tasks to show: all, active or completed.
        #[arg(long, default_value_t = Filter::All)]
        filter: Filter,
        /// Order within each state: default, due-date or priority.
        #[arg(long, default_value_t = SortOption::Default)]
        sort: SortOption,
    },
    /// Create a task.
    Add {
        /// Task title.
        title: String,
        /// Longer description.
        #[arg(long)]
        description: Option<String>,
        /// Due date (YYYY-MM-DD).
        #[arg(long)]
        due: Option<NaiveDate>,
        /// Priority: low, medium or high.
        #[arg(long, default_value_t = Priority::Medium)]
        priority: Priority,
    },
    /// Flip a task between done and pending.
    Toggle {
        /// Task id.
        id: TaskId,
    },
    /// Move a task to a specific state.
    State {
        /// Task id.
        id: TaskId,
        /// Target state: pending, executing or done.
        state: TaskState,
    },
    /// Edit a task's title, due date or priority.
    Edit(EditArgs),
    /// Delete a task.
    Rm {
        /// Task id.
        id: TaskId,
    },
    /// Show one task with its subtasks and suggestion history.
    Show {
        /// Task id.
        id: TaskId,
    },
    /// Ask the service which state a task should move to next.
    Suggest {
        /// Task id.
        id: TaskId,
        /// Apply the suggestion immediately.
        #[arg(long)]
        accept: bool,
    },
    /// Work with the subtasks of a task.
    Subtask {
        /// Subtask operation.
        #[command(subcommand)]
        command: SubtaskCommand,
    },
    /// Log into an account and remember the token.
    Login(CredentialArgs),
    /// Create an account and remember the token.
    Register(CredentialArgs),
    /// Forget the saved token.
    Logout,
}

/// Arguments of `taskdeck edit`.
#[derive(Debug, Args)]
pub struct EditArgs {
    /// Task id.
    pub id: TaskId,
    /// New title.
    #[arg(long)]
    pub title: Option<String>,
    /// New due date (YYYY-MM-DD).
    #[arg(long, conflicts_with = "clear_due")]
    pub due: Option<NaiveDate>,
    /// Remove the due date.
    #[arg(long)]
    pub clear_due: bool,
    /// New priority.
    #[arg(long)]
    pub priority: Option<Priority>,
}

/// Email and password for `login` and `register`.
#[derive(Debug, Args)]
pub struct CredentialArgs {
    /// Account email.
    pub email: String,
    /// Account password.
    #[arg(long)]
    pub password: String,
}

/// Subtask operations.
#[derive(Debug, Subcommand)]
pub enum SubtaskCommand {
    /// List the subtasks of a task.
    List {
        /// Parent task id.
        task_id: TaskId,
    },
    /// Generate subtasks for a task with the AI helper.
    Generate {
        /// Parent task id.
        task_id: TaskId,
    },
    /// Flip a subtask's completion flag.
    Toggle {
        /// Parent task id.
        task_id: TaskId,
        /// Subtask id.
        subtask_id: SubtaskId,
    },
    /// Delete a subtask.
    Rm {
        /// Parent task id.
        task_id: TaskId,
        /// Subtask id.
        subtask_id: SubtaskId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_list_with_options() {
        let cli = Cli::parse_from(["taskdeck", "-vv", "list", "--filter", "active", "--sort", "priority"]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Command::List { filter: Filter::Active, sort: SortOption::Priority }
        ));
    }

    #[test]
    fn list_defaults_to_everything_in_server_order() {
        let cli = Cli::parse_from(["taskdeck", "list"]);
        assert!(matches!(cli.command, Command::List { filter: Filter::All, sort: SortOption::Default }));
    }

    #[test]
    fn parses_add_with_due_date() {
        let cli = Cli::parse_from(["taskdeck", "add", "Write report", "--due", "2024-03-01", "--priority", "high"]);
        let Command::Add { title, due, priority, description } = cli.command else {
            panic!("expected add");
        };
        assert_eq!(title, "Write report");
        assert_eq!(due, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(priority, Priority::High);
        assert_eq!(description, None);
    }

    #[test]
    fn parses_state_case_insensitively() {
        let cli = Cli::parse_from(["taskdeck", "state", "4", "executing"]);
        assert!(matches!(cli.command, Command::State { id: 4, state: TaskState::Executing }));
    }

    #[test]
    fn edit_rejects_due_with_clear_due() {
        let result = Cli::try_parse_from(["taskdeck", "edit", "1", "--due", "2024-01-01", "--clear-due"]);
        assert!(result.is_err());
    }

    #[test]
    fn parses_subtask_toggle() {
        let cli = Cli::parse_from(["taskdeck", "subtask", "toggle", "3", "9"]);
        assert!(matches!(
            cli.command,
            Command::Subtask { command: SubtaskCommand::Toggle { task_id: 3, subtask_id: 9 } }
        ));
    }

    #[test]
    fn rejects_bad_priority() {
        assert!(Cli::try_parse_from(["taskdeck", "add", "x", "--priority", "urgent"]).is_err());
    }
}
