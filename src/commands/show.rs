//! `taskdeck show` command.

use crate::board::{SubtaskPanel, Urgency};
use crate::context::AppContext;
use crate::model::{AiDecisionLog, Subtask, Task, TaskId};

use super::open_board;

/// Execute the `show` command.
///
/// Prints the task, its subtasks and its suggestion history. Subtasks and
/// history are best effort: if either cannot be loaded a note is printed
/// instead.
///
/// # Errors
///
/// Returns an error string if the task list cannot be loaded or the task
/// does not exist.
pub async fn run(ctx: &AppContext, id: TaskId) -> Result<(), String> {
    let mut board = open_board(ctx).await?;
    board.open_modal(id).map_err(|e| e.to_string())?;
    let task = board.selected_task().cloned().ok_or_else(|| format!("task {id} is not loaded"))?;

    print_task(&task, Urgency::now(&task, &*ctx.clock));

    let panel = SubtaskPanel::new(board.store());
    println!("\nSubtasks:");
    match panel.load(id).await {
        Ok(_) => print_subtasks(&panel.subtasks(id)),
        Err(e) => println!("  (unavailable: {e})"),
    }

    println!("\nSuggestion history:");
    match board.ai_logs(id).await {
        Ok(logs) => print_logs(&logs),
        Err(e) => println!("  (unavailable: {e})"),
    }
    Ok(())
}

fn print_task(task: &Task, urgency: Urgency) {
    println!("Task: {}", task.id);
    println!("Title: {}", task.title);
    if let Some(description) = &task.description {
        println!("Description: {description}");
    }
    println!("State: {}", task.state);
    println!("Priority: {}", task.priority);
    if let Some(due) = task.due_date {
        match urgency {
            Urgency::None => println!("Due: {due}"),
            urgency => println!("Due: {due} ({urgency})"),
        }
    }
    if let Some(created) = task.created_at {
        println!("Created: {}", created.format("%Y-%m-%d %H:%M"));
    }
}

fn print_subtasks(subtasks: &[Subtask]) {
    if subtasks.is_empty() {
        println!("  (none)");
    }
    for subtask in subtasks {
        let mark = if subtask.completed { "x" } else { " " };
        println!("  [{mark}] {} {}", subtask.id, subtask.title);
    }
}

fn print_logs(logs: &[AiDecisionLog]) {
    if logs.is_empty() {
        println!("  (none)");
    }
    for log in logs {
        let when = log.created_at.map(|t| t.format("%Y-%m-%d %H:%M ").to_string()).unwrap_or_default();
        println!("  {when}{}: {}", log.suggested_state, log.reason);
    }
}
