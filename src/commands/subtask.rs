//! `taskdeck subtask` commands.

use crate::board::SubtaskPanel;
use crate::cli::SubtaskCommand;
use crate::context::AppContext;
use crate::model::{Subtask, TaskId};

use super::open_board;

/// Execute a `subtask` subcommand.
///
/// # Errors
///
/// Returns an error string if the parent task or subtask is unknown or a
/// store call fails.
pub async fn run(ctx: &AppContext, command: &SubtaskCommand) -> Result<(), String> {
    let panel = SubtaskPanel::new(ctx.store.clone());
    match command {
        SubtaskCommand::List { task_id } => {
            load(&panel, *task_id).await?;
            print_list(&panel.subtasks(*task_id));
        }
        SubtaskCommand::Generate { task_id } => {
            let board = open_board(ctx).await?;
            let task = board.task(*task_id).ok_or_else(|| format!("task {task_id} is not loaded"))?;
            let generated = panel.generate(task).await.map_err(|e| e.to_string())?;
            println!("Generated {} subtask(s):", generated.len());
            print_list(&generated);
        }
        SubtaskCommand::Toggle { task_id, subtask_id } => {
            load(&panel, *task_id).await?;
            let saved = panel.toggle(*task_id, *subtask_id).await.map_err(|e| e.to_string())?;
            let status = if saved.completed { "done" } else { "not done" };
            println!("Subtask {} marked {status}.", saved.id);
        }
        SubtaskCommand::Rm { task_id, subtask_id } => {
            panel.remove(*task_id, *subtask_id).await.map_err(|e| e.to_string())?;
            println!("Subtask deleted");
        }
    }
    Ok(())
}

async fn load(panel: &SubtaskPanel, task_id: TaskId) -> Result<(), String> {
    panel.load(task_id).await.map(|_| ()).map_err(|e| format!("Failed to load subtasks: {e}"))
}

fn print_list(subtasks: &[Subtask]) {
    if subtasks.is_empty() {
        println!("No subtasks.");
    }
    for subtask in subtasks {
        let mark = if subtask.completed { "x" } else { " " };
        println!("[{mark}] {:>4}  {}", subtask.id, subtask.title);
    }
}
