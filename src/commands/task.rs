//! Task mutation commands: `add`, `toggle`, `state`, `edit`, `rm`.

use crate::cli::EditArgs;
use crate::context::AppContext;
use crate::error::BoardError;
use crate::model::{TaskDraft, TaskId, TaskState};

use super::{open_board, print_notices};

/// Execute the `add` command.
///
/// # Errors
///
/// Returns an error string if the title is blank or the store rejects the
/// task.
pub async fn add(ctx: &AppContext, draft: TaskDraft) -> Result<(), String> {
    let mut board = open_board(ctx).await?;
    let task = board.add(draft).await.map_err(|e| e.to_string())?;
    print_notices(&mut board);
    println!("Created task {}.", task.id);
    Ok(())
}

/// Execute the `toggle` command.
///
/// # Errors
///
/// Returns an error string if the task is unknown or the update fails.
pub async fn toggle(ctx: &AppContext, id: TaskId) -> Result<(), String> {
    let mut board = open_board(ctx).await?;
    board.toggle_complete(id).await.map_err(|e| e.to_string())?;
    print_notices(&mut board);
    Ok(())
}

/// Execute the `state` command.
///
/// # Errors
///
/// Returns an error string if the task is unknown or the update fails.
pub async fn set_state(ctx: &AppContext, id: TaskId, state: TaskState) -> Result<(), String> {
    let mut board = open_board(ctx).await?;
    board.set_state(id, state).await.map_err(|e| e.to_string())?;
    print_notices(&mut board);
    Ok(())
}

/// Execute the `edit` command.
///
/// Only the given fields change; everything else keeps its current value.
///
/// # Errors
///
/// Returns an error string if nothing would change, the task is unknown,
/// or the save fails.
pub async fn edit(ctx: &AppContext, args: &EditArgs) -> Result<(), String> {
    if args.title.is_none() && args.due.is_none() && !args.clear_due && args.priority.is_none() {
        return Err("Nothing to change: pass --title, --due, --clear-due or --priority.".into());
    }

    let mut board = open_board(ctx).await?;
    board.start_edit(args.id).map_err(|e| e.to_string())?;
    let mut data = board
        .editing()
        .map(|session| session.data.clone())
        .ok_or_else(|| BoardError::NotEditing.to_string())?;
    if let Some(title) = &args.title {
        data.title.clone_from(title);
    }
    if args.clear_due {
        data.due_date = None;
    } else if let Some(due) = args.due {
        data.due_date = Some(due);
    }
    if let Some(priority) = args.priority {
        data.priority = priority;
    }
    board.set_edit_data(data).map_err(|e| e.to_string())?;

    board.save_edit().await.map_err(|e| e.to_string())?;
    print_notices(&mut board);
    Ok(())
}

/// Execute the `rm` command. Removing a task that no longer exists is not
/// an error.
///
/// # Errors
///
/// Returns an error string if the store refuses the delete.
pub async fn remove(ctx: &AppContext, id: TaskId) -> Result<(), String> {
    let mut board = open_board(ctx).await?;
    board.remove(id).await.map_err(|e| e.to_string())?;
    print_notices(&mut board);
    Ok(())
}
