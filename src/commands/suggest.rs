//! `taskdeck suggest` command.

use crate::context::AppContext;
use crate::model::TaskId;

use super::{open_board, print_notices};

/// Execute the `suggest` command.
///
/// Prints the advisory next state. With `accept`, applies it.
///
/// # Errors
///
/// Returns an error string if the task is unknown or a store call fails.
pub async fn run(ctx: &AppContext, id: TaskId, accept: bool) -> Result<(), String> {
    let mut board = open_board(ctx).await?;
    let decision = board.request_suggestion(id).await.map_err(|e| e.to_string())?;
    println!("Suggested next state: {}", decision.next_state);
    if !decision.reason.is_empty() {
        println!("Reason: {}", decision.reason);
    }

    if accept {
        board.accept_suggestion().await.map_err(|e| e.to_string())?;
        print_notices(&mut board);
    } else {
        board.dismiss_suggestion();
        println!("\nRun again with --accept to apply it.");
    }
    Ok(())
}
