//! Command dispatch and handlers.

pub mod auth;
pub mod list;
pub mod show;
pub mod subtask;
pub mod suggest;
pub mod task;

use crate::board::{NoticeLevel, TaskListController};
use crate::cli::Command;
use crate::config::Config;
use crate::context::AppContext;
use crate::model::TaskDraft;

/// Dispatch a parsed command to its handler.
///
/// Configuration comes from the environment. When `TASKDECK_RECORD` is set
/// every store call is recorded to that cassette; when `TASKDECK_REPLAY`
/// is set the store is served from that cassette instead of the network.
///
/// # Errors
///
/// Returns an error string if configuration is invalid or the selected
/// command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    let config = Config::from_env()?;
    let ctx = AppContext::from_config(&config)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to start async runtime: {e}"))?;

    // The context is dropped after the command, even on error, so a
    // recording is always written.
    runtime.block_on(dispatch_with_context(command, &ctx))
}

/// Dispatch a command with the given application context.
///
/// # Errors
///
/// Returns an error string if the command fails.
pub async fn dispatch_with_context(command: &Command, ctx: &AppContext) -> Result<(), String> {
    match command {
        Command::List { filter, sort } => list::run(ctx, *filter, *sort).await,
        Command::Add { title, description, due, priority } => {
            let draft = TaskDraft {
                description: description.clone(),
                due_date: *due,
                priority: *priority,
                ..TaskDraft::new(title.clone())
            };
            task::add(ctx, draft).await
        }
        Command::Toggle { id } => task::toggle(ctx, *id).await,
        Command::State { id, state } => task::set_state(ctx, *id, *state).await,
        Command::Edit(args) => task::edit(ctx, args).await,
        Command::Rm { id } => task::remove(ctx, *id).await,
        Command::Show { id } => show::run(ctx, *id).await,
        Command::Suggest { id, accept } => suggest::run(ctx, *id, *accept).await,
        Command::Subtask { command } => subtask::run(ctx, command).await,
        Command::Login(args) => auth::login(ctx, args).await,
        Command::Register(args) => auth::register(ctx, args).await,
        Command::Logout => auth::logout(ctx),
    }
}

/// Creates a controller over the context's store and loads the task list.
async fn open_board(ctx: &AppContext) -> Result<TaskListController, String> {
    let mut board = TaskListController::new(ctx.store.clone());
    board.refresh().await.map_err(|e| format!("Failed to load tasks: {e}"))?;
    Ok(board)
}

/// Prints success notices. Errors are returned to `main`, which prints them.
fn print_notices(board: &mut TaskListController) {
    for notice in board.take_notices() {
        if notice.level == NoticeLevel::Success {
            println!("{}", notice.message);
        }
    }
}
