//! `taskdeck list` command.

use chrono::NaiveDate;

use crate::board::{Filter, Progress, SortOption, Urgency};
use crate::context::AppContext;
use crate::model::Task;

use super::open_board;

/// Execute the `list` command.
///
/// Prints the visible tasks as a table followed by overall progress.
///
/// # Errors
///
/// Returns an error string if the task list cannot be loaded.
pub async fn run(ctx: &AppContext, filter: Filter, sort: SortOption) -> Result<(), String> {
    let mut board = open_board(ctx).await?;
    board.set_filter(filter);
    board.set_sort(sort);

    let visible = board.visible_tasks();
    if visible.is_empty() {
        println!("No tasks found.");
    } else {
        print!("{}", format_table(&visible, ctx.clock.today()));
    }
    println!("\n{}", format_progress(board.progress()));
    Ok(())
}

/// Renders tasks as an aligned table, one row per task.
#[must_use]
pub fn format_table(tasks: &[&Task], today: NaiveDate) -> String {
    let rows: Vec<[String; 5]> = tasks
        .iter()
        .map(|task| {
            let due = match (task.due_date, Urgency::of(task, today)) {
                (None, _) => "-".to_string(),
                (Some(date), Urgency::None) => date.to_string(),
                (Some(date), urgency) => format!("{date} ({urgency})"),
            };
            [
                task.id.to_string(),
                task.state.to_string(),
                task.priority.to_string(),
                due,
                task.title.clone(),
            ]
        })
        .collect();

    let headers = ["ID", "STATE", "PRIORITY", "DUE", "TITLE"];
    let widths: Vec<usize> = (0..headers.len())
        .map(|col| rows.iter().map(|r| r[col].len()).max().unwrap_or(0).max(headers[col].len()))
        .collect();

    let mut out = String::new();
    push_row(&mut out, &headers.map(String::from), &widths);
    push_row(&mut out, &widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>(), &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> =
        cells.iter().zip(widths).map(|(cell, width)| format!("{cell:<width$}")).collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

/// One-line progress summary, e.g. `2/3 done (67%)`.
#[must_use]
pub fn format_progress(progress: Progress) -> String {
    format!("{}/{} done ({}%)", progress.completed, progress.total, progress.percent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::progress;
    use crate::model::{Priority, TaskState};

    fn task(id: i64, title: &str) -> Task {
        Task {
            id,
            title: title.to_string(),
            description: None,
            state: TaskState::Pending,
            due_date: None,
            priority: Priority::Medium,
            created_at: None,
        }
    }

    #[test]
    fn table_aligns_columns_and_marks_urgency() {
        let today: NaiveDate = "2024-06-15".parse().unwrap();
        let overdue = Task { due_date: "2024-06-01".parse().ok(), ..task(12, "File taxes") };
        let plain = Task { state: TaskState::Done, priority: Priority::High, ..task(3, "Call") };

        let table = format_table(&[&overdue, &plain], today);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("ID  STATE"));
        assert!(lines[2].contains("2024-06-01 (overdue)"));
        assert!(lines[2].ends_with("File taxes"));
        assert!(lines[3].starts_with("3   DONE"));
        assert!(lines[3].contains(" high "));
    }

    #[test]
    fn progress_line() {
        let tasks = vec![Task { state: TaskState::Done, ..task(1, "a") }, task(2, "b"), task(3, "c")];
        assert_eq!(format_progress(progress(&tasks)), "1/3 done (33%)");
        assert_eq!(format_progress(progress(&[])), "0/0 done (0%)");
    }
}
