use crate::error::AppError;
use crate::model::Task;
use crate::model::timestamp::format_timestamp;
use tabled::settings::Style;
use tabled::{Table, Tabled};

pub const EMPTY_LIST_MESSAGE: &str = "No tasks to display.";

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "End")]
    end: String,
    #[tabled(rename = "Name")]
    name: String,
}

/// Renders tasks with 1-based numbers matching what `done`, `update` and
/// `remove` accept.
pub fn task_table(tasks: &[Task]) -> Result<String, AppError> {
    if tasks.is_empty() {
        return Ok(EMPTY_LIST_MESSAGE.to_string());
    }

    let mut rows = Vec::with_capacity(tasks.len());
    for (offset, task) in tasks.iter().enumerate() {
        let name = if task.done {
            format!("{} (done)", task.name)
        } else {
            task.name.clone()
        };
        rows.push(TaskRow {
            index: offset + 1,
            start: optional_timestamp(task.start)?,
            end: optional_timestamp(task.end)?,
            name,
        });
    }

    let mut table = Table::new(rows);
    table.with(Style::psql());
    Ok(table.to_string())
}

fn optional_timestamp(value: Option<time::OffsetDateTime>) -> Result<String, AppError> {
    match value {
        Some(value) => format_timestamp(value),
        None => Ok("-".to_string()),
    }
}
