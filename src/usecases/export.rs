use std::collections::HashMap;

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    dto::export::{ExportBoard, ExportDocument, ExportFormat, ExportTask},
    error::AppError,
    models::{boards::Board, tasks::Task},
    repositories::{boards as board_repo, tasks as task_repo},
    telemetry::BusinessEvent,
};

const CSV_HEADER: [&str; 12] = [
    "Board ID",
    "Board Name",
    "Board Description",
    "Board Color",
    "Task ID",
    "Task Title",
    "Task Description",
    "Status",
    "Priority",
    "Due Date",
    "Assigned To",
    "Created At",
];

/// A rendered export ready to be sent as an attachment.
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub content_type: &'static str,
    pub filename: String,
    pub body: String,
}

pub struct ExportService;

impl ExportService {
    pub async fn export(pool: &PgPool, format: ExportFormat) -> Result<ExportFile, AppError> {
        let (boards, tasks) = futures::try_join!(
            board_repo::list_boards_newest_first(pool),
            task_repo::list_tasks_newest_first(pool),
        )?;
        let now = Utc::now();
        let document = build_document(boards, tasks, now);

        let body = match format {
            ExportFormat::Json => serde_json::to_string_pretty(&document)?,
            ExportFormat::Csv => render_csv(&document),
        };

        BusinessEvent::DataExported {
            format: format.as_str(),
            boards: document.total_boards,
            tasks: document.total_tasks,
        }
        .log();

        Ok(ExportFile {
            content_type: match format {
                ExportFormat::Json => "application/json",
                ExportFormat::Csv => "text/csv",
            },
            filename: export_filename(format, now),
            body,
        })
    }
}

pub fn export_filename(format: ExportFormat, now: DateTime<Utc>) -> String {
    format!(
        "taskboard-export-{}.{}",
        now.format("%Y-%m-%d"),
        format.as_str()
    )
}

/// Nests tasks under their boards. Both inputs are expected newest first and
/// that order is preserved.
pub fn build_document(boards: Vec<Board>, tasks: Vec<Task>, now: DateTime<Utc>) -> ExportDocument {
    let mut tasks_by_board: HashMap<Uuid, Vec<ExportTask>> = HashMap::new();
    for task in tasks {
        tasks_by_board
            .entry(task.board_id)
            .or_default()
            .push(ExportTask::from(task));
    }

    let boards: Vec<ExportBoard> = boards
        .into_iter()
        .map(|board| {
            let tasks = tasks_by_board.remove(&board.id).unwrap_or_default();
            ExportBoard {
                id: board.id,
                name: board.name,
                description: board.description,
                color: board.color,
                icon: board.icon,
                created_at: board.created_at,
                updated_at: board.updated_at,
                tasks_count: tasks.len(),
                tasks,
            }
        })
        .collect();

    ExportDocument {
        exported_at: now,
        total_boards: boards.len(),
        total_tasks: boards.iter().map(|board| board.tasks_count).sum(),
        boards,
    }
}

/// One row per task. A board without tasks still gets a row with empty task
/// columns and the board's own creation time.
pub fn render_csv(document: &ExportDocument) -> String {
    let mut csv = CSV_HEADER.join(",");
    csv.push('\n');

    for board in &document.boards {
        let board_id = board.id.to_string();
        let board_columns = [
            board_id.as_str(),
            board.name.as_str(),
            board.description.as_deref().unwrap_or_default(),
            board.color.as_str(),
        ];

        if board.tasks.is_empty() {
            let created_at = timestamp(board.created_at);
            push_row(
                &mut csv,
                board_columns
                    .iter()
                    .copied()
                    .chain(["", "", "", "", "", "", ""])
                    .chain([created_at.as_str()]),
            );
            continue;
        }

        for task in &board.tasks {
            let task_id = task.id.to_string();
            let due_date = task.due_date.map(timestamp).unwrap_or_default();
            let created_at = timestamp(task.created_at);
            push_row(
                &mut csv,
                board_columns.iter().copied().chain([
                    task_id.as_str(),
                    task.title.as_str(),
                    task.description.as_deref().unwrap_or_default(),
                    task.status.as_str(),
                    task.priority.as_str(),
                    due_date.as_str(),
                    task.assigned_to.as_deref().unwrap_or_default(),
                    created_at.as_str(),
                ]),
            );
        }
    }

    csv
}

fn push_row<'a>(csv: &mut String, values: impl Iterator<Item = &'a str>) {
    let row: Vec<String> = values.map(quote).collect();
    csv.push_str(&row.join(","));
    csv.push('\n');
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}
