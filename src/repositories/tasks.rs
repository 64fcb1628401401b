use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    dto::analytics::{ActivityBoard, RecentActivity},
    error::AppError,
    models::tasks::{Task, TaskPriority, TaskStatus},
};

#[derive(Debug, sqlx::FromRow)]
struct RecentTaskRow {
    #[sqlx(flatten)]
    task: Task,
    board_name: String,
    board_color: String,
}

#[derive(Debug, sqlx::FromRow)]
struct StatusCountRow {
    status: String,
    count: i64,
}

#[derive(Debug, Clone)]
pub struct NewTask {
    pub id: Uuid,
    pub board_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
    pub assigned_to: Option<String>,
    pub position: i32,
}

/// Validated column changes for a task. `None` leaves a column untouched;
/// `Some(None)` clears a nullable one.
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub assigned_to: Option<Option<String>>,
    pub position: Option<i32>,
}

pub async fn find_task(pool: &PgPool, task_id: Uuid) -> Result<Option<Task>, AppError> {
    let task = crate::log_query_fetch_optional!(
        "tasks.find_by_id",
        sqlx::query_as::<_, Task>(
            r#"
                SELECT *
                FROM kanban.task
                WHERE id = $1
            "#,
        )
        .bind(task_id)
        .fetch_optional(pool)
    )?;

    Ok(task)
}

/// Reads a task inside a transaction. Call after the board lock is held so
/// the stored status cannot change underneath.
pub async fn find_task_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    task_id: Uuid,
) -> Result<Option<Task>, AppError> {
    let task = crate::log_query_fetch_optional!(
        "tasks.find_by_id_in_tx",
        sqlx::query_as::<_, Task>(
            r#"
                SELECT *
                FROM kanban.task
                WHERE id = $1
            "#,
        )
        .bind(task_id)
        .fetch_optional(&mut **tx)
    )?;

    Ok(task)
}

pub async fn find_board_id(
    tx: &mut Transaction<'_, Postgres>,
    task_id: Uuid,
) -> Result<Option<Uuid>, AppError> {
    let board_id = crate::log_query_fetch_optional!(
        "tasks.find_board_id",
        sqlx::query_scalar::<_, Uuid>(
            r#"
                SELECT board_id
                FROM kanban.task
                WHERE id = $1
            "#,
        )
        .bind(task_id)
        .fetch_optional(&mut **tx)
    )?;

    Ok(board_id)
}

/// Locks a task row. Serializes subtask appends and label replacement.
pub async fn lock_task(
    tx: &mut Transaction<'_, Postgres>,
    task_id: Uuid,
) -> Result<bool, AppError> {
    let locked = crate::log_query_fetch_optional!(
        "tasks.lock",
        sqlx::query_scalar::<_, Uuid>(
            r#"
                SELECT id
                FROM kanban.task
                WHERE id = $1
                FOR UPDATE
            "#,
        )
        .bind(task_id)
        .fetch_optional(&mut **tx)
    )?;

    Ok(locked.is_some())
}

/// Tasks in render order, optionally scoped to one board.
pub async fn list_tasks(pool: &PgPool, board_id: Option<Uuid>) -> Result<Vec<Task>, AppError> {
    let tasks = crate::log_query_fetch_all!(
        "tasks.list",
        sqlx::query_as::<_, Task>(
            r#"
                SELECT *
                FROM kanban.task
                WHERE ($1::uuid IS NULL OR board_id = $1)
                ORDER BY position ASC, created_at DESC
            "#,
        )
        .bind(board_id)
        .fetch_all(pool)
    )?;

    Ok(tasks)
}

/// Highest position in one `(board, status)` column, `None` when empty.
pub async fn max_position(
    tx: &mut Transaction<'_, Postgres>,
    board_id: Uuid,
    status: TaskStatus,
) -> Result<Option<i32>, AppError> {
    let max = crate::log_query_fetch_one!(
        "tasks.max_position",
        sqlx::query_scalar::<_, Option<i32>>(
            r#"
                SELECT MAX(position)
                FROM kanban.task
                WHERE board_id = $1
                  AND status = $2
            "#,
        )
        .bind(board_id)
        .bind(status)
        .fetch_one(&mut **tx)
    )?;

    Ok(max)
}

pub async fn insert_task(
    tx: &mut Transaction<'_, Postgres>,
    task: NewTask,
) -> Result<Task, AppError> {
    let task = crate::log_query_fetch_one!(
        "tasks.insert",
        sqlx::query_as::<_, Task>(
            r#"
                INSERT INTO kanban.task (
                    id,
                    board_id,
                    title,
                    description,
                    status,
                    priority,
                    due_date,
                    assigned_to,
                    position
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                RETURNING *
            "#,
        )
        .bind(task.id)
        .bind(task.board_id)
        .bind(task.title)
        .bind(task.description)
        .bind(task.status)
        .bind(task.priority)
        .bind(task.due_date)
        .bind(task.assigned_to)
        .bind(task.position)
        .fetch_one(&mut **tx)
    )?;

    Ok(task)
}

pub async fn update_task(
    tx: &mut Transaction<'_, Postgres>,
    task_id: Uuid,
    changes: TaskChanges,
) -> Result<Task, AppError> {
    let task = crate::log_query_fetch_one!(
        "tasks.update",
        sqlx::query_as::<_, Task>(
            r#"
                UPDATE kanban.task
                SET
                    title = COALESCE($2, title),
                    description = CASE WHEN $3 THEN $4 ELSE description END,
                    status = COALESCE($5, status),
                    priority = COALESCE($6, priority),
                    due_date = CASE WHEN $7 THEN $8 ELSE due_date END,
                    assigned_to = CASE WHEN $9 THEN $10 ELSE assigned_to END,
                    position = COALESCE($11, position),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
            "#,
        )
        .bind(task_id)
        .bind(changes.title)
        .bind(changes.description.is_some())
        .bind(changes.description.flatten())
        .bind(changes.status)
        .bind(changes.priority)
        .bind(changes.due_date.is_some())
        .bind(changes.due_date.flatten())
        .bind(changes.assigned_to.is_some())
        .bind(changes.assigned_to.flatten())
        .bind(changes.position)
        .fetch_one(&mut **tx)
    )?;

    Ok(task)
}

/// Deletes a task. Returns its board id, or `None` when it did not exist.
pub async fn delete_task(pool: &PgPool, task_id: Uuid) -> Result<Option<Uuid>, AppError> {
    let board_id = crate::log_query_fetch_optional!(
        "tasks.delete",
        sqlx::query_scalar::<_, Uuid>(
            r#"
                DELETE FROM kanban.task
                WHERE id = $1
                RETURNING board_id
            "#,
        )
        .bind(task_id)
        .fetch_optional(pool)
    )?;

    Ok(board_id)
}

pub async fn count_tasks(pool: &PgPool) -> Result<i64, AppError> {
    let count = crate::log_query_fetch_one!(
        "tasks.count",
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM kanban.task").fetch_one(pool)
    )?;

    Ok(count)
}

/// Grouped counts keyed by the raw status name.
pub async fn count_tasks_by_status(pool: &PgPool) -> Result<Vec<(String, i64)>, AppError> {
    let rows = crate::log_query_fetch_all!(
        "tasks.count_by_status",
        sqlx::query_as::<_, StatusCountRow>(
            r#"
                SELECT status::text AS status, COUNT(*) AS count
                FROM kanban.task
                GROUP BY status
            "#,
        )
        .fetch_all(pool)
    )?;

    Ok(rows.into_iter().map(|row| (row.status, row.count)).collect())
}

pub async fn list_recently_updated(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<RecentActivity>, AppError> {
    let rows = crate::log_query_fetch_all!(
        "tasks.list_recently_updated",
        sqlx::query_as::<_, RecentTaskRow>(
            r#"
                SELECT
                    t.*,
                    b.name AS board_name,
                    b.color AS board_color
                FROM kanban.task t
                JOIN kanban.board b ON b.id = t.board_id
                ORDER BY t.updated_at DESC
                LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(pool)
    )?;

    Ok(rows
        .into_iter()
        .map(|row| RecentActivity {
            board: ActivityBoard {
                id: row.task.board_id,
                name: row.board_name,
                color: row.board_color,
            },
            task: row.task,
        })
        .collect())
}

pub async fn list_tasks_newest_first(pool: &PgPool) -> Result<Vec<Task>, AppError> {
    let tasks = crate::log_query_fetch_all!(
        "tasks.list_newest_first",
        sqlx::query_as::<_, Task>(
            r#"
                SELECT *
                FROM kanban.task
                ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
    )?;

    Ok(tasks)
}
