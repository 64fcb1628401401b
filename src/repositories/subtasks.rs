use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{error::AppError, models::subtasks::Subtask};

pub async fn list_subtasks(pool: &PgPool, task_ids: &[Uuid]) -> Result<Vec<Subtask>, AppError> {
    let subtasks = crate::log_query_fetch_all!(
        "subtasks.list",
        sqlx::query_as::<_, Subtask>(
            r#"
                SELECT *
                FROM kanban.subtask
                WHERE task_id = ANY($1)
                ORDER BY position ASC, created_at ASC
            "#,
        )
        .bind(task_ids)
        .fetch_all(pool)
    )?;

    Ok(subtasks)
}

pub async fn max_position(
    tx: &mut Transaction<'_, Postgres>,
    task_id: Uuid,
) -> Result<Option<i32>, AppError> {
    let max = crate::log_query_fetch_one!(
        "subtasks.max_position",
        sqlx::query_scalar::<_, Option<i32>>(
            r#"
                SELECT MAX(position)
                FROM kanban.subtask
                WHERE task_id = $1
            "#,
        )
        .bind(task_id)
        .fetch_one(&mut **tx)
    )?;

    Ok(max)
}

pub async fn insert_subtask(
    tx: &mut Transaction<'_, Postgres>,
    subtask_id: Uuid,
    task_id: Uuid,
    title: String,
    position: i32,
) -> Result<Subtask, AppError> {
    let subtask = crate::log_query_fetch_one!(
        "subtasks.insert",
        sqlx::query_as::<_, Subtask>(
            r#"
                INSERT INTO kanban.subtask (id, task_id, title, position)
                VALUES ($1, $2, $3, $4)
                RETURNING *
            "#,
        )
        .bind(subtask_id)
        .bind(task_id)
        .bind(title)
        .bind(position)
        .fetch_one(&mut **tx)
    )?;

    Ok(subtask)
}

/// Updates a subtask scoped to its task. `None` when the pair does not match.
pub async fn update_subtask(
    pool: &PgPool,
    task_id: Uuid,
    subtask_id: Uuid,
    title: Option<String>,
    completed: Option<bool>,
    position: Option<i32>,
) -> Result<Option<Subtask>, AppError> {
    let subtask = crate::log_query_fetch_optional!(
        "subtasks.update",
        sqlx::query_as::<_, Subtask>(
            r#"
                UPDATE kanban.subtask
                SET
                    title = COALESCE($3, title),
                    completed = COALESCE($4, completed),
                    position = COALESCE($5, position),
                    updated_at = NOW()
                WHERE id = $2
                  AND task_id = $1
                RETURNING *
            "#,
        )
        .bind(task_id)
        .bind(subtask_id)
        .bind(title)
        .bind(completed)
        .bind(position)
        .fetch_optional(pool)
    )?;

    Ok(subtask)
}

pub async fn delete_subtask(
    pool: &PgPool,
    task_id: Uuid,
    subtask_id: Uuid,
) -> Result<bool, AppError> {
    let result = crate::log_query_execute!(
        "subtasks.delete",
        sqlx::query(
            r#"
                DELETE FROM kanban.subtask
                WHERE id = $2
                  AND task_id = $1
            "#,
        )
        .bind(task_id)
        .bind(subtask_id)
        .execute(pool)
    )?;

    Ok(result.rows_affected() > 0)
}
