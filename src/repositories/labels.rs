use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::labels::{Label, TaskLabel},
};

pub const DUPLICATE_LABEL_MESSAGE: &str = "A label with this name already exists";

#[derive(Debug, sqlx::FromRow)]
struct TaskLabelRow {
    id: Uuid,
    task_id: Uuid,
    label_id: Uuid,
    created_at: DateTime<Utc>,
    label_name: String,
    label_color: String,
    label_created_at: DateTime<Utc>,
    label_updated_at: DateTime<Utc>,
}

impl From<TaskLabelRow> for TaskLabel {
    fn from(row: TaskLabelRow) -> Self {
        TaskLabel {
            id: row.id,
            task_id: row.task_id,
            label_id: row.label_id,
            created_at: row.created_at,
            label: Label {
                id: row.label_id,
                name: row.label_name,
                color: row.label_color,
                created_at: row.label_created_at,
                updated_at: row.label_updated_at,
            },
        }
    }
}

pub async fn list_labels(pool: &PgPool) -> Result<Vec<Label>, AppError> {
    let labels = crate::log_query_fetch_all!(
        "labels.list",
        sqlx::query_as::<_, Label>(
            r#"
                SELECT *
                FROM kanban.label
                ORDER BY name ASC
            "#,
        )
        .fetch_all(pool)
    )?;

    Ok(labels)
}

pub async fn find_label(pool: &PgPool, label_id: Uuid) -> Result<Option<Label>, AppError> {
    let label = crate::log_query_fetch_optional!(
        "labels.find_by_id",
        sqlx::query_as::<_, Label>(
            r#"
                SELECT *
                FROM kanban.label
                WHERE id = $1
            "#,
        )
        .bind(label_id)
        .fetch_optional(pool)
    )?;

    Ok(label)
}

/// Exact, case-sensitive name lookup.
pub async fn find_label_by_name(pool: &PgPool, name: &str) -> Result<Option<Label>, AppError> {
    let label = crate::log_query_fetch_optional!(
        "labels.find_by_name",
        sqlx::query_as::<_, Label>(
            r#"
                SELECT *
                FROM kanban.label
                WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(pool)
    )?;

    Ok(label)
}

pub async fn create_label(
    pool: &PgPool,
    label_id: Uuid,
    name: String,
    color: String,
) -> Result<Label, AppError> {
    crate::log_query_fetch_one!(
        "labels.create",
        sqlx::query_as::<_, Label>(
            r#"
                INSERT INTO kanban.label (id, name, color)
                VALUES ($1, $2, $3)
                RETURNING *
            "#,
        )
        .bind(label_id)
        .bind(name)
        .bind(color)
        .fetch_one(pool)
    )
    .map_err(map_label_unique_violation)
}

pub async fn update_label(
    pool: &PgPool,
    label_id: Uuid,
    name: Option<String>,
    color: Option<String>,
) -> Result<Option<Label>, AppError> {
    crate::log_query_fetch_optional!(
        "labels.update",
        sqlx::query_as::<_, Label>(
            r#"
                UPDATE kanban.label
                SET
                    name = COALESCE($2, name),
                    color = COALESCE($3, color),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
            "#,
        )
        .bind(label_id)
        .bind(name)
        .bind(color)
        .fetch_optional(pool)
    )
    .map_err(map_label_unique_violation)
}

pub async fn delete_label(pool: &PgPool, label_id: Uuid) -> Result<bool, AppError> {
    let result = crate::log_query_execute!(
        "labels.delete",
        sqlx::query(
            r#"
                DELETE FROM kanban.label
                WHERE id = $1
            "#,
        )
        .bind(label_id)
        .execute(pool)
    )?;

    Ok(result.rows_affected() > 0)
}

pub async fn count_existing(
    tx: &mut Transaction<'_, Postgres>,
    label_ids: &[Uuid],
) -> Result<i64, AppError> {
    let count = crate::log_query_fetch_one!(
        "labels.count_existing",
        sqlx::query_scalar::<_, i64>(
            r#"
                SELECT COUNT(*)
                FROM kanban.label
                WHERE id = ANY($1)
            "#,
        )
        .bind(label_ids)
        .fetch_one(&mut **tx)
    )?;

    Ok(count)
}

/// Replaces every label link of a task. `label_ids` must be free of
/// duplicates.
pub async fn replace_task_labels(
    tx: &mut Transaction<'_, Postgres>,
    task_id: Uuid,
    label_ids: &[Uuid],
) -> Result<(), AppError> {
    crate::log_query_execute!(
        "labels.clear_task_labels",
        sqlx::query(
            r#"
                DELETE FROM kanban.task_label
                WHERE task_id = $1
            "#,
        )
        .bind(task_id)
        .execute(&mut **tx)
    )?;

    if label_ids.is_empty() {
        return Ok(());
    }

    let link_ids: Vec<Uuid> = label_ids.iter().map(|_| Uuid::now_v7()).collect();
    crate::log_query_execute!(
        "labels.insert_task_labels",
        sqlx::query(
            r#"
                INSERT INTO kanban.task_label (id, task_id, label_id)
                SELECT link.id, $2, link.label_id
                FROM UNNEST($1::uuid[], $3::uuid[]) AS link (id, label_id)
            "#,
        )
        .bind(link_ids.as_slice())
        .bind(task_id)
        .bind(label_ids)
        .execute(&mut **tx)
    )?;

    Ok(())
}

pub async fn list_task_labels(
    pool: &PgPool,
    task_ids: &[Uuid],
) -> Result<Vec<TaskLabel>, AppError> {
    let rows = crate::log_query_fetch_all!(
        "labels.list_task_labels",
        sqlx::query_as::<_, TaskLabelRow>(
            r#"
                SELECT
                    tl.id,
                    tl.task_id,
                    tl.label_id,
                    tl.created_at,
                    l.name AS label_name,
                    l.color AS label_color,
                    l.created_at AS label_created_at,
                    l.updated_at AS label_updated_at
                FROM kanban.task_label tl
                JOIN kanban.label l ON l.id = tl.label_id
                WHERE tl.task_id = ANY($1)
                ORDER BY l.name ASC
            "#,
        )
        .bind(task_ids)
        .fetch_all(pool)
    )?;

    Ok(rows.into_iter().map(TaskLabel::from).collect())
}

fn map_label_unique_violation(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            if db_err.code().as_deref() == Some("23505") {
                return AppError::ValidationError(DUPLICATE_LABEL_MESSAGE.to_string());
            }
            AppError::Database(err)
        }
        _ => err.into(),
    }
}
