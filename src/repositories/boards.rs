use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    dto::boards::{BoardSummary, UpdateBoardRequest},
    error::AppError,
    kanban::analytics::StatusCounts,
    models::boards::Board,
};

#[derive(Debug, sqlx::FromRow)]
struct BoardStatsRow {
    #[sqlx(flatten)]
    board: Board,
    todo_count: i64,
    in_progress_count: i64,
    done_count: i64,
}

/// Fields of a board that passed validation.
#[derive(Debug, Clone)]
pub struct NewBoard {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub icon: Option<String>,
}

pub async fn list_boards_with_stats(pool: &PgPool) -> Result<Vec<BoardSummary>, AppError> {
    let rows = crate::log_query_fetch_all!(
        "boards.list_with_stats",
        sqlx::query_as::<_, BoardStatsRow>(
            r#"
                SELECT
                    b.*,
                    COUNT(t.id) FILTER (WHERE t.status = 'todo') AS todo_count,
                    COUNT(t.id) FILTER (WHERE t.status = 'in_progress') AS in_progress_count,
                    COUNT(t.id) FILTER (WHERE t.status = 'done') AS done_count
                FROM kanban.board b
                LEFT JOIN kanban.task t ON t.board_id = b.id
                GROUP BY b.id
                ORDER BY b.created_at DESC
            "#,
        )
        .fetch_all(pool)
    )?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let stats = StatusCounts {
                todo: row.todo_count,
                in_progress: row.in_progress_count,
                done: row.done_count,
            };
            BoardSummary::new(row.board, stats)
        })
        .collect())
}

pub async fn find_board(pool: &PgPool, board_id: Uuid) -> Result<Option<Board>, AppError> {
    let board = crate::log_query_fetch_optional!(
        "boards.find_by_id",
        sqlx::query_as::<_, Board>(
            r#"
                SELECT *
                FROM kanban.board
                WHERE id = $1
            "#,
        )
        .bind(board_id)
        .fetch_optional(pool)
    )?;

    Ok(board)
}

/// Takes the board row lock that serializes column appends on this board.
pub async fn lock_board(
    tx: &mut Transaction<'_, Postgres>,
    board_id: Uuid,
) -> Result<bool, AppError> {
    let locked = crate::log_query_fetch_optional!(
        "boards.lock",
        sqlx::query_scalar::<_, Uuid>(
            r#"
                SELECT id
                FROM kanban.board
                WHERE id = $1
                FOR UPDATE
            "#,
        )
        .bind(board_id)
        .fetch_optional(&mut **tx)
    )?;

    Ok(locked.is_some())
}

pub async fn create_board(pool: &PgPool, board: NewBoard) -> Result<Board, AppError> {
    let board = crate::log_query_fetch_one!(
        "boards.create",
        sqlx::query_as::<_, Board>(
            r#"
                INSERT INTO kanban.board (id, name, description, color, icon)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
            "#,
        )
        .bind(board.id)
        .bind(board.name)
        .bind(board.description)
        .bind(board.color)
        .bind(board.icon)
        .fetch_one(pool)
    )?;

    Ok(board)
}

pub async fn update_board(
    pool: &PgPool,
    board_id: Uuid,
    req: UpdateBoardRequest,
) -> Result<Option<Board>, AppError> {
    let board = crate::log_query_fetch_optional!(
        "boards.update",
        sqlx::query_as::<_, Board>(
            r#"
                UPDATE kanban.board
                SET
                    name = COALESCE($2, name),
                    description = CASE WHEN $3 THEN $4 ELSE description END,
                    color = COALESCE($5, color),
                    icon = CASE WHEN $6 THEN $7 ELSE icon END,
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
            "#,
        )
        .bind(board_id)
        .bind(req.name)
        .bind(req.description.is_some())
        .bind(req.description.flatten())
        .bind(req.color)
        .bind(req.icon.is_some())
        .bind(req.icon.flatten())
        .fetch_optional(pool)
    )?;

    Ok(board)
}

/// Deletes a board and, through cascades, its tasks with their subtasks and
/// label links. Returns the number of tasks removed, or `None` when the
/// board did not exist.
pub async fn delete_board(pool: &PgPool, board_id: Uuid) -> Result<Option<i64>, AppError> {
    let removed = crate::log_query_fetch_optional!(
        "boards.delete",
        sqlx::query_scalar::<_, i64>(
            r#"
                WITH removed AS (
                    DELETE FROM kanban.board
                    WHERE id = $1
                    RETURNING id
                )
                SELECT (
                    SELECT COUNT(*)
                    FROM kanban.task t
                    WHERE t.board_id = $1
                ) AS tasks_removed
                FROM removed
            "#,
        )
        .bind(board_id)
        .fetch_optional(pool)
    )?;

    Ok(removed)
}

pub async fn count_boards(pool: &PgPool) -> Result<i64, AppError> {
    let count = crate::log_query_fetch_one!(
        "boards.count",
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM kanban.board").fetch_one(pool)
    )?;

    Ok(count)
}

pub async fn list_boards_newest_first(pool: &PgPool) -> Result<Vec<Board>, AppError> {
    let boards = crate::log_query_fetch_all!(
        "boards.list_newest_first",
        sqlx::query_as::<_, Board>(
            r#"
                SELECT *
                FROM kanban.board
                ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
    )?;

    Ok(boards)
}
