use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    dto::boards::{BoardDetail, BoardSummary, CreateBoardRequest, UpdateBoardRequest},
    error::AppError,
    models::boards::{Board, DEFAULT_BOARD_ICON, palette_color_for},
    repositories::{boards as board_repo, tasks as task_repo},
    telemetry::BusinessEvent,
    usecases::{tasks::TaskService, validation},
};

pub struct BoardService;

impl BoardService {
    /// Dashboard listing, newest board first, with per-status counts.
    pub async fn list_boards(pool: &PgPool) -> Result<Vec<BoardSummary>, AppError> {
        board_repo::list_boards_with_stats(pool).await
    }

    pub async fn get_board(pool: &PgPool, board_id: Uuid) -> Result<BoardDetail, AppError> {
        let board = board_repo::find_board(pool, board_id)
            .await?
            .ok_or_else(board_not_found)?;
        let tasks = task_repo::list_tasks(pool, Some(board_id)).await?;
        let tasks = TaskService::with_relations(pool, tasks).await?;

        Ok(BoardDetail::new(board, tasks))
    }

    pub async fn create_board(pool: &PgPool, req: CreateBoardRequest) -> Result<Board, AppError> {
        let new_board = validate_new_board(Uuid::now_v7(), req)?;
        let board = board_repo::create_board(pool, new_board).await?;

        BusinessEvent::BoardCreated { board_id: board.id }.log();
        Ok(board)
    }

    pub async fn update_board(
        pool: &PgPool,
        board_id: Uuid,
        req: UpdateBoardRequest,
    ) -> Result<Board, AppError> {
        let req = validate_board_update(req)?;
        let fields = req.changed_fields();
        let board = board_repo::update_board(pool, board_id, req)
            .await?
            .ok_or_else(board_not_found)?;

        BusinessEvent::BoardUpdated { board_id, fields }.log();
        Ok(board)
    }

    pub async fn delete_board(pool: &PgPool, board_id: Uuid) -> Result<(), AppError> {
        let tasks_removed = board_repo::delete_board(pool, board_id)
            .await?
            .ok_or_else(board_not_found)?;

        BusinessEvent::BoardDeleted {
            board_id,
            tasks_removed,
        }
        .log();
        Ok(())
    }
}

pub(crate) fn board_not_found() -> AppError {
    AppError::NotFound("Board not found".to_string())
}

fn validate_new_board(
    board_id: Uuid,
    req: CreateBoardRequest,
) -> Result<board_repo::NewBoard, AppError> {
    let name = validation::required_text(
        req.name.as_deref(),
        validation::BOARD_NAME_MAX,
        "Board name is required",
        "Board name must be less than 100 characters",
    )?;
    let description = validation::optional_text(
        req.description,
        validation::BOARD_DESCRIPTION_MAX,
        "Description must be less than 500 characters",
    )?;
    let color = match req.color {
        Some(color) => validation::hex_color(&color)?,
        None => palette_color_for(board_id).to_string(),
    };
    let icon = validation::optional_text(
        req.icon,
        validation::BOARD_ICON_MAX,
        "Icon must be less than 50 characters",
    )?
    .or_else(|| Some(DEFAULT_BOARD_ICON.to_string()));

    Ok(board_repo::NewBoard {
        id: board_id,
        name,
        description,
        color,
        icon,
    })
}

fn validate_board_update(req: UpdateBoardRequest) -> Result<UpdateBoardRequest, AppError> {
    let name = match req.name {
        Some(name) => Some(validation::required_text(
            Some(&name),
            validation::BOARD_NAME_MAX,
            "Board name is required",
            "Board name must be less than 100 characters",
        )?),
        None => None,
    };
    let description = validation::optional_patch_text(
        req.description,
        validation::BOARD_DESCRIPTION_MAX,
        "Description must be less than 500 characters",
    )?;
    let color = match req.color {
        Some(color) => Some(validation::hex_color(&color)?),
        None => None,
    };
    let icon = validation::optional_patch_text(
        req.icon,
        validation::BOARD_ICON_MAX,
        "Icon must be less than 50 characters",
    )?;

    Ok(UpdateBoardRequest {
        name,
        description,
        color,
        icon,
    })
}
