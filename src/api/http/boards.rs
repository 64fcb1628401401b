use axum::{Json, extract::State, http::StatusCode};
use uuid::Uuid;

use crate::{
    api::http::extract::{ApiJson, ApiPath},
    app::state::AppState,
    dto::{
        DataResponse, SuccessResponse,
        boards::{BoardDetail, BoardSummary, CreateBoardRequest, UpdateBoardRequest},
    },
    error::AppError,
    models::boards::Board,
    usecases::boards::BoardService,
};

pub async fn list_boards_handle(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<Vec<BoardSummary>>>, AppError> {
    let boards = BoardService::list_boards(&state.db).await?;
    Ok(Json(DataResponse::new(boards)))
}

pub async fn create_board_handle(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateBoardRequest>,
) -> Result<(StatusCode, Json<DataResponse<Board>>), AppError> {
    let board = BoardService::create_board(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(board))))
}

pub async fn get_board_handle(
    State(state): State<AppState>,
    ApiPath(board_id): ApiPath<Uuid>,
) -> Result<Json<DataResponse<BoardDetail>>, AppError> {
    let board = BoardService::get_board(&state.db, board_id).await?;
    Ok(Json(DataResponse::new(board)))
}

pub async fn update_board_handle(
    State(state): State<AppState>,
    ApiPath(board_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateBoardRequest>,
) -> Result<Json<DataResponse<Board>>, AppError> {
    let board = BoardService::update_board(&state.db, board_id, req).await?;
    Ok(Json(DataResponse::new(board)))
}

pub async fn delete_board_handle(
    State(state): State<AppState>,
    ApiPath(board_id): ApiPath<Uuid>,
) -> Result<Json<DataResponse<SuccessResponse>>, AppError> {
    BoardService::delete_board(&state.db, board_id).await?;
    Ok(Json(DataResponse::new(SuccessResponse::ok())))
}
