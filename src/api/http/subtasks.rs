use axum::{Json, extract::State, http::StatusCode};
use uuid::Uuid;

use crate::{
    api::http::extract::{ApiJson, ApiPath},
    app::state::AppState,
    dto::{
        DataResponse, SuccessResponse,
        subtasks::{CreateSubtaskRequest, UpdateSubtaskRequest},
    },
    error::AppError,
    models::subtasks::Subtask,
    usecases::subtasks::SubtaskService,
};

pub async fn list_subtasks_handle(
    State(state): State<AppState>,
    ApiPath(task_id): ApiPath<Uuid>,
) -> Result<Json<DataResponse<Vec<Subtask>>>, AppError> {
    let subtasks = SubtaskService::list_subtasks(&state.db, task_id).await?;
    Ok(Json(DataResponse::new(subtasks)))
}

pub async fn create_subtask_handle(
    State(state): State<AppState>,
    ApiPath(task_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<CreateSubtaskRequest>,
) -> Result<(StatusCode, Json<DataResponse<Subtask>>), AppError> {
    let subtask = SubtaskService::create_subtask(&state.db, task_id, req).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(subtask))))
}

pub async fn update_subtask_handle(
    State(state): State<AppState>,
    ApiPath((task_id, subtask_id)): ApiPath<(Uuid, Uuid)>,
    ApiJson(req): ApiJson<UpdateSubtaskRequest>,
) -> Result<Json<DataResponse<Subtask>>, AppError> {
    let subtask = SubtaskService::update_subtask(&state.db, task_id, subtask_id, req).await?;
    Ok(Json(DataResponse::new(subtask)))
}

pub async fn delete_subtask_handle(
    State(state): State<AppState>,
    ApiPath((task_id, subtask_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<Json<DataResponse<SuccessResponse>>, AppError> {
    SubtaskService::delete_subtask(&state.db, task_id, subtask_id).await?;
    Ok(Json(DataResponse::new(SuccessResponse::ok())))
}
