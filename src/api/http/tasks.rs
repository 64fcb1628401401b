use axum::{Json, extract::State, http::StatusCode};
use uuid::Uuid;

use crate::{
    api::http::extract::{ApiJson, ApiPath, ApiQuery},
    app::state::AppState,
    dto::{
        DataResponse, SuccessResponse,
        tasks::{
            CreateTaskRequest, ReplaceTaskLabelsRequest, TaskListQuery, TaskWithRelations,
            UpdateTaskRequest,
        },
    },
    error::AppError,
    models::{labels::TaskLabel, tasks::Task},
    usecases::tasks::TaskService,
};

pub async fn list_tasks_handle(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<TaskListQuery>,
) -> Result<Json<DataResponse<Vec<Task>>>, AppError> {
    let tasks = TaskService::list_tasks(&state.db, query).await?;
    Ok(Json(DataResponse::new(tasks)))
}

pub async fn create_task_handle(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateTaskRequest>,
) -> Result<(StatusCode, Json<DataResponse<Task>>), AppError> {
    let task = TaskService::create_task(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(task))))
}

pub async fn get_task_handle(
    State(state): State<AppState>,
    ApiPath(task_id): ApiPath<Uuid>,
) -> Result<Json<DataResponse<TaskWithRelations>>, AppError> {
    let task = TaskService::get_task(&state.db, task_id).await?;
    Ok(Json(DataResponse::new(task)))
}

pub async fn update_task_handle(
    State(state): State<AppState>,
    ApiPath(task_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateTaskRequest>,
) -> Result<Json<DataResponse<Task>>, AppError> {
    let task = TaskService::update_task(&state.db, task_id, req).await?;
    Ok(Json(DataResponse::new(task)))
}

pub async fn delete_task_handle(
    State(state): State<AppState>,
    ApiPath(task_id): ApiPath<Uuid>,
) -> Result<Json<DataResponse<SuccessResponse>>, AppError> {
    TaskService::delete_task(&state.db, task_id).await?;
    Ok(Json(DataResponse::new(SuccessResponse::ok())))
}

pub async fn replace_task_labels_handle(
    State(state): State<AppState>,
    ApiPath(task_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<ReplaceTaskLabelsRequest>,
) -> Result<Json<DataResponse<Vec<TaskLabel>>>, AppError> {
    let labels = TaskService::replace_labels(&state.db, task_id, req).await?;
    Ok(Json(DataResponse::new(labels)))
}
