use axum::{Json, extract::State, http::StatusCode};
use uuid::Uuid;

use crate::{
    api::http::extract::{ApiJson, ApiPath},
    app::state::AppState,
    dto::{
        DataResponse, SuccessResponse,
        labels::{CreateLabelRequest, UpdateLabelRequest},
    },
    error::AppError,
    models::labels::Label,
    usecases::labels::LabelService,
};

pub async fn list_labels_handle(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<Vec<Label>>>, AppError> {
    let labels = LabelService::list_labels(&state.db).await?;
    Ok(Json(DataResponse::new(labels)))
}

pub async fn create_label_handle(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateLabelRequest>,
) -> Result<(StatusCode, Json<DataResponse<Label>>), AppError> {
    let label = LabelService::create_label(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(label))))
}

pub async fn get_label_handle(
    State(state): State<AppState>,
    ApiPath(label_id): ApiPath<Uuid>,
) -> Result<Json<DataResponse<Label>>, AppError> {
    let label = LabelService::get_label(&state.db, label_id).await?;
    Ok(Json(DataResponse::new(label)))
}

pub async fn update_label_handle(
    State(state): State<AppState>,
    ApiPath(label_id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateLabelRequest>,
) -> Result<Json<DataResponse<Label>>, AppError> {
    let label = LabelService::update_label(&state.db, label_id, req).await?;
    Ok(Json(DataResponse::new(label)))
}

pub async fn delete_label_handle(
    State(state): State<AppState>,
    ApiPath(label_id): ApiPath<Uuid>,
) -> Result<Json<DataResponse<SuccessResponse>>, AppError> {
    LabelService::delete_label(&state.db, label_id).await?;
    Ok(Json(DataResponse::new(SuccessResponse::ok())))
}
