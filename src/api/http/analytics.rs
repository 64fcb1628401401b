use axum::{Json, extract::State};

use crate::{
    app::state::AppState, dto::DataResponse, dto::analytics::AnalyticsResponse, error::AppError,
    usecases::analytics::AnalyticsService,
};

pub async fn get_analytics_handle(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<AnalyticsResponse>>, AppError> {
    let analytics = AnalyticsService::summary(&state.db).await?;
    Ok(Json(DataResponse::new(analytics)))
}
