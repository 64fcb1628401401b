use axum::{
    extract::State,
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};

use crate::{
    api::http::extract::ApiQuery,
    app::state::AppState,
    dto::export::{ExportFormat, ExportQuery},
    error::AppError,
    usecases::export::ExportService,
};

/// Serves the export as a file attachment. The body is not enveloped.
pub async fn export_handle(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ExportQuery>,
) -> Result<Response, AppError> {
    let format = ExportFormat::parse(query.format.as_deref());
    let file = ExportService::export(&state.db, format).await?;

    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        file.filename
    ))
    .map_err(|err| AppError::Internal(format!("invalid export filename: {}", err)))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(file.content_type)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.body,
    )
        .into_response())
}
