use axum::{extract::State, routing::get, Json, Router};

use crate::controllers::report_controller::ReportController;
use crate::dto::api_response::ApiResponse;
use crate::dto::report_dto::ReportResponse;
use crate::middleware::auth::AdminSession;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_report_router() -> Router<AppState> {
    Router::new().route("/", get(recent_report))
}

async fn recent_report(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ReportResponse>>, AppError> {
    let response = ReportController::new(state).recent().await?;
    Ok(Json(response))
}
