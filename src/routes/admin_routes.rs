use axum::{extract::State, routing::post, Json, Router};

use crate::controllers::admin_controller::AdminController;
use crate::dto::admin_dto::{AdminLoginRequest, AdminLoginResponse};
use crate::dto::api_response::ApiResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_admin_router() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<AdminLoginRequest>,
) -> Result<Json<ApiResponse<AdminLoginResponse>>, AppError> {
    let response = AdminController::new(state).login(request).await?;
    Ok(Json(ApiResponse::success(response)))
}
