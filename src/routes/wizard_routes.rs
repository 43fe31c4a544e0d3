use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::wizard_controller::WizardController;
use crate::dto::api_response::ApiResponse;
use crate::dto::wizard_dto::{
    GenerationRequest, PhotoUploadQuery, SetOdometerRequest, SetPlateRequest, SetReadingRequest,
    WizardSessionResponse,
};
use crate::models::draft::PhotoStage;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Tamaño máximo de una foto capturada
pub const MAX_PHOTO_BYTES: usize = 10 * 1024 * 1024;

pub fn create_wizard_router() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(create_session))
        .route("/sessions/:id", get(get_session))
        .route("/sessions/:id", delete(close_session))
        .route("/sessions/:id/plate", put(set_plate))
        .route("/sessions/:id/odometer", put(set_odometer))
        .route("/sessions/:id/initial-reading", put(set_initial_reading))
        .route("/sessions/:id/final-reading", put(set_final_reading))
        .route("/sessions/:id/photos/:stage", put(attach_photo))
        .route("/sessions/:id/commit", post(commit))
        .route("/sessions/:id/reset", post(reset))
        .layer(DefaultBodyLimit::max(MAX_PHOTO_BYTES))
}

type SessionResult = Result<Json<ApiResponse<WizardSessionResponse>>, AppError>;

async fn create_session(State(state): State<AppState>) -> Result<(StatusCode, Json<ApiResponse<WizardSessionResponse>>), AppError> {
    let response = WizardController::new(state).create().await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))))
}

async fn get_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> SessionResult {
    let response = WizardController::new(state).get(id).await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn close_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, AppError> {
    WizardController::new(state).close(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn set_plate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SetPlateRequest>,
) -> SessionResult {
    let response = WizardController::new(state)
        .set_plate(id, request.generation, request.plate)
        .await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn set_odometer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SetOdometerRequest>,
) -> SessionResult {
    let response = WizardController::new(state)
        .set_odometer(id, request.generation, request.odometer_km)
        .await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn set_initial_reading(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SetReadingRequest>,
) -> SessionResult {
    let response = WizardController::new(state)
        .set_initial_reading(id, request.generation, request.value)
        .await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn set_final_reading(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SetReadingRequest>,
) -> SessionResult {
    let response = WizardController::new(state)
        .set_final_reading(id, request.generation, request.value)
        .await?;
    Ok(Json(ApiResponse::success(response)))
}

// El cuerpo es la imagen capturada tal cual (image/jpeg)
async fn attach_photo(
    State(state): State<AppState>,
    Path((id, stage)): Path<(Uuid, PhotoStage)>,
    Query(query): Query<PhotoUploadQuery>,
    body: Bytes,
) -> SessionResult {
    let response = WizardController::new(state)
        .attach_photo(id, query.generation, stage, body.to_vec())
        .await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn commit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<GenerationRequest>,
) -> SessionResult {
    let response = WizardController::new(state).commit(id, request.generation).await?;
    Ok(Json(response))
}

async fn reset(State(state): State<AppState>, Path(id): Path<Uuid>) -> SessionResult {
    let response = WizardController::new(state).reset(id).await?;
    Ok(Json(ApiResponse::success_with_message(
        response,
        "Draft cleared".to_string(),
    )))
}
