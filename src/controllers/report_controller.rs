use crate::dto::api_response::ApiResponse;
use crate::dto::report_dto::ReportResponse;
use crate::services::report_service::build_report;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub struct ReportController {
    state: AppState,
}

impl ReportController {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Historial con los registros más recientes
    pub async fn recent(&self) -> Result<ApiResponse<ReportResponse>, AppError> {
        let records = self.state.store.list_recent(self.state.config.report_limit).await?;
        let empty = records.is_empty();
        let report = build_report(records, &self.state.photos).await;

        if empty {
            return Ok(ApiResponse::success_with_message(report, "No records found".to_string()));
        }
        Ok(ApiResponse::success(report))
    }
}
