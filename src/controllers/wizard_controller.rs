use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::dto::api_response::ApiResponse;
use crate::dto::wizard_dto::WizardSessionResponse;
use crate::models::draft::PhotoStage;
use crate::services::wizard_service::WizardSession;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub struct WizardController {
    state: AppState,
}

impl WizardController {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub async fn create(&self) -> Result<WizardSessionResponse, AppError> {
        let (id, session) = self.state.create_session().await;
        let session = session.lock().await;
        Ok(WizardSessionResponse::from_session(id, &session))
    }

    pub async fn get(&self, id: Uuid) -> Result<WizardSessionResponse, AppError> {
        let session = self.state.session(id).await?;
        let session = session.lock().await;
        Ok(WizardSessionResponse::from_session(id, &session))
    }

    pub async fn set_plate(&self, id: Uuid, generation: u64, plate: String) -> Result<WizardSessionResponse, AppError> {
        self.update(id, |session| session.set_plate(generation, &plate)).await
    }

    pub async fn set_odometer(&self, id: Uuid, generation: u64, odometer_km: i32) -> Result<WizardSessionResponse, AppError> {
        self.update(id, |session| session.set_odometer(generation, odometer_km)).await
    }

    pub async fn set_initial_reading(&self, id: Uuid, generation: u64, value: Decimal) -> Result<WizardSessionResponse, AppError> {
        self.update(id, |session| session.set_initial_reading(generation, value)).await
    }

    pub async fn set_final_reading(&self, id: Uuid, generation: u64, value: Decimal) -> Result<WizardSessionResponse, AppError> {
        self.update(id, |session| session.set_final_reading(generation, value)).await
    }

    pub async fn attach_photo(
        &self,
        id: Uuid,
        generation: u64,
        stage: PhotoStage,
        image: Vec<u8>,
    ) -> Result<WizardSessionResponse, AppError> {
        self.update(id, |session| session.attach_photo(generation, stage, image)).await
    }

    /// Guardar el abastecimiento: fotos al disco y fila a la base de datos
    ///
    /// Si algo falla el borrador queda intacto y el usuario puede reintentar.
    pub async fn commit(&self, id: Uuid, generation: u64) -> Result<ApiResponse<WizardSessionResponse>, AppError> {
        let shared = self.state.session(id).await?;
        let mut session = shared.lock().await;

        let completed = session.completed(generation)?;
        let photos = &self.state.photos;

        let [odometer, initial, final_] = completed.photos();
        let photo_odometer_path = photos.save(odometer.1, odometer.0.label()).await?;
        let photo_initial_path = photos.save(initial.1, initial.0.label()).await?;
        let photo_final_path = photos.save(final_.1, final_.0.label()).await?;

        let new_record = completed.into_new_record(photo_odometer_path, photo_initial_path, photo_final_path);
        let record = match self.state.store.insert(new_record).await {
            Ok(record) => record,
            Err(e) => {
                warn!("⚠️ No se pudo guardar el abastecimiento de la sesión {}: {}", id, e);
                return Err(e);
            }
        };

        info!("✅ Sesión {} guardada como registro {} ({} L)", id, record.id, record.total_liters);
        session.mark_saved(record);

        Ok(ApiResponse::success_with_message(
            WizardSessionResponse::from_session(id, &session),
            "Record saved successfully".to_string(),
        ))
    }

    pub async fn reset(&self, id: Uuid) -> Result<WizardSessionResponse, AppError> {
        let shared = self.state.session(id).await?;
        let mut session = shared.lock().await;
        let generation = session.reset();
        info!("🔄 Sesión {} reiniciada (generación {})", id, generation);
        Ok(WizardSessionResponse::from_session(id, &session))
    }

    pub async fn close(&self, id: Uuid) -> Result<(), AppError> {
        self.state.remove_session(id).await
    }

    async fn update(
        &self,
        id: Uuid,
        apply: impl FnOnce(&mut WizardSession) -> Result<(), AppError>,
    ) -> Result<WizardSessionResponse, AppError> {
        let shared = self.state.session(id).await?;
        let mut session = shared.lock().await;
        apply(&mut *session)?;
        Ok(WizardSessionResponse::from_session(id, &session))
    }
}
