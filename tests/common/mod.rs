#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use refuel_station::config::EnvironmentConfig;
use refuel_station::models::refueling::{NewRefuelingRecord, RefuelingRecord};
use refuel_station::repositories::RefuelingStore;
use refuel_station::routes::create_app;
use refuel_station::services::PhotoStore;
use refuel_station::state::AppState;
use refuel_station::utils::errors::AppError;

pub const ADMIN_PASSWORD: &str = "s3cret";
pub const ALLOWED_ORIGIN: &str = "http://pump.example";

/// `RefuelingStore` en memoria; asigna ids crecientes como SERIAL
#[derive(Default)]
pub struct MemoryRefuelingStore {
    records: Mutex<Vec<RefuelingRecord>>,
    fail_inserts: AtomicBool,
}

impl MemoryRefuelingStore {
    pub fn set_fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    pub fn records(&self) -> Vec<RefuelingRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl RefuelingStore for MemoryRefuelingStore {
    async fn ensure_schema(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn insert(&self, record: NewRefuelingRecord) -> Result<RefuelingRecord, AppError> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::Protocol(
                "connection refused".to_string(),
            )));
        }

        let mut records = self.records.lock().unwrap();
        let saved = RefuelingRecord {
            id: records.len() as i32 + 1,
            apartment_id: record.apartment_id,
            plate: record.plate,
            odometer_km: record.odometer_km,
            initial_reading: record.initial_reading,
            final_reading: record.final_reading,
            total_liters: record.total_liters,
            photo_odometer_path: Some(record.photo_odometer_path),
            photo_initial_path: Some(record.photo_initial_path),
            photo_final_path: Some(record.photo_final_path),
            created_at: chrono::Local::now().naive_local(),
        };
        records.push(saved.clone());
        Ok(saved)
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<RefuelingRecord>, AppError> {
        let records = self.records.lock().unwrap();
        Ok(records.iter().rev().take(limit as usize).cloned().collect())
    }
}

pub fn test_config(photo_dir: &Path) -> EnvironmentConfig {
    EnvironmentConfig {
        environment: "test".to_string(),
        port: 0,
        host: "127.0.0.1".to_string(),
        database_url: "postgres://unused@localhost/unused".to_string(),
        photo_dir: photo_dir.to_path_buf(),
        admin_password: ADMIN_PASSWORD.to_string(),
        jwt_secret: "test-jwt-secret".to_string(),
        admin_token_ttl_secs: 300,
        report_limit: 50,
        idle_session_ttl_secs: 600,
        cors_allowed_origins: vec![ALLOWED_ORIGIN.to_string()],
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<MemoryRefuelingStore>,
    pub photos: PhotoStore,
    _photo_dir: tempfile::TempDir,
}

pub fn build_test_app() -> TestApp {
    let photo_dir = tempfile::tempdir().unwrap();
    let store = Arc::new(MemoryRefuelingStore::default());
    let photos = PhotoStore::new(photo_dir.path());
    let state = AppState::new(test_config(photo_dir.path()), store.clone(), photos.clone());

    TestApp {
        router: create_app(state.clone()),
        state,
        store,
        photos,
        _photo_dir: photo_dir,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    pub async fn json(&self, method: Method, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn get(&self, uri: &str, bearer: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(Method::GET).uri(uri);
        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn upload_photo(&self, session: &str, stage: &str, generation: u64, bytes: &[u8]) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::PUT)
            .uri(format!("/api/wizard/sessions/{}/photos/{}?generation={}", session, stage, generation))
            .header(header::CONTENT_TYPE, "image/jpeg")
            .body(Body::from(bytes.to_vec()))
            .unwrap();
        self.send(request).await
    }

    /// Crear una sesión y devolver su id
    pub async fn new_session(&self) -> String {
        let (status, body) = self.json(Method::POST, "/api/wizard/sessions", Value::Null).await;
        assert_eq!(status, StatusCode::CREATED);
        body["data"]["session_id"].as_str().unwrap().to_string()
    }

    pub async fn admin_token(&self) -> String {
        let (status, body) = self
            .json(
                Method::POST,
                "/api/admin/login",
                serde_json::json!({ "password": ADMIN_PASSWORD }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body["data"]["token"].as_str().unwrap().to_string()
    }
}
