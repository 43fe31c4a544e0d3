mod common;

use std::time::{Duration, Instant};

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{build_test_app, TestApp};

async fn put(app: &TestApp, session: &str, field: &str, body: Value) -> (StatusCode, Value) {
    app.json(Method::PUT, &format!("/api/wizard/sessions/{}/{}", session, field), body)
        .await
}

/// Llena el asistente hasta la foto final
async fn fill_draft(app: &TestApp, session: &str, initial: &str, final_reading: &str) -> Value {
    let (status, _) = put(app, session, "plate", json!({ "generation": 0, "plate": "abc-1234" })).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = put(app, session, "odometer", json!({ "generation": 0, "odometer_km": 15000 })).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.upload_photo(session, "odometer", 0, b"dashboard").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = put(app, session, "initial-reading", json!({ "generation": 0, "value": initial })).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.upload_photo(session, "initial", 0, b"pump-start").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = put(app, session, "final-reading", json!({ "generation": 0, "value": final_reading })).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app.upload_photo(session, "final", 0, b"pump-end").await;
    assert_eq!(status, StatusCode::OK);
    body
}

#[tokio::test]
async fn test_new_session_starts_awaiting_plate() {
    let app = build_test_app();
    let (status, body) = app.json(Method::POST, "/api/wizard/sessions", Value::Null).await;

    assert_eq!(status, StatusCode::CREATED);
    let data = &body["data"];
    assert_eq!(data["state"], "awaiting_plate");
    assert_eq!(data["generation"], 0);
    assert_eq!(data["unlocked_fields"], json!(["plate"]));
    assert_eq!(data["can_save"], false);
}

#[tokio::test]
async fn test_full_refueling_is_saved() {
    let app = build_test_app();
    let session = app.new_session().await;

    let body = fill_draft(&app, &session, "120.50", "145.00").await;
    let data = &body["data"];
    assert_eq!(data["state"], "computed");
    assert_eq!(data["total_liters"], "24.50");
    assert_eq!(data["can_save"], true);
    assert_eq!(data["draft"]["plate"], "ABC-1234");

    let (status, body) = app
        .json(
            Method::POST,
            &format!("/api/wizard/sessions/{}/commit", session),
            json!({ "generation": 0 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["state"], "saved");
    assert_eq!(body["data"]["saved_record_id"], 1);

    let records = app.store.records();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.plate, "ABC-1234");
    assert_eq!(record.odometer_km, 15000);
    assert_eq!(record.initial_reading.to_string(), "120.50");
    assert_eq!(record.final_reading.to_string(), "145.00");
    assert_eq!(record.total_liters.to_string(), "24.50");
    assert_eq!(record.apartment_id, 1);

    let paths = [
        record.photo_odometer_path.clone().unwrap(),
        record.photo_initial_path.clone().unwrap(),
        record.photo_final_path.clone().unwrap(),
    ];
    assert!(paths[0].contains("KM_"));
    assert!(paths[1].contains("INI_"));
    assert!(paths[2].contains("FIM_"));
    assert_eq!(std::fs::read(&paths[2]).unwrap(), b"pump-end");

    // Guardar dos veces no duplica la fila
    let (status, _) = app
        .json(
            Method::POST,
            &format!("/api/wizard/sessions/{}/commit", session),
            json!({ "generation": 0 }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(app.store.records().len(), 1);
}

#[tokio::test]
async fn test_final_below_initial_offers_no_save() {
    let app = build_test_app();
    let session = app.new_session().await;

    let body = fill_draft(&app, &session, "120.00", "100.00").await;
    let data = &body["data"];
    assert_eq!(data["state"], "computed");
    assert_eq!(data["can_save"], false);
    assert!(data["total_liters"].is_null());
    assert!(data["warning"].as_str().unwrap().contains("greater"));

    let (status, _) = app
        .json(
            Method::POST,
            &format!("/api/wizard/sessions/{}/commit", session),
            json!({ "generation": 0 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(app.store.records().is_empty());

    // Corregir la lectura final recalcula el total
    let (status, body) = put(&app, &session, "final-reading", json!({ "generation": 0, "value": "130.00" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_liters"], "10.00");
    assert!(body["data"]["warning"].is_null());
}

#[tokio::test]
async fn test_final_reading_locked_before_initial_photo() {
    let app = build_test_app();
    let session = app.new_session().await;

    put(&app, &session, "plate", json!({ "generation": 0, "plate": "XYZ-9876" })).await;
    put(&app, &session, "odometer", json!({ "generation": 0, "odometer_km": 500 })).await;
    app.upload_photo(&session, "odometer", 0, b"dash").await;
    put(&app, &session, "initial-reading", json!({ "generation": 0, "value": "10.00" })).await;

    let (status, body) = put(&app, &session, "final-reading", json!({ "generation": 0, "value": "20.00" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    let (status, body) = app.upload_photo(&session, "final", 0, b"pump-end").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    let (_, body) = app.get(&format!("/api/wizard/sessions/{}", session), None).await;
    assert_eq!(body["data"]["state"], "awaiting_initial_photo");
    assert_eq!(body["data"]["draft"]["photos"]["final"], false);
}

#[tokio::test]
async fn test_reset_discards_draft_and_rejects_stale_input() {
    let app = build_test_app();
    let session = app.new_session().await;
    fill_draft(&app, &session, "1.00", "2.00").await;

    let (status, body) = app
        .json(Method::POST, &format!("/api/wizard/sessions/{}/reset", session), Value::Null)
        .await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["generation"], 1);
    assert_eq!(data["state"], "awaiting_plate");
    assert_eq!(data["draft"]["plate"], "");
    assert_eq!(data["draft"]["odometer_km"], 0);
    assert_eq!(data["draft"]["photos"]["odometer"], false);

    let (status, _) = put(&app, &session, "plate", json!({ "generation": 0, "plate": "OLD-0001" })).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = put(&app, &session, "plate", json!({ "generation": 1, "plate": "new-0002" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["draft"]["plate"], "NEW-0002");
}

#[tokio::test]
async fn test_insert_failure_keeps_draft_for_retry() {
    let app = build_test_app();
    let session = app.new_session().await;
    fill_draft(&app, &session, "120.50", "145.00").await;

    app.store.set_fail_inserts(true);
    let commit_uri = format!("/api/wizard/sessions/{}/commit", session);
    let (status, body) = app.json(Method::POST, &commit_uri, json!({ "generation": 0 })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "DB_ERROR");

    let (_, body) = app.get(&format!("/api/wizard/sessions/{}", session), None).await;
    assert_eq!(body["data"]["state"], "computed");
    assert_eq!(body["data"]["can_save"], true);

    app.store.set_fail_inserts(false);
    let (status, body) = app.json(Method::POST, &commit_uri, json!({ "generation": 0 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["state"], "saved");
    assert_eq!(app.store.records().len(), 1);
}

#[tokio::test]
async fn test_invalid_values_are_rejected() {
    let app = build_test_app();
    let session = app.new_session().await;

    let (status, body) = put(
        &app,
        &session,
        "plate",
        json!({ "generation": 0, "plate": "THIS-PLATE-IS-WAY-TOO-LONG" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    put(&app, &session, "plate", json!({ "generation": 0, "plate": "ABC" })).await;
    let (status, _) = put(&app, &session, "odometer", json!({ "generation": 0, "odometer_km": -1 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    put(&app, &session, "odometer", json!({ "generation": 0, "odometer_km": 1 })).await;
    let (status, _) = app.upload_photo(&session, "odometer", 0, b"").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_session() {
    let app = build_test_app();
    let (status, body) = app
        .get("/api/wizard/sessions/00000000-0000-0000-0000-000000000000", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_close_session() {
    let app = build_test_app();
    let session = app.new_session().await;
    let uri = format!("/api/wizard/sessions/{}", session);

    let (status, _) = app.json(Method::DELETE, &uri, Value::Null).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.get(&uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reading_above_column_capacity_is_rejected() {
    let app = build_test_app();
    let session = app.new_session().await;
    fill_draft(&app, &session, "120.50", "145.00").await;

    let (status, body) = put(
        &app,
        &session,
        "final-reading",
        json!({ "generation": 0, "value": "123456789012.00" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["details"]["final_reading"].is_array());

    let (_, body) = app.get(&format!("/api/wizard/sessions/{}", session), None).await;
    assert_eq!(body["data"]["total_liters"], "24.50");
    assert_eq!(body["data"]["can_save"], true);
}

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let app = build_test_app();
    let preflight = |origin: &str| {
        axum::http::Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/wizard/sessions")
            .header("origin", origin)
            .header("access-control-request-method", "POST")
            .body(axum::body::Body::empty())
            .unwrap()
    };

    let response = app.router.clone().oneshot(preflight(common::ALLOWED_ORIGIN)).await.unwrap();
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        common::ALLOWED_ORIGIN
    );

    let response = app.router.clone().oneshot(preflight("http://elsewhere.example")).await.unwrap();
    assert!(response.headers().get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn test_idle_sessions_are_evicted() {
    let app = build_test_app();
    let idle = app.new_session().await;
    let active = app.new_session().await;
    fill_draft(&app, &idle, "1.00", "2.00").await;

    let ttl = app.state.config.idle_session_ttl();
    let (status, _) = app.get(&format!("/api/wizard/sessions/{}", active), None).await;
    assert_eq!(status, StatusCode::OK);

    // Nada expira antes del TTL
    assert_eq!(app.state.evict_idle_sessions_at(Instant::now()).await, 0);
    assert_eq!(app.state.sessions.read().await.len(), 2);

    let later = Instant::now() + ttl + Duration::from_secs(1);
    assert_eq!(app.state.evict_idle_sessions_at(later).await, 2);
    assert!(app.state.sessions.read().await.is_empty());

    let (status, body) = app.get(&format!("/api/wizard/sessions/{}", idle), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_many_abandoned_sessions_do_not_accumulate() {
    let app = build_test_app();
    for _ in 0..100 {
        app.new_session().await;
    }
    assert_eq!(app.state.sessions.read().await.len(), 100);

    let ttl = app.state.config.idle_session_ttl();
    let evicted = app
        .state
        .evict_idle_sessions_at(Instant::now() + ttl + Duration::from_secs(1))
        .await;
    assert_eq!(evicted, 100);

    app.new_session().await;
    assert_eq!(app.state.sessions.read().await.len(), 1);
}
