//! Chest X-ray service endpoint tests.
//!
//! Drives the router in-process with deterministic model fixtures: the
//! fixture weights are all zero except the head biases, so the model's
//! output is exactly `softmax(head_biases)` for any uploaded image.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use medpredict_server::routes;
use medpredict_server::state::ChestState;
use medpredict_test_support::{write_chest_fixtures, xray_png_bytes};

const BOUNDARY: &str = "medpredict-test-boundary";

fn multipart_body(field: &str, filename: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn predict_request(field: &str, filename: &str, bytes: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(field, filename, bytes)))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Builds a router over fixtures with the given labels and head biases.
fn router_with(labels: &[&str], head_biases: &[f32]) -> Router {
    let dir = tempfile::tempdir().unwrap();
    write_chest_fixtures(dir.path(), labels, head_biases).unwrap();

    let state = Arc::new(ChestState::load(dir.path()));
    assert!(state.model_loaded(), "fixture model must load");
    routes::chest::router(state)
}

/// Router whose model artifacts are missing entirely.
fn degraded_router() -> Router {
    let dir = tempfile::tempdir().unwrap();
    routes::chest::router(Arc::new(ChestState::load(dir.path())))
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// === Health ===

#[tokio::test]
async fn test_health_reports_loaded_model() {
    let app = router_with(&["NORMAL", "PNEUMONIA"], &[0.0, 0.0]);
    let response = app.oneshot(get_request("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model_loaded"], true);
    assert_eq!(body["classes"], serde_json::json!(["NORMAL", "PNEUMONIA"]));
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_health_reports_missing_model() {
    let response = degraded_router()
        .oneshot(get_request("/health"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;

    assert_eq!(body["model_loaded"], false);
    assert_eq!(body["classes"], Value::Null);
}

// === Prediction ===

#[tokio::test]
async fn test_predict_pneumonia_with_high_severity() {
    // softmax([0, 2]) = [0.1192, 0.8808] -> PNEUMONIA at 88.08%.
    let app = router_with(&["NORMAL", "PNEUMONIA"], &[0.0, 2.0]);
    let image = xray_png_bytes(64, 64).unwrap();

    let response = app
        .oneshot(predict_request("image", "scan.png", &image))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;

    assert_eq!(body["success"], true);
    assert_eq!(body["prediction"]["diagnosis"], "PNEUMONIA");

    let confidence = body["prediction"]["confidence"].as_f64().unwrap();
    assert!((confidence - 88.08).abs() < 0.01, "confidence {confidence}");

    let normal = body["prediction"]["probabilities"]["normal"].as_f64().unwrap();
    let pneumonia = body["prediction"]["probabilities"]["pneumonia"]
        .as_f64()
        .unwrap();
    assert!((normal + pneumonia - 100.0).abs() < 0.02);

    // 88.08 >= 85 selects the HIGH tier.
    assert_eq!(body["medical_advice"]["severity"], "HIGH");
    assert_eq!(
        body["medical_advice"]["next_steps"],
        "URGENT: Contact healthcare provider immediately"
    );
    assert_eq!(body["medical_advice"]["diagnosis"], "PNEUMONIA");
}

#[tokio::test]
async fn test_predict_normal_with_normal_severity() {
    let app = router_with(&["NORMAL", "PNEUMONIA"], &[2.0, 0.0]);
    let image = xray_png_bytes(64, 64).unwrap();

    let response = app
        .oneshot(predict_request("image", "scan.jpg", &image))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;

    assert_eq!(body["prediction"]["diagnosis"], "NORMAL");
    assert_eq!(body["medical_advice"]["severity"], "NORMAL");
}

#[tokio::test]
async fn test_predict_tie_resolves_to_uncertain_normal() {
    // Equal biases give a 50/50 split: NORMAL by tie-break, UNCERTAIN tier.
    let app = router_with(&["NORMAL", "PNEUMONIA"], &[0.0, 0.0]);
    let image = xray_png_bytes(32, 32).unwrap();

    let response = app
        .oneshot(predict_request("image", "scan.png", &image))
        .await
        .unwrap();

    let body = json_body(response).await;

    assert_eq!(body["prediction"]["diagnosis"], "NORMAL");
    let confidence = body["prediction"]["confidence"].as_f64().unwrap();
    assert!((confidence - 50.0).abs() < 0.01);
    assert_eq!(body["medical_advice"]["severity"], "UNCERTAIN");
}

// === Input validation ===

#[tokio::test]
async fn test_predict_without_image_field() {
    let app = router_with(&["NORMAL", "PNEUMONIA"], &[0.0, 0.0]);

    let response = app
        .oneshot(predict_request("attachment", "scan.png", b"irrelevant"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "No image provided");
}

#[tokio::test]
async fn test_predict_with_empty_filename() {
    let app = router_with(&["NORMAL", "PNEUMONIA"], &[0.0, 0.0]);

    let response = app
        .oneshot(predict_request("image", "", b"irrelevant"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "No image selected");
}

#[tokio::test]
async fn test_predict_with_disallowed_extension() {
    let app = router_with(&["NORMAL", "PNEUMONIA"], &[0.0, 0.0]);

    let response = app
        .oneshot(predict_request("image", "scan.gif", b"irrelevant"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Invalid file type");
}

#[tokio::test]
async fn test_predict_with_undecodable_image_is_client_error() {
    let app = router_with(&["NORMAL", "PNEUMONIA"], &[0.0, 0.0]);

    let response = app
        .oneshot(predict_request("image", "scan.png", b"not an image"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Image preprocessing failed");
    assert!(body["details"].is_string());
}

// === Failure modes ===

#[tokio::test]
async fn test_predict_with_three_class_model_is_server_error() {
    // A mis-trained artifact with three classes breaks the binary contract.
    let app = router_with(&["NORMAL", "PNEUMONIA", "OTHER"], &[0.0, 0.0, 0.0]);
    let image = xray_png_bytes(32, 32).unwrap();

    let response = app
        .oneshot(predict_request("image", "scan.png", &image))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;

    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Unexpected model output shape");
    assert_eq!(body["details"], "Model returned 3 values instead of 2");
}

#[tokio::test]
async fn test_predict_without_model_is_service_unavailable() {
    let image = xray_png_bytes(32, 32).unwrap();

    let response = degraded_router()
        .oneshot(predict_request("image", "scan.png", &image))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Model not loaded");
}

// === Model info ===

#[tokio::test]
async fn test_model_info_static_fields() {
    let app = router_with(&["NORMAL", "PNEUMONIA"], &[0.0, 0.0]);

    let response = app.oneshot(get_request("/model-info")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;

    assert_eq!(body["model_type"], "Pneumonia Detection");
    assert_eq!(body["architecture"], "ResNet50 Transfer Learning");
    assert_eq!(body["input_size"], "224x224 pixels");
    assert_eq!(body["training_accuracy"], "81.24%");
    assert_eq!(body["classes"], serde_json::json!(["NORMAL", "PNEUMONIA"]));
}
