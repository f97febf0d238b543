//! Symptom service routes.
//!
//! `POST /predict` maps a symptom-name list to the classifier's feature
//! vector and returns the predicted disease. `GET /health` is read-only.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use medpredict_core::encode::encode_symptoms;

use crate::error::ApiError;
use crate::state::SymptomState;

/// Builds the symptom service router.
pub fn router(state: Arc<SymptomState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/predict", post(predict))
        .with_state(state)
}

/// `GET /health` response body.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    model_loaded: bool,
    timestamp: String,
}

async fn health(State(state): State<Arc<SymptomState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        model_loaded: state.model_loaded(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// `POST /predict` request body.
///
/// A missing `symptoms` key silently defaults to an empty list.
#[derive(Debug, Deserialize)]
struct PredictRequest {
    #[serde(default)]
    symptoms: Vec<String>,
}

/// `POST /predict` success body.
#[derive(Debug, Serialize)]
struct PredictResponse {
    predicted_disease: String,
}

async fn predict(
    State(state): State<Arc<SymptomState>>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    let model = state.model.as_ref().ok_or(ApiError::ModelNotLoaded)?;

    let features = encode_symptoms(&model.severity, &request.symptoms)?;
    debug!("Encoded {} symptoms: {features:?}", request.symptoms.len());

    let predicted = model.classifier.predict(&features)?;

    Ok(Json(PredictResponse {
        predicted_disease: predicted.to_string(),
    }))
}
