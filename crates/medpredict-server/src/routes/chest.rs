//! Chest X-ray service routes.
//!
//! `POST /predict` takes a multipart upload (field `image`), runs the
//! classifier, and attaches tiered medical advice. `GET /health` and
//! `GET /model-info` are read-only.

use std::path::Path;
use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use tracing::debug;

use medpredict_core::advisory::advisory_for;
use medpredict_core::encode::is_allowed_extension;
use medpredict_core::{Advisory, Prediction};

use crate::error::ApiError;
use crate::state::{ChestModel, ChestState};

/// Upload size cap for X-ray images.
const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Builds the chest X-ray service router.
pub fn router(state: Arc<ChestState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/predict", post(predict))
        .route("/model-info", get(model_info))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

/// `GET /health` response body.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    model_loaded: bool,
    classes: Option<Vec<String>>,
    timestamp: String,
}

async fn health(State(state): State<Arc<ChestState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        model_loaded: state.model_loaded(),
        classes: state.classes().map(<[String]>::to_vec),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// `POST /predict` success body.
#[derive(Debug, Serialize)]
struct PredictResponse {
    success: bool,
    prediction: Prediction,
    medical_advice: Advisory,
}

async fn predict(
    State(state): State<Arc<ChestState>>,
    multipart: Multipart,
) -> Result<Json<PredictResponse>, ApiError> {
    let model = state.model.as_ref().ok_or(ApiError::ModelNotLoaded)?;

    let bytes = read_image_field(multipart).await?;
    debug!("Received image upload of {} bytes", bytes.len());

    let image = model.encoder.decode(&bytes)?;
    let prediction = run_inference(model, &image)?;
    let medical_advice = advisory_for(prediction.diagnosis, prediction.confidence);

    Ok(Json(PredictResponse {
        success: true,
        prediction,
        medical_advice,
    }))
}

/// Extracts and validates the `image` multipart field.
async fn read_image_field(mut multipart: Multipart) -> Result<Vec<u8>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidInput(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_owned)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ApiError::InvalidInput("No image selected".to_string()))?;

        let ext = Path::new(&filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        if !is_allowed_extension(ext) {
            return Err(ApiError::InvalidInput("Invalid file type".to_string()));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidInput(format!("Failed to read image data: {e}")))?;

        return Ok(bytes.to_vec());
    }

    Err(ApiError::InvalidInput("No image provided".to_string()))
}

/// Encodes the image, runs the model, and derives the prediction.
fn run_inference(
    model: &ChestModel,
    image: &image::DynamicImage,
) -> Result<Prediction, ApiError> {
    let tensor = model.encoder.encode(image)?;
    let output = model.classifier.predict(&tensor)?;
    Ok(Prediction::from_output(&output)?)
}

/// `GET /model-info` response body.
///
/// Static metadata describing the trained artifact; figures come from the
/// training run, nothing is computed here.
#[derive(Debug, Serialize)]
struct ModelInfoResponse {
    model_type: &'static str,
    architecture: &'static str,
    classes: Option<Vec<String>>,
    input_size: &'static str,
    training_accuracy: &'static str,
    validation_accuracy: &'static str,
    f1_score: &'static str,
    model_size: &'static str,
}

async fn model_info(State(state): State<Arc<ChestState>>) -> Json<ModelInfoResponse> {
    Json(ModelInfoResponse {
        model_type: "Pneumonia Detection",
        architecture: "ResNet50 Transfer Learning",
        classes: state.classes().map(<[String]>::to_vec),
        input_size: "224x224 pixels",
        training_accuracy: "81.24%",
        validation_accuracy: "75%",
        f1_score: "73%",
        model_size: "92.02 MB",
    })
}
