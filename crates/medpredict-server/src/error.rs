//! HTTP error mapping.
//!
//! Every failure terminates its request with a JSON error body:
//! `{"success": false, "error": ..., "details": ...?}`. Nothing is
//! retried.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use medpredict_core::domain::OutputShapeError;
use medpredict_core::encode::{EncodeError, PreprocessError};
use serde::Serialize;
use tracing::{error, warn};

/// Request-terminating service error.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The model artifact failed to load at startup.
    #[error("Model not loaded")]
    ModelNotLoaded,

    /// The request payload is missing or invalid.
    #[error("{0}")]
    InvalidInput(String),

    /// The uploaded bytes could not be decoded as an image.
    #[error("Image preprocessing failed")]
    Preprocess(#[from] PreprocessError),

    /// The model produced an unexpected number of output values.
    #[error("Unexpected model output shape")]
    OutputShape(#[from] OutputShapeError),

    /// Anything else that went wrong during prediction.
    #[error("Prediction failed")]
    Prediction(#[from] anyhow::Error),
}

impl From<EncodeError> for ApiError {
    fn from(err: EncodeError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

/// JSON body for error responses.
#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::ModelNotLoaded => StatusCode::SERVICE_UNAVAILABLE,
            Self::InvalidInput(_) | Self::Preprocess(_) => StatusCode::BAD_REQUEST,
            Self::OutputShape(_) | Self::Prediction(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn details(&self) -> Option<String> {
        use std::error::Error as _;

        match self {
            Self::ModelNotLoaded | Self::InvalidInput(_) => None,
            // The decode error itself; the top-level message is the summary.
            Self::Preprocess(err) => err.source().map(|s| s.to_string()),
            Self::OutputShape(err) => Some(err.to_string()),
            Self::Prediction(err) => Some(format!("{err:#}")),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Prediction(err) => error!("Prediction failed: {err:#}"),
            Self::OutputShape(err) => error!("{err}"),
            other => warn!("Request rejected: {other}"),
        }

        let body = ErrorBody {
            success: false,
            error: self.to_string(),
            details: self.details(),
        };

        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn status_of(err: ApiError) -> StatusCode {
        err.status()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_of(ApiError::ModelNotLoaded),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(ApiError::InvalidInput("No image provided".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ApiError::OutputShape(OutputShapeError { actual: 3 })),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(ApiError::Prediction(anyhow::anyhow!("boom"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_output_shape_details_name_actual_count() {
        let err = ApiError::OutputShape(OutputShapeError { actual: 5 });
        assert_eq!(
            err.details().unwrap(),
            "Model returned 5 values instead of 2"
        );
    }

    #[test]
    fn test_encode_error_is_client_error() {
        let err: ApiError = EncodeError::TooManySymptoms { count: 20 }.into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("20"));
    }

    #[test]
    fn test_invalid_input_has_no_details() {
        let err = ApiError::InvalidInput("No image selected".into());
        assert!(err.details().is_none());
        assert_eq!(err.to_string(), "No image selected");
    }
}
