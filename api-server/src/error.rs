//! Error handling

use axum::{
    extract::rejection::JsonRejection,
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;
use validator::ValidationErrors;

use attrition_core::PipelineError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    // Resource errors
    NotFound(String),

    // Form errors
    InvalidBody(String),
    ValidationError(ValidationErrors),
    IncompleteInput(Vec<String>),

    // Pipeline errors
    ModelUnavailable(String),
    InferenceError(String),

    // Generic errors
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, details) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::InvalidBody(reason) => (
                StatusCode::BAD_REQUEST,
                "Malformed form body".to_string(),
                Some(json!({ "reason": reason })),
            ),
            AppError::ValidationError(errors) => (
                StatusCode::BAD_REQUEST,
                "Invalid form values".to_string(),
                serde_json::to_value(errors).ok(),
            ),
            AppError::IncompleteInput(fields) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Please fill in: {}", fields.join(", ")),
                Some(json!({ "fields": fields })),
            ),
            AppError::ModelUnavailable(msg) => {
                tracing::error!("Model unavailable: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, "Model unavailable".to_string(), None)
            }
            AppError::InferenceError(msg) => {
                tracing::error!("Inference error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Prediction failed".to_string(), None)
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string(), None)
            }
        };

        let mut body = json!({
            "error": error_message,
            "status": status.as_u16()
        });
        if let Some(details) = details {
            body["details"] = details;
        }

        (status, Json(body)).into_response()
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::IncompleteInput(fields) => AppError::IncompleteInput(fields),
            PipelineError::ArtifactLoad { .. } | PipelineError::SchemaContract { .. } => {
                AppError::ModelUnavailable(err.to_string())
            }
            // A schema field nobody produced is a wiring bug, not a user error
            PipelineError::MissingFeature(_) => AppError::InternalError(err.to_string()),
            PipelineError::Inference(reason) => AppError::InferenceError(reason),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody(rejection.body_text())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::ValidationError(errors)
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::InternalError(err.to_string())
    }
}
