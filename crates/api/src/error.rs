use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use helpdesk_core::error::CoreError;
use helpdesk_pipeline::{IntakeError, IntakeFailure, IntakeStage};
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Implements [`IntoResponse`] to produce `{ "error", "code" }` JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A failed ticket intake run.
    #[error(transparent)]
    Intake(#[from] IntakeFailure),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            AppError::Intake(failure) => classify_intake_failure(failure),

            AppError::Database(err) => classify_sqlx_error(err),

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Map an intake failure to a stable status, code, and message.
///
/// The pipeline has already logged the detail (raw model text, sqlx
/// message); none of it reaches the client.
fn classify_intake_failure(failure: &IntakeFailure) -> (StatusCode, &'static str, String) {
    match &failure.error {
        IntakeError::ConfigurationMissing => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "CONFIGURATION_MISSING",
            "Text generation service is not configured".to_string(),
        ),
        IntakeError::MissingField(field) => (
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            format!("{field} is required"),
        ),
        IntakeError::RequesterNotFound(id) => (
            StatusCode::NOT_FOUND,
            "REQUESTER_NOT_FOUND",
            format!("Requester {id} not found"),
        ),
        IntakeError::GenerationUnavailable(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "GENERATION_UNAVAILABLE",
            "Text generation service unavailable".to_string(),
        ),
        IntakeError::MalformedModelOutput(_) => {
            let which = match failure.stage {
                IntakeStage::PolishRequested | IntakeStage::PolishParsed => "polish",
                _ => "priority",
            };
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "MALFORMED_MODEL_OUTPUT",
                format!("Failed to parse {which} output from model"),
            )
        }
        IntakeError::InvalidPriorityValue(_) => (
            StatusCode::BAD_REQUEST,
            "INVALID_PRIORITY_VALUE",
            "Invalid priority determined by model".to_string(),
        ),
        IntakeError::PersistenceError(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "PERSISTENCE_ERROR",
            "Failed to store ticket".to_string(),
        ),
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique violations on a `uq_`-prefixed constraint map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
