use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tourmgmt_core::error::CoreError;
use tourmgmt_core::validation::ValidationResult;
use tourmgmt_db::repositories::RepositoryError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `tourmgmt_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A storage error from the tour repository.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The request body's media type is not accepted by any handler.
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// Declarative validation failed; rendered as the field-keyed map itself.
    #[error("Validation failed for {} field(s)", .0.len())]
    Unprocessable(ValidationResult),

    /// The unit of work reported that nothing was committed.
    #[error("{0}")]
    SaveFailed(&'static str),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                // Missing tours are reported as 400 to keep the existing
                // client contract.
                CoreError::NotFound { entity, id } => (
                    StatusCode::BAD_REQUEST,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Configuration(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            // --- Storage errors ---
            AppError::Repository(err) => classify_repository_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::UnsupportedMediaType(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_MEDIA_TYPE",
                msg.clone(),
            ),
            AppError::Unprocessable(result) => {
                return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(result)).into_response();
            }
            AppError::SaveFailed(msg) => {
                tracing::error!(error = %msg, "Unit of work failed to save");
                internal()
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Classify a repository error into an HTTP status, error code, and message.
///
/// - Duplicate keys (in-memory conflicts, PostgreSQL `23505`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_repository_error(err: &RepositoryError) -> (StatusCode, &'static str, String) {
    match err {
        RepositoryError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        RepositoryError::Database(sqlx::Error::Database(db_err))
            if db_err.code().as_deref() == Some("23505") =>
        {
            let constraint = db_err.constraint().unwrap_or("unknown");
            (
                StatusCode::CONFLICT,
                "CONFLICT",
                format!("Duplicate value violates unique constraint: {constraint}"),
            )
        }
        RepositoryError::Database(other) => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}
