//! Maps internal errors onto the REST surface's JSON error envelope
//! (spec §7). Every handler returns `Result<_, ApiError>` so the error
//! taxonomy is expressed once instead of duplicated per handler, the way
//! the teacher's handlers each format their own `{"error": e.to_string()}`
//! body but funneled through one `IntoResponse` impl.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ora2pg_jobs::JobsError;
use ora2pg_model::ErrorKind;
use serde_json::json;

pub struct ApiError {
    status: StatusCode,
    kind: ErrorKind,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { status, kind, message: message.into() }
    }
}

impl From<JobsError> for ApiError {
    fn from(err: JobsError) -> Self {
        let status = match err {
            JobsError::NotFound(_) => StatusCode::NOT_FOUND,
            JobsError::NotReady(_) => StatusCode::CONFLICT,
            JobsError::UnknownOperation(_, _) => StatusCode::BAD_REQUEST,
            JobsError::ShuttingDown => StatusCode::SERVICE_UNAVAILABLE,
        };
        let kind = match err {
            JobsError::NotFound(_) => ErrorKind::NotFound,
            JobsError::UnknownOperation(_, _) => ErrorKind::ConfigError,
            _ => ErrorKind::Internal,
        };
        Self { status, kind, message: err.to_string() }
    }
}

impl From<ora2pg_model::ModelError> for ApiError {
    fn from(err: ora2pg_model::ModelError) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ErrorKind::ConfigError, err.to_string())
    }
}

impl From<ora2pg_orchestrator::OrchestratorError> for ApiError {
    fn from(err: ora2pg_orchestrator::OrchestratorError) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, ErrorKind::Internal, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({ "error": { "kind": self.kind, "message": self.message } })),
        )
            .into_response()
    }
}
