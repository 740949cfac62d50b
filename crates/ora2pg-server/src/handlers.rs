//! HTTP handlers for the REST surface (spec §6). Job-shaped endpoints all
//! funnel through `submit_job`/`job_status`/`job_result`; the few
//! resource-specific routes below are thin, named aliases over the same
//! `JobService::submit`, matching the table in spec §6 while
//! `/api/jobs/:database/:operation` covers "start phase-specific jobs" in
//! general for operations the table doesn't name explicitly.

use std::str::FromStr;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use ora2pg_model::{DatabaseTag, JobId, OperationKind};
use serde_json::json;

use crate::config::ConfigValues;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

// ── Connection tests ────────────────────────────────────────────────────

pub async fn test_oracle_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.connections.test_oracle().await)
}

pub async fn test_postgres_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.connections.test_postgres().await)
}

// ── Configuration ────────────────────────────────────────────────────────

pub async fn get_config_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.config.get())
}

pub async fn put_config_handler(
    State(state): State<AppState>,
    Json(values): Json<ConfigValues>,
) -> impl IntoResponse {
    state.config.set(values);
    state.apply_config().await;
    Json(state.config.get())
}

pub async fn reset_config_handler(State(state): State<AppState>) -> impl IntoResponse {
    let restored = state.config.reset();
    state.apply_config().await;
    Json(restored)
}

// ── Generic job submission / polling ────────────────────────────────────

fn parse_database(raw: &str) -> Result<DatabaseTag, ApiError> {
    DatabaseTag::from_str(raw).map_err(ApiError::from)
}

fn parse_operation(raw: &str) -> Result<OperationKind, ApiError> {
    OperationKind::from_str(raw).map_err(ApiError::from)
}

pub async fn submit_job_handler(
    State(state): State<AppState>,
    Path((database, operation)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let database = parse_database(&database)?;
    let operation = parse_operation(&operation)?;
    let job_id = state.jobs.submit(database, operation)?;
    Ok((StatusCode::ACCEPTED, Json(json!({ "jobId": job_id }))))
}

fn parse_job_id(raw: &str) -> Result<JobId, ApiError> {
    JobId::from_str(raw).map_err(|_| {
        ApiError::new(StatusCode::BAD_REQUEST, ora2pg_model::ErrorKind::ConfigError, "malformed jobId")
    })
}

/// `{jobId, status, isComplete, progress, error?}` (spec §6 "stable" shape).
pub async fn job_status_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let job_id = parse_job_id(&job_id)?;
    let descriptor = state.jobs.get_status(job_id)?;
    Ok(Json(json!({
        "jobId": descriptor.id,
        "status": descriptor.state,
        "isComplete": descriptor.is_complete(),
        "progress": descriptor.progress,
        "error": descriptor.error,
    })))
}

pub async fn job_result_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let job_id = parse_job_id(&job_id)?;
    let result = state.jobs.get_result(job_id)?;
    Ok(Json(result))
}

pub async fn cancel_job_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let job_id = parse_job_id(&job_id)?;
    let outcome = state.jobs.cancel(job_id)?;
    Ok(Json(json!({ "outcome": format!("{outcome:?}") })))
}

// ── Named convenience aliases (spec §6 table) ───────────────────────────

async fn submit(state: &AppState, database: DatabaseTag, operation: OperationKind) -> Result<impl IntoResponse, ApiError> {
    let job_id = state.jobs.submit(database, operation)?;
    Ok((StatusCode::ACCEPTED, Json(json!({ "jobId": job_id }))))
}

pub async fn schemas_oracle_extract_handler(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    submit(&state, DatabaseTag::Oracle, OperationKind::SchemaExtract).await
}

pub async fn schemas_postgres_create_handler(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    submit(&state, DatabaseTag::Postgres, OperationKind::SchemaCreate).await
}

pub async fn tables_oracle_extract_handler(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    submit(&state, DatabaseTag::Oracle, OperationKind::TableMetadataExtract).await
}

pub async fn tables_postgres_create_handler(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    submit(&state, DatabaseTag::Postgres, OperationKind::TableCreate).await
}

pub async fn transfer_oracle_row_counts_handler(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    submit(&state, DatabaseTag::Oracle, OperationKind::RowCountExtract).await
}

pub async fn transfer_postgres_execute_handler(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    submit(&state, DatabaseTag::Oracle, OperationKind::DataTransfer).await
}

// ── Full migration / state reset ────────────────────────────────────────

/// Spawns the full migration off the request task and returns immediately,
/// matching every other handler in this file: the response carries no
/// report, only an acceptance — phase-by-phase progress is visible through
/// `/api/jobs/{jobId}/status` for whichever phase is currently running.
pub async fn run_migration_handler(State(state): State<AppState>) -> impl IntoResponse {
    let orchestrator = state.orchestrator.clone();
    tokio::spawn(async move {
        match orchestrator.run_full_migration().await {
            Ok(report) => tracing::info!(phases = report.completed_phases.len(), "full migration finished"),
            Err(e) => tracing::error!(error = %e, "full migration aborted"),
        }
    });

    (StatusCode::ACCEPTED, Json(json!({ "status": "accepted" })))
}

pub async fn state_reset_handler(State(state): State<AppState>) -> impl IntoResponse {
    state.jobs.reset_all().await;
    Json(json!({ "reset": true }))
}
