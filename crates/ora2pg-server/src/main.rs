//! Oracle→PostgreSQL migration service: composition root. Wires
//! `ConfigStore`, `ConnectionProvider`, `JobRegistry`/`JobService`, and
//! `Orchestrator` together behind an axum REST surface (spec §6), following
//! the teacher's `main.rs` shape (tracing init, `dotenvy`, CORS + trace
//! layers, graceful shutdown on SIGINT/SIGTERM).

mod config;
mod error;
mod handlers;
mod registry;
mod state;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use ora2pg_db::{ConnectionProvider, StateStore};
use ora2pg_jobs::JobService;
use ora2pg_orchestrator::Orchestrator;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ConfigStore;
use crate::handlers::*;
use crate::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ora2pg_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let config = Arc::new(ConfigStore::from_env());

    let connections = Arc::new(ConnectionProvider::new());
    let state_store = Arc::new(StateStore::new());
    let job_registry = Arc::new(registry::build());
    let job_config = config.get().to_job_config();
    let jobs = JobService::new(job_registry, state_store, connections.clone(), job_config);
    let orchestrator = Arc::new(Orchestrator::new(jobs.clone()));

    let state = AppState { config, connections, jobs, orchestrator };
    state.apply_config().await;

    let bind_addr = format!(
        "{}:{}",
        std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("PORT").unwrap_or_else(|_| "8080".into()),
    );

    let app = Router::new()
        .route("/healthz", get(health_handler))
        .route("/api/database/test/oracle", get(test_oracle_handler))
        .route("/api/database/test/postgres", get(test_postgres_handler))
        .route("/api/config", get(get_config_handler).post(put_config_handler))
        .route("/api/config/reset", post(reset_config_handler))
        .route("/api/schemas/oracle/extract", post(schemas_oracle_extract_handler))
        .route("/api/schemas/postgres/create", post(schemas_postgres_create_handler))
        .route("/api/tables/oracle/extract", post(tables_oracle_extract_handler))
        .route("/api/tables/postgres/create", post(tables_postgres_create_handler))
        .route("/api/transfer/oracle/row-counts", post(transfer_oracle_row_counts_handler))
        .route("/api/transfer/postgres/execute", post(transfer_postgres_execute_handler))
        .route("/api/jobs/:database/:operation", post(submit_job_handler))
        .route("/api/jobs/:job_id/status", get(job_status_handler))
        .route("/api/jobs/:job_id/result", get(job_result_handler))
        .route("/api/jobs/:job_id/cancel", post(cancel_job_handler))
        .route("/api/migration/run", post(run_migration_handler))
        .route("/api/state/reset", get(state_reset_handler))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("Binding to: {}", bind_addr);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("Failed to bind to address");

    info!("ora2pg-server listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server failed to start");

    info!("ora2pg-server shutdown complete");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
