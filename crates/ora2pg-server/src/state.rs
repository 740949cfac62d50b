//! Shared application state, handed to every handler via `axum::State`
//! (same shape as the teacher's `AppState`, generalized from one HTTP
//! client to the job subsystem's three collaborators).

use std::sync::Arc;

use ora2pg_db::ConnectionProvider;
use ora2pg_jobs::JobService;
use ora2pg_orchestrator::Orchestrator;

use crate::config::ConfigStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ConfigStore>,
    pub connections: Arc<ConnectionProvider>,
    pub jobs: Arc<JobService>,
    pub orchestrator: Arc<Orchestrator>,
}

impl AppState {
    /// Pushes the current `ConfigStore` snapshot down into the long-lived
    /// `ConnectionProvider` and `JobService`. Called once at startup and
    /// again after every `/api/config` write.
    pub async fn apply_config(&self) {
        let values = self.config.get();
        self.connections.reconfigure(values.to_connection_settings()).await;
        self.jobs.update_config(values.to_job_config());
    }
}
