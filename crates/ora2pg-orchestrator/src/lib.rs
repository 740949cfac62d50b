//! `Orchestrator` (spec §4.12): drives the fixed, ordered migration
//! sequence, awaiting each phase before submitting the next. Grounded on
//! `n8n_core::engine::WorkflowEngine::execute`'s sequential
//! stack-draining loop (`n8n-rust/crates/n8n-core/src/engine.rs`), adapted
//! from a node-DAG walk to a flat, statically-ordered phase list: there is
//! no branching or fan-out here, so a `Vec` position replaces the
//! work-queue, and "node failed, `continue_on_fail` unset" becomes "phase
//! failed, abort the whole run".

pub mod error;
pub mod phases;

use std::sync::Arc;
use std::time::Duration;

use ora2pg_jobs::JobService;
use ora2pg_model::{JobResult, JobState, OperationKind};
use serde::Serialize;

pub use error::OrchestratorError;
pub use phases::{AbortPolicy, PhaseSpec, PHASES};

/// How often the Orchestrator polls `JobService::get_status` for the phase
/// it just submitted (spec does not mandate a cadence; event-driven
/// notification would need a channel on `JobService` this system does not
/// have, so polling is the simplest correct option).
const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Serialize)]
pub struct PhaseOutcome {
    pub phase: OperationKind,
    pub job_id: String,
    pub item_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MigrationReport {
    pub completed_phases: Vec<PhaseOutcome>,
}

pub struct Orchestrator {
    job_service: Arc<JobService>,
}

impl Orchestrator {
    pub fn new(job_service: Arc<JobService>) -> Self {
        Self { job_service }
    }

    /// Runs every phase in `PHASES`, in order, stopping at the first
    /// failure or abort-policy violation (spec §4.12 point 4: already
    /// executed phases are not rolled back).
    pub async fn run_full_migration(&self) -> Result<MigrationReport, OrchestratorError> {
        let mut completed = Vec::with_capacity(PHASES.len());

        for spec in PHASES {
            tracing::info!(phase = %spec.kind, "submitting phase");
            let outcome = self.run_phase(spec).await?;
            tracing::info!(phase = %spec.kind, items = outcome.item_count, "phase completed");
            completed.push(outcome);
        }

        Ok(MigrationReport { completed_phases: completed })
    }

    async fn run_phase(&self, spec: &PhaseSpec) -> Result<PhaseOutcome, OrchestratorError> {
        let job_id = self.job_service.submit(spec.database, spec.kind)?;

        loop {
            let status = self.job_service.get_status(job_id)?;
            if status.state.is_terminal() {
                if status.state != JobState::Completed {
                    let message = status
                        .error
                        .map(|e| e.message)
                        .unwrap_or_else(|| format!("phase ended in state {}", status.state));
                    return Err(OrchestratorError::PhaseFailed { phase: spec.kind, message });
                }

                let result = self.job_service.get_result(job_id)?;
                let item_count = item_count_of(&result);

                if spec.abort_policy == AbortPolicy::RequireNonZero && item_count == 0 {
                    return Err(OrchestratorError::PolicyViolation { phase: spec.kind });
                }

                return Ok(PhaseOutcome { phase: spec.kind, job_id: job_id.to_string(), item_count });
            }

            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

/// Every job's `payload` carries its own count field under a different
/// name (`total` for Extractors, `createdCount` for Creators,
/// `installedFull`/`installedPartial`/`installedStubs` for the
/// compatibility installer, `verifiedCount` for verifiers). Rather than
/// matching on `OperationKind`, sum whatever top-level numeric fields the
/// payload has: every job's payload is shaped so that sum to equal "how
/// much work this phase did".
fn item_count_of(result: &JobResult) -> usize {
    match result {
        JobResult::Success { payload, .. } => payload
            .as_object()
            .map(|obj| {
                obj.values()
                    .filter_map(|v| v.as_u64())
                    .sum::<u64>() as usize
            })
            .unwrap_or(0),
        JobResult::Failure { .. } => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ora2pg_db::{ConnectionProvider, StateStore};
    use ora2pg_jobs::{Job, JobContext, JobDescription, JobRegistry, ProgressReporter};
    use ora2pg_model::{DatabaseTag, JobConfig};

    struct AlwaysSucceeds(OperationKind, DatabaseTag);

    #[async_trait]
    impl Job for AlwaysSucceeds {
        fn describe(&self) -> JobDescription {
            JobDescription { kind: self.0, database: self.1, friendly_name: "test".into() }
        }

        async fn run(&self, _ctx: &JobContext, _reporter: &ProgressReporter) -> JobResult {
            JobResult::success(serde_json::json!({ "total": 3 }), serde_json::json!({}))
        }
    }

    struct AlwaysFails(OperationKind, DatabaseTag);

    #[async_trait]
    impl Job for AlwaysFails {
        fn describe(&self) -> JobDescription {
            JobDescription { kind: self.0, database: self.1, friendly_name: "test".into() }
        }

        async fn run(&self, _ctx: &JobContext, _reporter: &ProgressReporter) -> JobResult {
            JobResult::failure(ora2pg_model::ErrorInfo::new(ora2pg_model::ErrorKind::SqlError, "boom"))
        }
    }

    fn service_with(registry: JobRegistry) -> Arc<JobService> {
        JobService::new(
            Arc::new(registry),
            Arc::new(StateStore::new()),
            Arc::new(ConnectionProvider::new()),
            JobConfig::default(),
        )
    }

    #[tokio::test]
    async fn a_failed_phase_stops_the_migration_before_later_phases_run() {
        let mut registry = JobRegistry::new();
        registry.register(
            DatabaseTag::Oracle,
            OperationKind::TestConnection,
            Arc::new(AlwaysFails(OperationKind::TestConnection, DatabaseTag::Oracle)),
        );
        let orchestrator = Orchestrator::new(service_with(registry));

        let result = orchestrator.run_full_migration().await;
        assert!(matches!(result, Err(OrchestratorError::PhaseFailed { phase: OperationKind::TestConnection, .. })));
    }

    #[tokio::test]
    async fn a_require_non_zero_phase_with_no_items_is_a_policy_violation() {
        let mut registry = JobRegistry::new();
        for spec in PHASES.iter().take(2) {
            registry.register(spec.database, spec.kind, Arc::new(AlwaysSucceeds(spec.kind, spec.database)));
        }

        struct EmptySchemaExtract;
        #[async_trait]
        impl Job for EmptySchemaExtract {
            fn describe(&self) -> JobDescription {
                JobDescription { kind: OperationKind::SchemaExtract, database: DatabaseTag::Oracle, friendly_name: "test".into() }
            }
            async fn run(&self, _ctx: &JobContext, _reporter: &ProgressReporter) -> JobResult {
                JobResult::success(serde_json::json!({ "total": 0 }), serde_json::json!({}))
            }
        }
        registry.register(DatabaseTag::Oracle, OperationKind::SchemaExtract, Arc::new(EmptySchemaExtract));

        let orchestrator = Orchestrator::new(service_with(registry));
        let result = orchestrator.run_full_migration().await;
        assert!(matches!(result, Err(OrchestratorError::PolicyViolation { phase: OperationKind::SchemaExtract })));
    }
}
