//! The `Job` abstraction (spec §4.2). Grounded on `NodeExecutor` /
//! `NodeExecutorRegistry` in `n8n-core::executor`: a stateless trait object
//! looked up by a dispatch key and invoked with whatever context it needs,
//! rather than a fresh object constructed per submission.

use std::sync::Arc;

use async_trait::async_trait;
use ora2pg_db::{ConnectionProvider, StateStore};
use ora2pg_model::{DatabaseTag, JobConfig, JobResult, OperationKind};
use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;

use ora2pg_model::JobDescriptor;

/// `describe() -> {kind, database, operationType, friendlyName}`.
#[derive(Debug, Clone)]
pub struct JobDescription {
    pub kind: OperationKind,
    pub database: DatabaseTag,
    pub friendly_name: String,
}

/// Everything a running job needs, handed in by `JobService` rather than
/// reached for as an ambient global (spec §9, "Process-wide state").
#[derive(Clone)]
pub struct JobContext {
    pub state_store: Arc<StateStore>,
    pub connections: Arc<ConnectionProvider>,
    pub config: JobConfig,
    pub cancellation: CancellationToken,
}

impl JobContext {
    /// Cooperative cancellation check. Long loops poll this at least once
    /// per table, per batch, or per SQL statement (spec §4.2/§5).
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}

/// Publishes progress atomically so every `getStatus` observes a
/// self-consistent `{percentage, currentTask, details}` snapshot (spec
/// §4.1). Percentage is clamped to be non-decreasing while the job runs;
/// reaching 100 is the job service's job to do at completion, not the
/// job's.
pub struct ProgressReporter {
    descriptor: Arc<RwLock<JobDescriptor>>,
}

impl ProgressReporter {
    pub(crate) fn new(descriptor: Arc<RwLock<JobDescriptor>>) -> Self {
        Self { descriptor }
    }

    pub fn report(&self, percentage: u8, current_task: impl Into<String>, details: impl Into<String>) {
        let mut desc = self.descriptor.write();
        let clamped = percentage.min(99).max(desc.progress.percentage);
        desc.progress.percentage = clamped;
        desc.progress.current_task = current_task.into();
        desc.progress.details = details.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ora2pg_model::{JobDescriptor, JobId};

    #[test]
    fn progress_never_decreases_and_never_reaches_100_from_report() {
        let descriptor = Arc::new(RwLock::new(JobDescriptor::new(
            JobId::new(),
            OperationKind::TestConnection,
            DatabaseTag::Oracle,
        )));
        let reporter = ProgressReporter::new(descriptor.clone());

        reporter.report(50, "halfway", "");
        assert_eq!(descriptor.read().progress.percentage, 50);

        reporter.report(30, "regressed", "");
        assert_eq!(descriptor.read().progress.percentage, 50);

        reporter.report(150, "over the top", "");
        assert_eq!(descriptor.read().progress.percentage, 99);
    }
}

/// A polymorphic unit of migration work (spec §4.2). Implementations are
/// stateless: all per-run state lives in `JobContext`, so one `Arc<dyn Job>`
/// is shared across every submission of that `(database, operationKind)`
/// pair, the same way `n8n-core`'s built-in executors are constructed once
/// in `NodeExecutorRegistry::new()` and reused for every node execution.
#[async_trait]
pub trait Job: Send + Sync {
    fn describe(&self) -> JobDescription;

    async fn run(&self, ctx: &JobContext, reporter: &ProgressReporter) -> JobResult;
}
