//! `JobService` (spec §4.1): submits jobs to a bounded worker pool, tracks
//! status/progress, retains results for later retrieval.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use ora2pg_db::{ConnectionProvider, StateStore};
use ora2pg_model::{DatabaseTag, ErrorInfo, ErrorKind, JobConfig, JobDescriptor, JobId, JobResult, JobState, OperationKind};
use parking_lot::{Mutex, RwLock};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::error::JobsError;
use crate::job_trait::{JobContext, ProgressReporter};
use crate::registry::JobRegistry;

/// `cancel(id) -> accepted | terminal` (spec §4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    Accepted,
    Terminal,
}

struct JobEntry {
    descriptor: Arc<RwLock<JobDescriptor>>,
    cancellation: CancellationToken,
}

pub struct JobService {
    registry: Arc<JobRegistry>,
    state_store: Arc<StateStore>,
    connections: Arc<ConnectionProvider>,
    config: RwLock<JobConfig>,
    entries: DashMap<JobId, JobEntry>,
    /// Submission order, oldest first; used for LRU-ish eviction against
    /// `job_retention_cap`.
    insertion_order: Mutex<VecDeque<JobId>>,
    semaphore: Arc<Semaphore>,
    shutting_down: AtomicBool,
}

impl JobService {
    pub fn new(
        registry: Arc<JobRegistry>,
        state_store: Arc<StateStore>,
        connections: Arc<ConnectionProvider>,
        config: JobConfig,
    ) -> Arc<Self> {
        let pool_size = config.job_pool_size.max(1);
        Arc::new(Self {
            registry,
            state_store,
            connections,
            config: RwLock::new(config),
            entries: DashMap::new(),
            insertion_order: Mutex::new(VecDeque::new()),
            semaphore: Arc::new(Semaphore::new(pool_size)),
            shutting_down: AtomicBool::new(false),
        })
    }

    pub fn update_config(&self, config: JobConfig) {
        *self.config.write() = config;
    }

    /// Enqueues a new job. Succeeds iff the system is not shutting down.
    pub fn submit(self: &Arc<Self>, database: DatabaseTag, kind: OperationKind) -> Result<JobId, JobsError> {
        if self.shutting_down.load(Ordering::SeqCst) {
            return Err(JobsError::ShuttingDown);
        }

        let job = self
            .registry
            .create_job(database, kind)
            .ok_or(JobsError::UnknownOperation(database, kind))?;

        let id = JobId::new();
        let descriptor = Arc::new(RwLock::new(JobDescriptor::new(id, kind, database)));
        let cancellation = CancellationToken::new();

        self.entries.insert(
            id,
            JobEntry {
                descriptor: descriptor.clone(),
                cancellation: cancellation.clone(),
            },
        );
        self.insertion_order.lock().push_back(id);

        let service = Arc::clone(self);
        let state_store = self.state_store.clone();
        let connections = self.connections.clone();
        let config = self.config.read().clone();

        tokio::spawn(async move {
            let _permit = service
                .semaphore
                .acquire()
                .await
                .expect("job service semaphore is never closed");

            if cancellation.is_cancelled() {
                Self::finish(&descriptor, JobState::Cancelled, None, Some(ErrorInfo::new(ErrorKind::Cancelled, "cancelled before start")));
                service.evict_if_over_capacity();
                return;
            }

            {
                let mut desc = descriptor.write();
                desc.state = JobState::Running;
                desc.started_at = Some(Utc::now());
            }

            let ctx = JobContext {
                state_store,
                connections,
                config,
                cancellation: cancellation.clone(),
            };
            let reporter = ProgressReporter::new(descriptor.clone());

            let result = job.run(&ctx, &reporter).await;

            let error = match &result {
                JobResult::Failure { error } => Some(error.clone()),
                JobResult::Success { .. } => None,
            };

            let final_state = match (&error, result.is_successful()) {
                (Some(e), _) if e.kind == ErrorKind::Cancelled => JobState::Cancelled,
                (_, true) => JobState::Completed,
                (_, false) => JobState::Failed,
            };

            Self::finish(&descriptor, final_state, Some(result), error);
            service.evict_if_over_capacity();
        });

        Ok(id)
    }

    fn finish(
        descriptor: &Arc<RwLock<JobDescriptor>>,
        state: JobState,
        result: Option<JobResult>,
        error: Option<ErrorInfo>,
    ) {
        let mut desc = descriptor.write();
        desc.state = state;
        desc.finished_at = Some(Utc::now());
        if state == JobState::Completed {
            desc.progress.percentage = 100;
        }
        desc.result = result;
        desc.error = error;
    }

    pub fn get_status(&self, id: JobId) -> Result<JobDescriptor, JobsError> {
        self.entries
            .get(&id)
            .map(|entry| entry.descriptor.read().clone())
            .ok_or(JobsError::NotFound(id))
    }

    pub fn get_result(&self, id: JobId) -> Result<JobResult, JobsError> {
        let entry = self.entries.get(&id).ok_or(JobsError::NotFound(id))?;
        let desc = entry.descriptor.read();
        if !desc.state.is_terminal() {
            return Err(JobsError::NotReady(id));
        }
        desc.result.clone().ok_or(JobsError::NotReady(id))
    }

    pub fn cancel(&self, id: JobId) -> Result<CancelOutcome, JobsError> {
        let entry = self.entries.get(&id).ok_or(JobsError::NotFound(id))?;
        let is_terminal = entry.descriptor.read().state.is_terminal();
        if is_terminal {
            return Ok(CancelOutcome::Terminal);
        }
        entry.cancellation.cancel();
        Ok(CancelOutcome::Accepted)
    }

    /// Clears the `StateStore` and evicts all non-running descriptors;
    /// running jobs are requested to cancel and awaited with a bounded
    /// grace period (spec §4.1).
    pub async fn reset_all(&self) {
        self.shutting_down.store(true, Ordering::SeqCst);

        let running: Vec<(JobId, Arc<RwLock<JobDescriptor>>, CancellationToken)> = self
            .entries
            .iter()
            .filter(|e| !e.descriptor.read().state.is_terminal())
            .map(|e| (*e.key(), e.descriptor.clone(), e.cancellation.clone()))
            .collect();

        for (_, _, token) in &running {
            token.cancel();
        }

        let grace_period = Duration::from_secs(5);
        let deadline = tokio::time::Instant::now() + grace_period;
        for (_, descriptor, _) in &running {
            while tokio::time::Instant::now() < deadline {
                if descriptor.read().state.is_terminal() {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
        }

        let to_remove: Vec<JobId> = self
            .entries
            .iter()
            .filter(|e| e.descriptor.read().state.is_terminal())
            .map(|e| *e.key())
            .collect();
        for id in to_remove {
            self.entries.remove(&id);
        }
        self.insertion_order.lock().retain(|id| self.entries.contains_key(id));

        self.state_store.reset();
        self.shutting_down.store(false, Ordering::SeqCst);
    }

    fn evict_if_over_capacity(&self) {
        let cap = self.config.read().job_retention_cap;
        let mut order = self.insertion_order.lock();
        while self.entries.len() > cap {
            let Some(oldest) = order.front().copied() else { break };
            let terminal = self
                .entries
                .get(&oldest)
                .map(|e| e.descriptor.read().state.is_terminal())
                .unwrap_or(true);
            if !terminal {
                break;
            }
            order.pop_front();
            self.entries.remove(&oldest);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job_trait::{Job, JobDescription};
    use async_trait::async_trait;

    struct InstantJob;

    #[async_trait]
    impl Job for InstantJob {
        fn describe(&self) -> JobDescription {
            JobDescription {
                kind: OperationKind::TestConnection,
                database: DatabaseTag::Oracle,
                friendly_name: "instant".into(),
            }
        }

        async fn run(&self, _ctx: &JobContext, reporter: &ProgressReporter) -> JobResult {
            reporter.report(50, "working", "");
            JobResult::success(serde_json::json!({"ok": true}), serde_json::json!({"created": [], "skipped": [], "errors": []}))
        }
    }

    struct SlowCancellableJob;

    #[async_trait]
    impl Job for SlowCancellableJob {
        fn describe(&self) -> JobDescription {
            JobDescription {
                kind: OperationKind::TestConnection,
                database: DatabaseTag::Postgres,
                friendly_name: "slow".into(),
            }
        }

        async fn run(&self, ctx: &JobContext, reporter: &ProgressReporter) -> JobResult {
            for i in 0..200 {
                if ctx.is_cancelled() {
                    return JobResult::failure(ErrorInfo::new(ErrorKind::Cancelled, "cancelled by user"));
                }
                reporter.report(i, "working", "");
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
            JobResult::success(serde_json::json!({"ok": true}), serde_json::json!({"created": [], "skipped": [], "errors": []}))
        }
    }

    fn make_service() -> Arc<JobService> {
        let mut registry = JobRegistry::new();
        registry.register(DatabaseTag::Oracle, OperationKind::TestConnection, Arc::new(InstantJob));
        JobService::new(
            Arc::new(registry),
            Arc::new(StateStore::new()),
            Arc::new(ConnectionProvider::new()),
            JobConfig::default(),
        )
    }

    #[tokio::test]
    async fn submit_then_poll_reaches_completed() {
        let service = make_service();
        let id = service.submit(DatabaseTag::Oracle, OperationKind::TestConnection).unwrap();

        for _ in 0..100 {
            let status = service.get_status(id).unwrap();
            if status.state.is_terminal() {
                assert_eq!(status.state, JobState::Completed);
                assert_eq!(status.progress.percentage, 100);
                let result = service.get_result(id).unwrap();
                assert!(result.is_successful());
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("job never completed");
    }

    #[tokio::test]
    async fn unknown_job_id_is_not_found() {
        let service = make_service();
        let bogus = JobId::new();
        assert!(matches!(service.get_status(bogus), Err(JobsError::NotFound(_))));
    }

    #[tokio::test]
    async fn submit_with_no_registered_factory_fails_explicitly() {
        let service = make_service();
        let result = service.submit(DatabaseTag::Postgres, OperationKind::SchemaExtract);
        assert!(matches!(result, Err(JobsError::UnknownOperation(_, _))));
    }

    #[tokio::test]
    async fn cancel_on_unknown_job_is_not_found() {
        let service = make_service();
        let bogus = JobId::new();
        assert!(matches!(service.cancel(bogus), Err(JobsError::NotFound(_))));
    }

    #[tokio::test]
    async fn cancel_on_terminal_job_reports_terminal() {
        let service = make_service();
        let id = service.submit(DatabaseTag::Oracle, OperationKind::TestConnection).unwrap();
        loop {
            if service.get_status(id).unwrap().state.is_terminal() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(service.cancel(id).unwrap(), CancelOutcome::Terminal);
    }

    #[tokio::test]
    async fn cancelling_a_running_job_ends_it_cancelled() {
        let mut registry = JobRegistry::new();
        registry.register(DatabaseTag::Postgres, OperationKind::TestConnection, Arc::new(SlowCancellableJob));
        let service = JobService::new(
            Arc::new(registry),
            Arc::new(StateStore::new()),
            Arc::new(ConnectionProvider::new()),
            JobConfig::default(),
        );

        let id = service.submit(DatabaseTag::Postgres, OperationKind::TestConnection).unwrap();

        loop {
            if service.get_status(id).unwrap().state == JobState::Running {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        assert_eq!(service.cancel(id).unwrap(), CancelOutcome::Accepted);

        for _ in 0..200 {
            let status = service.get_status(id).unwrap();
            if status.state.is_terminal() {
                assert_eq!(status.state, JobState::Cancelled);
                assert_eq!(status.error.as_ref().map(|e| e.kind), Some(ErrorKind::Cancelled));
                let result = service.get_result(id).unwrap();
                assert!(!result.is_successful());
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("job never reached a terminal state after cancel");
    }
}
