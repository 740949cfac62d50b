//! `JobRegistry` (spec §4.3): maps `(database, operationType)` to a `Job`.
//! Grounded on `n8n_core::executor::NodeExecutorRegistry`
//! (`HashMap<String, Arc<dyn NodeExecutor>>`, populated once at startup).

use std::collections::HashMap;
use std::sync::Arc;

use ora2pg_model::{DatabaseTag, OperationKind};

use crate::job_trait::Job;

#[derive(Default)]
pub struct JobRegistry {
    factories: HashMap<(DatabaseTag, OperationKind), Arc<dyn Job>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Populated at startup from a static table (the composition root in
    /// `ora2pg-server`'s `main.rs` wires every known phase).
    pub fn register(&mut self, database: DatabaseTag, kind: OperationKind, job: Arc<dyn Job>) {
        self.factories.insert((database, kind), job);
    }

    /// Returns `None` when no factory is registered; the caller (`JobService::submit`)
    /// turns that into an explicit failure at submit time rather than silently dropping it.
    pub fn create_job(&self, database: DatabaseTag, kind: OperationKind) -> Option<Arc<dyn Job>> {
        self.factories.get(&(database, kind)).cloned()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job_trait::{JobContext, JobDescription, ProgressReporter};
    use async_trait::async_trait;
    use ora2pg_model::JobResult;

    struct NoopJob;

    #[async_trait]
    impl Job for NoopJob {
        fn describe(&self) -> JobDescription {
            JobDescription {
                kind: OperationKind::TestConnection,
                database: DatabaseTag::Oracle,
                friendly_name: "noop".into(),
            }
        }

        async fn run(&self, _ctx: &JobContext, _reporter: &ProgressReporter) -> JobResult {
            JobResult::success(serde_json::Value::Null, serde_json::Value::Null)
        }
    }

    #[test]
    fn unknown_combination_returns_none() {
        let registry = JobRegistry::new();
        assert!(registry
            .create_job(DatabaseTag::Oracle, OperationKind::SchemaExtract)
            .is_none());
    }

    #[test]
    fn registered_combination_is_retrievable() {
        let mut registry = JobRegistry::new();
        registry.register(DatabaseTag::Oracle, OperationKind::TestConnection, Arc::new(NoopJob));
        assert!(registry
            .create_job(DatabaseTag::Oracle, OperationKind::TestConnection)
            .is_some());
        assert!(registry
            .create_job(DatabaseTag::Postgres, OperationKind::TestConnection)
            .is_none());
    }
}
