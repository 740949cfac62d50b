//! `TestConnection` (spec §4.4, §6): the one job built into this crate
//! rather than `ora2pg-migrate`, since it is a thin wrapper over
//! `ConnectionProvider::test_oracle`/`test_postgres` and nothing else reads
//! or writes `StateStore`.

use async_trait::async_trait;
use ora2pg_model::{DatabaseTag, JobResult, OperationKind};

use crate::job_trait::{Job, JobContext, JobDescription, ProgressReporter};

pub struct TestConnectionJob {
    database: DatabaseTag,
}

impl TestConnectionJob {
    pub fn oracle() -> Self {
        Self { database: DatabaseTag::Oracle }
    }

    pub fn postgres() -> Self {
        Self { database: DatabaseTag::Postgres }
    }
}

#[async_trait]
impl Job for TestConnectionJob {
    fn describe(&self) -> JobDescription {
        JobDescription {
            kind: OperationKind::TestConnection,
            database: self.database,
            friendly_name: format!("Test {} connection", self.database),
        }
    }

    async fn run(&self, ctx: &JobContext, reporter: &ProgressReporter) -> JobResult {
        reporter.report(0, "connecting", "");

        let result = match self.database {
            DatabaseTag::Oracle => ctx.connections.test_oracle().await,
            DatabaseTag::Postgres => ctx.connections.test_postgres().await,
        };

        reporter.report(99, "done", "");
        let payload = serde_json::to_value(&result).unwrap_or(serde_json::Value::Null);
        if result.connected {
            JobResult::success(payload, serde_json::json!({ "created": [], "skipped": [], "errors": [] }))
        } else {
            JobResult::failure(ora2pg_model::ErrorInfo::new(
                ora2pg_model::ErrorKind::ConnectionError,
                result.message.unwrap_or_else(|| "connection failed".to_string()),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn friendly_name_identifies_the_target_database() {
        let job = TestConnectionJob::oracle();
        assert!(job.describe().friendly_name.contains("oracle") || job.describe().friendly_name.contains("Oracle"));
    }
}
