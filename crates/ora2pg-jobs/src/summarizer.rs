//! `JobResultSummarizer` (spec §4.10): the one JSON shape the front-end
//! consumes, derived from a terminal `JobDescriptor`.

use ora2pg_model::{JobDescriptor, JobResult, JobState};
use serde_json::json;

pub fn summarize(descriptor: &JobDescriptor) -> serde_json::Value {
    let status = if descriptor.state == JobState::Completed {
        "success"
    } else {
        "error"
    };

    let (is_successful, created_count, skipped_count, error_count, summary_value) = match &descriptor.result {
        Some(JobResult::Success { summary, .. }) => {
            let count_of = |key: &str| summary.get(key).and_then(|v| v.as_array()).map(|a| a.len()).unwrap_or(0);
            let errors = count_of("errors");
            (errors == 0, count_of("created"), count_of("skipped"), errors, summary.clone())
        }
        Some(JobResult::Failure { error }) => (false, 0, 0, 0, json!({ "error": error })),
        None => (false, 0, 0, 0, serde_json::Value::Null),
    };

    json!({
        "status": status,
        "jobId": descriptor.id.to_string(),
        "operationKind": descriptor.kind.to_string(),
        "isSuccessful": is_successful,
        "createdCount": created_count,
        "skippedCount": skipped_count,
        "errorCount": error_count,
        "summary": summary_value,
        "executionTimestamp": descriptor.finished_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ora2pg_model::{DatabaseTag, JobId, OperationKind};

    #[test]
    fn summarizes_a_successful_creation_outcome() {
        let mut descriptor = JobDescriptor::new(JobId::new(), OperationKind::TableCreate, DatabaseTag::Postgres);
        descriptor.state = JobState::Completed;
        descriptor.finished_at = Some(chrono::Utc::now());
        descriptor.result = Some(JobResult::success(
            json!({"tables": ["hr.employees"]}),
            json!({"created": ["hr.employees"], "skipped": [], "errors": []}),
        ));

        let summary = summarize(&descriptor);
        assert_eq!(summary["status"], "success");
        assert_eq!(summary["isSuccessful"], true);
        assert_eq!(summary["createdCount"], 1);
        assert_eq!(summary["errorCount"], 0);
    }

    #[test]
    fn summarizes_a_failed_job() {
        let mut descriptor = JobDescriptor::new(JobId::new(), OperationKind::SchemaExtract, DatabaseTag::Oracle);
        descriptor.state = JobState::Failed;
        let error = ora2pg_model::ErrorInfo::new(ora2pg_model::ErrorKind::ConnectionError, "refused");
        descriptor.result = Some(JobResult::failure(error));

        let summary = summarize(&descriptor);
        assert_eq!(summary["status"], "error");
        assert_eq!(summary["isSuccessful"], false);
    }
}
