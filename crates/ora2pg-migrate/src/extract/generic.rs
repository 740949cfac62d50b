//! Shared Extractor scaffold (spec §4.7, §9 "one dispatch table... a shared
//! helper"). `ExtractorQuery` captures what differs between object kinds —
//! the dictionary SQL and the row-to-entity mapping; `ExtractorJob` is the
//! one `Job` impl that every concrete extractor reuses for connection
//! scoping, per-row error isolation, summary emission, and publishing into
//! `StateStore`.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use ora2pg_jobs::{Job, JobContext, JobDescription, ProgressReporter};
use ora2pg_model::{DatabaseTag, ErrorInfo, ErrorKind, JobResult, OperationKind};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::schema_filter::SchemaFilter;

pub trait ExtractorQuery: Send + Sync + 'static {
    type Item: Serialize + Clone + Send + 'static;

    fn operation_kind(&self) -> OperationKind;
    fn friendly_name(&self) -> &'static str;
    fn phase_key(&self) -> &'static str;

    /// The dictionary query, scoped by `filter`.
    fn query_sql(&self, filter: &SchemaFilter) -> String;

    /// Maps one result row to a canonical-model item. A per-row error does
    /// not abort the extractor (spec §4.7); it is folded into `rowErrors`.
    fn row_to_item(&self, row: &oracle::Row) -> Result<Self::Item, oracle::Error>;

    /// The owning schema of one item, used to compute `perSchema` counts.
    fn schema_of(&self, item: &Self::Item) -> &str;
}

pub struct ExtractorJob<Q: ExtractorQuery> {
    query: Arc<Q>,
}

impl<Q: ExtractorQuery> ExtractorJob<Q> {
    pub fn new(query: Q) -> Self {
        Self { query: Arc::new(query) }
    }
}

#[async_trait]
impl<Q: ExtractorQuery> Job for ExtractorJob<Q> {
    fn describe(&self) -> JobDescription {
        JobDescription {
            kind: self.query.operation_kind(),
            database: DatabaseTag::Oracle,
            friendly_name: self.query.friendly_name().to_string(),
        }
    }

    async fn run(&self, ctx: &JobContext, reporter: &ProgressReporter) -> JobResult {
        reporter.report(0, "querying oracle dictionary", "");

        let filter = SchemaFilter::from_config(&ctx.config);
        let sql = self.query.query_sql(&filter);
        let query = self.query.clone();
        let cancellation = ctx.cancellation.clone();

        let outcome = ctx
            .connections
            .with_oracle(move |conn| {
                let mut items = Vec::new();
                let mut row_errors = Vec::new();
                let mut cancelled = false;
                let result_set = conn.query(sql.as_str(), &[])?;
                for row_result in result_set {
                    if cancellation.is_cancelled() {
                        cancelled = true;
                        break;
                    }
                    match row_result {
                        Ok(row) => match query.row_to_item(&row) {
                            Ok(item) => items.push(item),
                            Err(e) => row_errors.push(e.to_string()),
                        },
                        Err(e) => row_errors.push(e.to_string()),
                    }
                }
                Ok((items, row_errors, cancelled))
            })
            .await;

        match outcome {
            Ok((_, _, true)) => JobResult::failure(ErrorInfo::new(ErrorKind::Cancelled, "cancelled by user")),
            Ok((items, row_errors, false)) => {
                reporter.report(80, "publishing extracted metadata", "");

                let mut per_schema: BTreeMap<String, usize> = BTreeMap::new();
                for item in &items {
                    *per_schema.entry(self.query.schema_of(item).to_string()).or_insert(0) += 1;
                }

                if let Err(e) = ctx.state_store.put(self.query.phase_key(), &items) {
                    return JobResult::failure(e.into());
                }

                reporter.report(99, "done", "");
                JobResult::success(
                    serde_json::json!({ "phaseKey": self.query.phase_key() }),
                    serde_json::json!({
                        "total": items.len(),
                        "perSchema": per_schema,
                        "rowErrors": row_errors,
                    }),
                )
            }
            Err(e) => JobResult::failure(e.into()),
        }
    }
}
