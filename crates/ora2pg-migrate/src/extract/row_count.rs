//! RowCountExtract (spec §4.7, §4.9): unlike the other extractors this one
//! does not read a single dictionary view — it issues one `SELECT COUNT(*)`
//! per table already published by `TableExtractor`, so it is a bespoke
//! `Job` rather than an `ExtractorQuery` plugged into the generic scaffold.
//! `DataTransferEngine` (spec §4.9) reads its output to classify each
//! table's transfer outcome.

use async_trait::async_trait;
use ora2pg_db::phase_keys;
use ora2pg_jobs::{Job, JobContext, JobDescription, ProgressReporter};
use ora2pg_model::{DatabaseTag, JobResult, OperationKind, RowCount, RowCountValue, Table};

pub struct RowCountExtractor;

#[async_trait]
impl Job for RowCountExtractor {
    fn describe(&self) -> JobDescription {
        JobDescription {
            kind: OperationKind::RowCountExtract,
            database: DatabaseTag::Oracle,
            friendly_name: "Extract row counts".to_string(),
        }
    }

    async fn run(&self, ctx: &JobContext, reporter: &ProgressReporter) -> JobResult {
        reporter.report(0, "loading table list", "");

        let tables: Vec<Table> = match ctx.state_store.get(phase_keys::ORACLE_TABLES) {
            Ok(Some(tables)) => tables,
            Ok(None) => Vec::new(),
            Err(e) => return JobResult::failure(e.into()),
        };

        let total = tables.len();
        let mut counts = Vec::with_capacity(total);

        for (index, table) in tables.into_iter().enumerate() {
            if ctx.is_cancelled() {
                break;
            }

            let qualified = format!("{}.{}", table.schema, table.name);
            let count_result = ctx
                .connections
                .with_oracle(move |conn| {
                    let sql = format!("SELECT COUNT(*) FROM {qualified}");
                    let (count,): (i64,) = conn.query_row_as(&sql, &[])?;
                    Ok(count)
                })
                .await;

            let row_count = match count_result {
                Ok(count) => RowCountValue::Count(count),
                Err(_) => RowCountValue::Error,
            };

            counts.push(RowCount {
                schema: table.schema,
                table_name: table.name,
                row_count,
            });

            if total > 0 {
                let pct = ((index + 1) * 80 / total).min(80) as u8;
                reporter.report(pct, "counting rows", format!("{}/{}", index + 1, total));
            }
        }

        if let Err(e) = ctx.state_store.put(phase_keys::ORACLE_ROW_COUNTS, &counts) {
            return JobResult::failure(e.into());
        }

        let errored = counts.iter().filter(|c| matches!(c.row_count, RowCountValue::Error)).count();
        reporter.report(99, "done", "");
        JobResult::success(
            serde_json::json!({ "phaseKey": phase_keys::ORACLE_ROW_COUNTS }),
            serde_json::json!({ "total": counts.len(), "errored": errored }),
        )
    }
}
