//! DataTransferEngine (spec §4.9): copies table rows Oracle -> PostgreSQL,
//! batched by `commitInterval`, with per-table error isolation and LOB
//! handling gated by `exclude.lob-data`.

use async_trait::async_trait;
use sqlx::Connection;

use ora2pg_db::phase_keys;
use ora2pg_jobs::{Job, JobContext, JobDescription, ProgressReporter};
use ora2pg_model::{DatabaseTag, ErrorInfo, ErrorKind, JobResult, OperationKind, RowCount, RowCountValue, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
enum TransferOutcome {
    Transferred,
    Partial,
    Skipped,
    Error,
}

#[derive(serde::Serialize)]
struct TableTransferResult {
    schema: String,
    table_name: String,
    rows_transferred: i64,
    duration_ms: u64,
    outcome: TransferOutcome,
    errors: Vec<String>,
}

/// Whether an Oracle column type is treated as a LOB for the purpose of
/// `exclude.lob-data` (spec §9: "treat `LONG` as a LOB for the purpose of
/// exclusion", resolving the open question the original leaves unstated).
fn is_lob_type(oracle_type: &str) -> bool {
    matches!(
        oracle_type.to_uppercase().as_str(),
        "CLOB" | "NCLOB" | "BLOB" | "LONG" | "LONG RAW" | "BFILE"
    )
}

pub struct DataTransferEngine;

#[async_trait]
impl Job for DataTransferEngine {
    fn describe(&self) -> JobDescription {
        JobDescription {
            kind: OperationKind::DataTransfer,
            database: DatabaseTag::Oracle,
            friendly_name: "Transfer table data".to_string(),
        }
    }

    async fn run(&self, ctx: &JobContext, reporter: &ProgressReporter) -> JobResult {
        reporter.report(0, "loading tables", "");

        let tables: Vec<Table> = match ctx.state_store.get(phase_keys::ORACLE_TABLES) {
            Ok(Some(tables)) => tables,
            Ok(None) => Vec::new(),
            Err(e) => return JobResult::failure(e.into()),
        };
        let row_counts: Vec<RowCount> = match ctx.state_store.get(phase_keys::ORACLE_ROW_COUNTS) {
            Ok(Some(counts)) => counts,
            Ok(None) => Vec::new(),
            Err(e) => return JobResult::failure(e.into()),
        };

        let total = tables.len();
        let mut results = Vec::with_capacity(total);

        for (index, table) in tables.iter().enumerate() {
            if ctx.is_cancelled() {
                return JobResult::failure(ErrorInfo::new(ErrorKind::Cancelled, "cancelled by user"));
            }

            let source_row_count = row_counts
                .iter()
                .find(|rc| rc.schema == table.schema && rc.table_name == table.name)
                .and_then(|rc| match rc.row_count {
                    RowCountValue::Count(n) => Some(n),
                    RowCountValue::Error => None,
                });

            let result = transfer_table(ctx, table, source_row_count).await;
            results.push(result);

            if total > 0 {
                let pct = ((index + 1) * 95 / total).min(95) as u8;
                reporter.report(pct, "transferring data", format!("{}/{}", index + 1, total));
            }
        }

        reporter.report(99, "done", "");
        let transferred = results.iter().filter(|r| r.outcome == TransferOutcome::Transferred).count();
        let partial = results.iter().filter(|r| r.outcome == TransferOutcome::Partial).count();
        let errored = results.iter().filter(|r| r.outcome == TransferOutcome::Error).count();
        let skipped = results.iter().filter(|r| r.outcome == TransferOutcome::Skipped).count();

        JobResult::success(
            serde_json::json!({ "total": results.len() }),
            serde_json::json!({
                "transferred": transferred,
                "partial": partial,
                "skipped": skipped,
                "errored": errored,
                "tables": results,
            }),
        )
    }
}

async fn transfer_table(
    ctx: &JobContext,
    table: &Table,
    source_row_count: Option<i64>,
) -> TableTransferResult {
    let started = std::time::Instant::now();
    let exclude_lob = ctx.config.exclude_lob_data;
    let commit_interval = ctx.config.commit_interval.max(1) as usize;

    let column_list: Vec<String> = table
        .columns
        .iter()
        .filter(|c| !(exclude_lob && is_lob_type(&c.oracle_type)))
        .map(|c| c.name.clone())
        .collect();

    if column_list.is_empty() {
        return TableTransferResult {
            schema: table.schema.clone(),
            table_name: table.name.clone(),
            rows_transferred: 0,
            duration_ms: started.elapsed().as_millis() as u64,
            outcome: TransferOutcome::Skipped,
            errors: vec!["no transferable columns".to_string()],
        };
    }

    let qualified_oracle = format!("{}.{}", table.schema, table.name);
    let select_sql = format!("SELECT {} FROM {}", column_list.join(", "), qualified_oracle);
    let qualified_pg = format!("{}.{}", table.schema.to_lowercase(), table.name.to_lowercase());

    let rows_result: Result<Vec<Vec<String>>, ora2pg_db::DbError> = ctx
        .connections
        .with_oracle(move |conn| {
            let mut rows = Vec::new();
            let result_set = conn.query(select_sql.as_str(), &[])?;
            for row_result in result_set {
                let row = row_result?;
                let mut values = Vec::new();
                for index in 0..column_list.len() {
                    let value: Option<String> = row.get(index)?;
                    values.push(value.unwrap_or_default());
                }
                rows.push(values);
            }
            Ok(rows)
        })
        .await;

    let rows = match rows_result {
        Ok(rows) => rows,
        Err(e) => {
            return TableTransferResult {
                schema: table.schema.clone(),
                table_name: table.name.clone(),
                rows_transferred: 0,
                duration_ms: started.elapsed().as_millis() as u64,
                outcome: TransferOutcome::Error,
                errors: vec![e.to_string()],
            };
        }
    };

    if rows.is_empty() {
        return TableTransferResult {
            schema: table.schema.clone(),
            table_name: table.name.clone(),
            rows_transferred: 0,
            duration_ms: started.elapsed().as_millis() as u64,
            outcome: TransferOutcome::Skipped,
            errors: Vec::new(),
        };
    }

    let placeholders: Vec<String> = (1..=column_list.len()).map(|i| format!("${i}")).collect();
    let insert_sql = format!(
        "INSERT INTO {qualified_pg} ({}) VALUES ({})",
        column_list.join(", "),
        placeholders.join(", ")
    );

    let mut transferred = 0i64;
    let mut errors = Vec::new();

    for batch in rows.chunks(commit_interval) {
        let batch = batch.to_vec();
        let insert_sql = insert_sql.clone();
        let batch_result = ctx
            .connections
            .with_postgres(move |mut conn| async move {
                let mut tx = conn.begin().await?;
                let mut count = 0i64;
                for row in &batch {
                    let mut query = sqlx::query(&insert_sql);
                    for value in row {
                        query = query.bind(value);
                    }
                    query.execute(&mut *tx).await?;
                    count += 1;
                }
                tx.commit().await?;
                Ok(count)
            })
            .await;

        match batch_result {
            Ok(count) => transferred += count,
            Err(e) => errors.push(e.to_string()),
        }
    }

    let outcome = if source_row_count == Some(transferred) {
        TransferOutcome::Transferred
    } else if transferred > 0 {
        TransferOutcome::Partial
    } else if !errors.is_empty() {
        TransferOutcome::Error
    } else {
        TransferOutcome::Skipped
    };

    TableTransferResult {
        schema: table.schema.clone(),
        table_name: table.name.clone(),
        rows_transferred: transferred,
        duration_ms: started.elapsed().as_millis() as u64,
        outcome,
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_is_treated_as_a_lob() {
        assert!(is_lob_type("LONG"));
        assert!(is_lob_type("clob"));
        assert!(!is_lob_type("VARCHAR2"));
    }
}
