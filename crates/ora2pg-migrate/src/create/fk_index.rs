//! FKIndexCreate (spec §4.8): one b-tree index per foreign key, skipped when
//! an existing index already covers the referencing columns (first-column
//! match). Checking coverage needs a `pg_indexes` read before deciding
//! whether to write, so this is a bespoke `Job` rather than the generic
//! `CreatorJob`, which only classifies after attempting a write.

use async_trait::async_trait;

use ora2pg_db::phase_keys;
use ora2pg_jobs::{Job, JobContext, JobDescription, ProgressReporter};
use ora2pg_model::{
    Constraint, ConstraintType, CreationOutcome, DatabaseTag, ErrorInfo, ErrorKind, JobResult, OperationKind,
};
use ora2pg_typemap::map_identifier;

use crate::sql_classify::{is_conflict, sqlstate_of};

pub struct FkIndexCreator;

/// Whether any `indexdef` in `defs` has `first_column` as its leading key
/// column. Oracle only needs the leading column of an FK index to benefit
/// lookups, so a composite index covering it still counts.
fn any_index_leads_with(defs: &[String], first_column: &str) -> bool {
    let first_column = first_column.to_lowercase();
    defs.iter().any(|def| {
        def.split('(')
            .nth(1)
            .and_then(|rest| rest.split(')').next())
            .and_then(|cols| cols.split(',').next())
            .map(|first| first.trim().trim_matches('"') == first_column)
            .unwrap_or(false)
    })
}

async fn first_column_is_covered(
    ctx: &JobContext,
    schema: &str,
    table: &str,
    first_column: &str,
) -> Result<bool, ora2pg_db::DbError> {
    let schema = schema.to_string();
    let table = table.to_string();
    let first_column = first_column.to_string();

    ctx.connections
        .with_postgres(move |mut conn| async move {
            let rows: Vec<(String,)> = sqlx::query_as(
                "SELECT indexdef FROM pg_indexes WHERE schemaname = $1 AND tablename = $2",
            )
            .bind(&schema)
            .bind(&table)
            .fetch_all(&mut *conn)
            .await?;

            let defs: Vec<String> = rows.into_iter().map(|(def,)| def).collect();
            Ok(any_index_leads_with(&defs, &first_column))
        })
        .await
}

#[async_trait]
impl Job for FkIndexCreator {
    fn describe(&self) -> JobDescription {
        JobDescription {
            kind: OperationKind::FkIndexCreate,
            database: DatabaseTag::Postgres,
            friendly_name: "Create foreign-key indexes".to_string(),
        }
    }

    async fn run(&self, ctx: &JobContext, reporter: &ProgressReporter) -> JobResult {
        reporter.report(0, "loading constraints", "");

        let constraints: Vec<Constraint> = match ctx.state_store.get(phase_keys::ORACLE_CONSTRAINTS) {
            Ok(Some(items)) => items,
            Ok(None) => Vec::new(),
            Err(e) => return JobResult::failure(e.into()),
        };
        let foreign_keys: Vec<Constraint> =
            constraints.into_iter().filter(|c| c.constraint_type == ConstraintType::ForeignKey).collect();

        let mut outcome: CreationOutcome<Constraint> = CreationOutcome::new();
        let total = foreign_keys.len();

        for (index, fk) in foreign_keys.into_iter().enumerate() {
            if ctx.is_cancelled() {
                return JobResult::failure(ErrorInfo::new(ErrorKind::Cancelled, "cancelled by user"));
            }

            let Some(first_column) = fk.columns.first().cloned() else {
                outcome.push_skipped(fk, "no referencing columns");
                continue;
            };

            match first_column_is_covered(ctx, &fk.schema, &fk.table_name, &first_column).await {
                Ok(true) => {
                    outcome.push_skipped(fk, "covered by existing index");
                    continue;
                }
                Ok(false) => {}
                Err(e) => {
                    outcome.push_error(fk, e.to_string(), None);
                    continue;
                }
            }

            let index_name = map_identifier(&format!("idx_{}_{}", fk.table_name, fk.constraint_name));
            let columns: Vec<String> = fk.columns.iter().map(|c| map_identifier(c)).collect();
            let statement = format!(
                "CREATE INDEX {} ON {}.{} ({})",
                index_name,
                fk.schema.to_lowercase(),
                map_identifier(&fk.table_name),
                columns.join(", ")
            );

            let db_result = ctx.connections.with_postgres(move |mut conn| {
                let statement = statement.clone();
                async move {
                    sqlx::query(&statement).execute(&mut *conn).await?;
                    Ok(())
                }
            }).await;

            match db_result {
                Ok(()) => outcome.push_created(fk),
                Err(db_err) => {
                    let sqlstate = match &db_err {
                        ora2pg_db::DbError::Postgres(e) => sqlstate_of(e),
                        _ => None,
                    };
                    if is_conflict(sqlstate.as_deref()) {
                        outcome.push_skipped(fk, "already exists");
                    } else {
                        outcome.push_error(fk, db_err.to_string(), None);
                    }
                }
            }

            if total > 0 {
                let pct = ((index + 1) * 80 / total).min(80) as u8;
                reporter.report(pct, "indexing foreign keys", format!("{}/{}", index + 1, total));
            }
        }

        reporter.report(99, "done", "");
        let summary = serde_json::to_value(&outcome).unwrap_or(serde_json::Value::Null);
        JobResult::success(serde_json::json!({ "createdCount": outcome.created.len() }), summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_composite_index_leading_with_the_fk_column_counts_as_covered() {
        let defs = vec!["CREATE INDEX idx_emp_dept ON hr.emp (dept_id, hire_date)".to_string()];
        assert!(any_index_leads_with(&defs, "dept_id"));
        assert!(!any_index_leads_with(&defs, "hire_date"));
    }

    #[test]
    fn no_matching_index_is_not_covered() {
        let defs = vec!["CREATE INDEX idx_emp_name ON hr.emp (name)".to_string()];
        assert!(!any_index_leads_with(&defs, "dept_id"));
    }

    #[test]
    fn quoted_identifiers_are_unquoted_before_comparing() {
        let defs = vec![r#"CREATE INDEX idx_emp_dept ON hr.emp ("dept_id")"#.to_string()];
        assert!(any_index_leads_with(&defs, "dept_id"));
    }
}
