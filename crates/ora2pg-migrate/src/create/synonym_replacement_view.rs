//! SynonymReplacementViews (spec §4.8): `CREATE VIEW synonymSchema.name AS
//! SELECT * FROM targetSchema.target` for every local synonym. Synonyms
//! with a `dbLink` are skipped with reason `"remote synonym"` — they point
//! at a database this system never connects to.

use ora2pg_db::phase_keys;
use ora2pg_jobs::{Job, JobContext, JobDescription, ProgressReporter};
use ora2pg_model::{CreationOutcome, DatabaseTag, ErrorInfo, ErrorKind, JobResult, OperationKind, Synonym};
use ora2pg_typemap::map_identifier;
use async_trait::async_trait;
use sqlx::Connection;

use crate::sql_classify::{is_conflict, sqlstate_of};

pub struct SynonymReplacementViewCreator;

#[async_trait]
impl Job for SynonymReplacementViewCreator {
    fn describe(&self) -> JobDescription {
        JobDescription {
            kind: OperationKind::SynonymReplacementViews,
            database: DatabaseTag::Postgres,
            friendly_name: "Create synonym replacement views".to_string(),
        }
    }

    async fn run(&self, ctx: &JobContext, reporter: &ProgressReporter) -> JobResult {
        reporter.report(0, "loading synonyms", "");

        let synonyms: Vec<Synonym> = match ctx.state_store.get(phase_keys::ORACLE_SYNONYMS) {
            Ok(Some(items)) => items,
            Ok(None) => Vec::new(),
            Err(e) => return JobResult::failure(e.into()),
        };

        let mut outcome: CreationOutcome<Synonym> = CreationOutcome::new();
        let total = synonyms.len();

        for (index, synonym) in synonyms.into_iter().enumerate() {
            if ctx.is_cancelled() {
                return JobResult::failure(ErrorInfo::new(ErrorKind::Cancelled, "cancelled by user"));
            }

            if synonym.is_remote() {
                outcome.push_skipped(synonym, "remote synonym");
                continue;
            }

            let statement = format!(
                "CREATE VIEW {}.{} AS SELECT * FROM {}.{}",
                synonym.owner.to_lowercase(),
                map_identifier(&synonym.synonym_name),
                synonym.target_owner.to_lowercase(),
                map_identifier(&synonym.target_name),
            );
            let ddl = statement.clone();

            let result = ctx
                .connections
                .with_postgres(move |mut conn| async move {
                    let mut tx = conn.begin().await?;
                    sqlx::query(&statement).execute(&mut *tx).await?;
                    tx.commit().await?;
                    Ok(())
                })
                .await;

            match result {
                Ok(()) => outcome.push_created(synonym),
                Err(db_err) => {
                    let sqlstate = match &db_err {
                        ora2pg_db::DbError::Postgres(e) => sqlstate_of(e),
                        _ => None,
                    };
                    if is_conflict(sqlstate.as_deref()) {
                        outcome.push_skipped(synonym, "already exists");
                    } else {
                        outcome.push_error(synonym, db_err.to_string(), Some(ddl));
                    }
                }
            }

            if total > 0 {
                let pct = ((index + 1) * 80 / total).min(80) as u8;
                reporter.report(pct, "creating synonym views", format!("{}/{}", index + 1, total));
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
    fn remote_synonyms_are_recognizable_before_any_db_call() {
        let remote = Synonym {
            owner: "hr".into(),
            synonym_name: "emp".into(),
            target_owner: "hr".into(),
            target_name: "employees".into(),
            db_link: Some("remote_db".into()),
        };
        assert!(remote.is_remote());
    }
}
