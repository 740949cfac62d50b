//! ViewVerify/TriggerVerify (`OperationKind`): post-implementation checks
//! confirming the object actually exists in `pg_catalog`, the same
//! presence-check idea as `CompatibilityVerifier` (spec §4.11) applied to
//! views and triggers rather than the compatibility catalogue.

use async_trait::async_trait;

use ora2pg_db::phase_keys;
use ora2pg_jobs::{Job, JobContext, JobDescription, ProgressReporter};
use ora2pg_model::{DatabaseTag, ErrorInfo, ErrorKind, JobResult, OperationKind, Trigger, View};

pub struct ViewVerifier;

#[async_trait]
impl Job for ViewVerifier {
    fn describe(&self) -> JobDescription {
        JobDescription {
            kind: OperationKind::ViewVerify,
            database: DatabaseTag::Postgres,
            friendly_name: "Verify views".to_string(),
        }
    }

    async fn run(&self, ctx: &JobContext, reporter: &ProgressReporter) -> JobResult {
        reporter.report(0, "verifying views", "");

        let views: Vec<View> = match ctx.state_store.get(phase_keys::ORACLE_VIEWS) {
            Ok(Some(items)) => items,
            Ok(None) => Vec::new(),
            Err(e) => return JobResult::failure(e.into()),
        };

        let mut verified = Vec::new();
        let mut missing = Vec::new();
        let total = views.len();

        for (index, view) in views.iter().enumerate() {
            if ctx.is_cancelled() {
                return JobResult::failure(ErrorInfo::new(ErrorKind::Cancelled, "cancelled by user"));
            }

            let schema = view.schema.to_lowercase();
            let name = view.view_name.to_lowercase();
            let exists = ctx
                .connections
                .with_postgres(move |mut conn| async move {
                    let (count,): (i64,) = sqlx::query_as(
                        "SELECT COUNT(*) FROM pg_views WHERE schemaname = $1 AND viewname = $2",
                    )
                    .bind(&schema)
                    .bind(&name)
                    .fetch_one(&mut *conn)
                    .await?;
                    Ok(count > 0)
                })
                .await
                .unwrap_or(false);

            let label = format!("{}.{}", view.schema, view.view_name);
            if exists {
                verified.push(label);
            } else {
                missing.push(label);
            }

            if total > 0 {
                let pct = ((index + 1) * 99 / total).min(99) as u8;
                reporter.report(pct, "verifying views", format!("{}/{}", index + 1, total));
            }
        }

        JobResult::success(
            serde_json::json!({ "verifiedCount": verified.len() }),
            serde_json::json!({ "verified": verified, "missing": missing }),
        )
    }
}

pub struct TriggerVerifier;

#[async_trait]
impl Job for TriggerVerifier {
    fn describe(&self) -> JobDescription {
        JobDescription {
            kind: OperationKind::TriggerVerify,
            database: DatabaseTag::Postgres,
            friendly_name: "Verify triggers".to_string(),
        }
    }

    async fn run(&self, ctx: &JobContext, reporter: &ProgressReporter) -> JobResult {
        reporter.report(0, "verifying triggers", "");

        let triggers: Vec<Trigger> = match ctx.state_store.get(phase_keys::ORACLE_TRIGGERS) {
            Ok(Some(items)) => items,
            Ok(None) => Vec::new(),
            Err(e) => return JobResult::failure(e.into()),
        };

        let mut verified = Vec::new();
        let mut missing = Vec::new();
        let total = triggers.len();

        for (index, trigger) in triggers.iter().enumerate() {
            if ctx.is_cancelled() {
                return JobResult::failure(ErrorInfo::new(ErrorKind::Cancelled, "cancelled by user"));
            }

            let name = trigger.trigger_name.to_lowercase();
            let table = trigger.table_name.to_lowercase();
            let schema = trigger.schema.to_lowercase();
            let exists = ctx
                .connections
                .with_postgres(move |mut conn| async move {
                    let (count,): (i64,) = sqlx::query_as(
                        "SELECT COUNT(*) FROM pg_trigger t \
                         JOIN pg_class c ON c.oid = t.tgrelid \
                         JOIN pg_namespace n ON n.oid = c.relnamespace \
                         WHERE n.nspname = $1 AND c.relname = $2 AND t.tgname = $3",
                    )
                    .bind(&schema)
                    .bind(&table)
                    .bind(&name)
                    .fetch_one(&mut *conn)
                    .await?;
                    Ok(count > 0)
                })
                .await
                .unwrap_or(false);

            let label = format!("{}.{}", trigger.table_name, trigger.trigger_name);
            if exists {
                verified.push(label);
            } else {
                missing.push(label);
            }

            if total > 0 {
                let pct = ((index + 1) * 99 / total).min(99) as u8;
                reporter.report(pct, "verifying triggers", format!("{}/{}", index + 1, total));
            }
        }

        JobResult::success(
            serde_json::json!({ "verifiedCount": verified.len() }),
            serde_json::json!({ "verified": verified, "missing": missing }),
        )
    }
}
