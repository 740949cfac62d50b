//! Shared Creator scaffold (spec §4.8, §9 "a shared helper that handles
//! conflict classification, timing, and summary emission"). `DdlCreator`
//! captures what differs between object kinds — where to read items from
//! and how to render one item's DDL; `CreatorJob` runs every item through
//! its own `BEGIN; ddl; COMMIT;` transaction once, classifying the outcome
//! via `sql_classify`.

use std::sync::Arc;

use async_trait::async_trait;
use ora2pg_jobs::{Job, JobContext, JobDescription, ProgressReporter};
use ora2pg_model::{CreationOutcome, DatabaseTag, ErrorInfo, ErrorKind, JobResult, OperationKind};
use serde::Serialize;
use sqlx::Connection;

use crate::sql_classify::{is_conflict, sqlstate_of};

pub trait DdlCreator: Send + Sync + 'static {
    type Item: Serialize + Clone + Send + Sync + 'static;

    fn operation_kind(&self) -> OperationKind;
    fn friendly_name(&self) -> &'static str;

    /// Reads the items to create from `StateStore`, already filtered/sorted
    /// into the order they must be applied in (e.g. `ConstraintCreator`'s
    /// P -> U -> R -> C ordering).
    fn load_items(&self, ctx: &JobContext) -> Result<Vec<Self::Item>, ora2pg_model::ErrorInfo>;

    /// One or more DDL statements to run inside a single transaction for
    /// this item. Returning more than one lets a creator pair a
    /// `DROP ... IF EXISTS` with its `CREATE` (e.g. stub -> implementation).
    fn ddl_for(&self, item: &Self::Item) -> Vec<String>;

    /// Used to label `errors`/`skipped` entries; defaults to the item's
    /// `Debug` representation if not overridden... kept explicit instead
    /// since `Item` is not required to implement `Debug`.
    fn item_label(&self, item: &Self::Item) -> String;
}

pub struct CreatorJob<C: DdlCreator> {
    creator: Arc<C>,
}

impl<C: DdlCreator> CreatorJob<C> {
    pub fn new(creator: C) -> Self {
        Self { creator: Arc::new(creator) }
    }
}

#[async_trait]
impl<C: DdlCreator> Job for CreatorJob<C> {
    fn describe(&self) -> JobDescription {
        JobDescription {
            kind: self.creator.operation_kind(),
            database: DatabaseTag::Postgres,
            friendly_name: self.creator.friendly_name().to_string(),
        }
    }

    async fn run(&self, ctx: &JobContext, reporter: &ProgressReporter) -> JobResult {
        reporter.report(0, "loading items to create", "");

        let items = match self.creator.load_items(ctx) {
            Ok(items) => items,
            Err(e) => return JobResult::failure(e),
        };

        let mut outcome: CreationOutcome<C::Item> = CreationOutcome::new();
        let total = items.len();

        for (index, item) in items.into_iter().enumerate() {
            if ctx.is_cancelled() {
                return JobResult::failure(ErrorInfo::new(ErrorKind::Cancelled, "cancelled by user"));
            }

            let statements = self.creator.ddl_for(&item);
            let label = self.creator.item_label(&item);

            let result = ctx
                .connections
                .with_postgres(move |mut conn| {
                    let statements = statements.clone();
                    async move {
                        let mut tx = conn.begin().await?;
                        for stmt in &statements {
                            sqlx::query(stmt).execute(&mut *tx).await?;
                        }
                        tx.commit().await?;
                        Ok(())
                    }
                })
                .await;

            match result {
                Ok(()) => outcome.push_created(item),
                Err(db_err) => {
                    let sqlstate = match &db_err {
                        ora2pg_db::DbError::Postgres(e) => sqlstate_of(e),
                        _ => None,
                    };
                    if is_conflict(sqlstate.as_deref()) {
                        outcome.push_skipped(item, "already exists");
                    } else {
                        let ddl = self.creator.ddl_for(&item).join(";\n");
                        outcome.push_error(item, db_err.to_string(), Some(ddl));
                    }
                    tracing::debug!(item = %label, "creator item did not succeed");
                }
            }

            if total > 0 {
                let pct = ((index + 1) * 80 / total).min(80) as u8;
                reporter.report(pct, "creating", format!("{}/{}", index + 1, total));
            }
        }

        reporter.report(99, "done", "");
        let summary = serde_json::to_value(&outcome).unwrap_or(serde_json::Value::Null);
        JobResult::success(serde_json::json!({ "createdCount": outcome.created.len() }), summary)
    }
}
