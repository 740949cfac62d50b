//! TableCreate (spec §4.8): `CREATE TABLE` without constraints (constraints
//! are added later by `ConstraintCreator`). A column whose Oracle default
//! can't be mapped is created without a default and recorded in
//! `summary.unmappedDefaults` rather than failing the table. This is a
//! bespoke `Job`, not the generic `CreatorJob`, because its summary shape
//! needs that extra field beyond plain `CreationOutcome`.

use async_trait::async_trait;
use sqlx::Connection;

use ora2pg_db::phase_keys;
use ora2pg_jobs::{Job, JobContext, JobDescription, ProgressReporter};
use ora2pg_model::{CreationOutcome, DatabaseTag, ErrorInfo, ErrorKind, JobResult, ObjectDataType, OperationKind, Table};
use ora2pg_typemap::{map_default_expression, map_identifier, ColumnTypeInput, MappedDefault, MappedType};

use crate::sql_classify::{is_conflict, sqlstate_of};

pub struct TableCreator;

struct UnmappedDefault {
    table: String,
    column: String,
    oracle_default: String,
}

fn object_type_lookup(object_types: &[ObjectDataType]) -> impl Fn(&str) -> Option<String> + '_ {
    move |name: &str| {
        let upper = name.to_uppercase();
        object_types.iter().find(|t| t.name.to_uppercase() == upper).map(|t| t.schema.clone())
    }
}

fn table_ddl(table: &Table, object_types: &[ObjectDataType], unmapped_defaults: &mut Vec<UnmappedDefault>) -> String {
    let lookup = object_type_lookup(object_types);
    let columns: Vec<String> = table
        .columns
        .iter()
        .map(|col| {
            let input = match (col.precision, col.scale) {
                (Some(p), Some(s)) => ColumnTypeInput::new(&col.oracle_type).with_precision_scale(p, s),
                _ => match col.length {
                    Some(l) => ColumnTypeInput::new(&col.oracle_type).with_length(l),
                    None => ColumnTypeInput::new(&col.oracle_type),
                },
            };
            let sql_type = match ora2pg_typemap::map_column_type(&input, &lookup) {
                MappedType::Mapped(ty) => ty,
                MappedType::Unmapped(_) => "text".to_string(),
            };

            let mut fragment = format!("{} {}", map_identifier(&col.name), sql_type);
            if !col.nullable {
                fragment.push_str(" NOT NULL");
            }
            if let Some(default_expr) = &col.default_expression {
                match map_default_expression(default_expr, &table.schema) {
                    MappedDefault::Mapped(expr) => {
                        fragment.push_str(" DEFAULT ");
                        fragment.push_str(&expr);
                    }
                    MappedDefault::Unmapped(_) => {
                        unmapped_defaults.push(UnmappedDefault {
                            table: table.qualified_name(),
                            column: col.name.clone(),
                            oracle_default: default_expr.clone(),
                        });
                    }
                }
            }
            fragment
        })
        .collect();

    format!(
        "CREATE TABLE {}.{} ({})",
        table.schema.to_lowercase(),
        map_identifier(&table.name),
        columns.join(", ")
    )
}

#[async_trait]
impl Job for TableCreator {
    fn describe(&self) -> JobDescription {
        JobDescription {
            kind: OperationKind::TableCreate,
            database: DatabaseTag::Postgres,
            friendly_name: "Create tables".to_string(),
        }
    }

    async fn run(&self, ctx: &JobContext, reporter: &ProgressReporter) -> JobResult {
        reporter.report(0, "loading tables", "");

        let tables: Vec<Table> = match ctx.state_store.get(phase_keys::ORACLE_TABLES) {
            Ok(Some(tables)) => tables,
            Ok(None) => Vec::new(),
            Err(e) => return JobResult::failure(e.into()),
        };
        let object_types: Vec<ObjectDataType> = match ctx.state_store.get(phase_keys::ORACLE_OBJECT_TYPES) {
            Ok(Some(types)) => types,
            Ok(None) => Vec::new(),
            Err(e) => return JobResult::failure(e.into()),
        };

        let mut outcome: CreationOutcome<Table> = CreationOutcome::new();
        let mut unmapped_defaults = Vec::new();
        let total = tables.len();

        for (index, table) in tables.into_iter().enumerate() {
            if ctx.is_cancelled() {
                return JobResult::failure(ErrorInfo::new(ErrorKind::Cancelled, "cancelled by user"));
            }

            let ddl = table_ddl(&table, &object_types, &mut unmapped_defaults);
            let statement = ddl.clone();

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
                Ok(()) => outcome.push_created(table),
                Err(db_err) => {
                    let sqlstate = match &db_err {
                        ora2pg_db::DbError::Postgres(e) => sqlstate_of(e),
                        _ => None,
                    };
                    if is_conflict(sqlstate.as_deref()) {
                        outcome.push_skipped(table, "already exists");
                    } else {
                        outcome.push_error(table, db_err.to_string(), Some(ddl));
                    }
                }
            }

            if total > 0 {
                let pct = ((index + 1) * 80 / total).min(80) as u8;
                reporter.report(pct, "creating tables", format!("{}/{}", index + 1, total));
            }
        }

        reporter.report(99, "done", "");
        let unmapped_json: Vec<serde_json::Value> = unmapped_defaults
            .iter()
            .map(|u| {
                serde_json::json!({
                    "table": u.table,
                    "column": u.column,
                    "oracleDefault": u.oracle_default,
                })
            })
            .collect();

        let mut summary = serde_json::to_value(&outcome).unwrap_or(serde_json::Value::Null);
        if let serde_json::Value::Object(ref mut map) = summary {
            map.insert("unmappedDefaults".to_string(), serde_json::Value::Array(unmapped_json));
        }

        JobResult::success(serde_json::json!({ "createdCount": outcome.created.len() }), summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str, oracle_type: &str, nullable: bool, default_expression: Option<&str>) -> ora2pg_model::Column {
        ora2pg_model::Column {
            name: name.into(),
            oracle_type: oracle_type.into(),
            length: None,
            precision: None,
            scale: None,
            nullable,
            default_expression: default_expression.map(str::to_string),
            position_ordinal: 1,
        }
    }

    #[test]
    fn not_null_and_mappable_defaults_are_emitted_inline() {
        let table = Table {
            schema: "HR".into(),
            name: "EMP".into(),
            columns: vec![column("HIRED_AT", "DATE", false, Some("SYSDATE"))],
            constraints: None,
        };
        let mut unmapped = Vec::new();
        let ddl = table_ddl(&table, &[], &mut unmapped);
        assert_eq!(ddl, "CREATE TABLE hr.emp (hired_at timestamp(0) NOT NULL DEFAULT CURRENT_TIMESTAMP)");
        assert!(unmapped.is_empty());
    }

    #[test]
    fn an_unmappable_default_is_recorded_without_a_default_clause() {
        let table = Table {
            schema: "HR".into(),
            name: "EMP".into(),
            columns: vec![column("BADGE", "VARCHAR2", true, Some("some_weird_function()"))],
            constraints: None,
        };
        let mut unmapped = Vec::new();
        let ddl = table_ddl(&table, &[], &mut unmapped);
        assert!(!ddl.contains("DEFAULT"));
        assert_eq!(unmapped.len(), 1);
        assert_eq!(unmapped[0].column, "BADGE");
        assert_eq!(unmapped[0].table, "HR.EMP");
    }

    #[test]
    fn an_object_typed_column_resolves_via_the_lookup() {
        let object_types = vec![ObjectDataType { schema: "HR".into(), name: "ADDRESS_T".into(), variables: vec![] }];
        let table = Table {
            schema: "HR".into(),
            name: "EMP".into(),
            columns: vec![column("HOME_ADDRESS", "ADDRESS_T", true, None)],
            constraints: None,
        };
        let mut unmapped = Vec::new();
        let ddl = table_ddl(&table, &object_types, &mut unmapped);
        assert!(ddl.contains("home_address hr.address_t"));
    }
}
