//! ViewImplementation (spec §4.8, §9): drops the stub view and recreates it
//! with the translated SQL body. Runs last in the pipeline (spec §4.12),
//! after the compatibility layer is installed, so translated bodies that
//! reference it already resolve.

use ora2pg_db::phase_keys;
use ora2pg_jobs::JobContext;
use ora2pg_model::{ErrorInfo, OperationKind, View};

use super::generic::DdlCreator;
use crate::view_translate::translate_view_sql;

pub struct ViewImplementationCreator;

impl DdlCreator for ViewImplementationCreator {
    type Item = View;

    fn operation_kind(&self) -> OperationKind {
        OperationKind::ViewImplementation
    }

    fn friendly_name(&self) -> &'static str {
        "Implement views"
    }

    fn load_items(&self, ctx: &JobContext) -> Result<Vec<Self::Item>, ErrorInfo> {
        ctx.state_store
            .get(phase_keys::ORACLE_VIEWS)
            .map(|opt| opt.unwrap_or_default())
            .map_err(Into::into)
    }

    fn ddl_for(&self, item: &Self::Item) -> Vec<String> {
        let qualified = format!("{}.{}", item.schema.to_lowercase(), item.view_name.to_lowercase());
        let body = item
            .translated_sql
            .clone()
            .unwrap_or_else(|| translate_view_sql(&item.oracle_definition_sql));

        vec![
            format!("DROP VIEW IF EXISTS {qualified}"),
            format!("CREATE VIEW {qualified} AS {body}"),
        ]
    }

    fn item_label(&self, item: &Self::Item) -> String {
        format!("{}.{}", item.schema, item.view_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn implementation_drops_the_stub_before_recreating_with_the_real_body() {
        let creator = ViewImplementationCreator;
        let view = View {
            schema: "HR".into(),
            view_name: "EMP_V".into(),
            columns: vec![],
            oracle_definition_sql: "SELECT id FROM emp WHERE hired > SYSDATE - 30".into(),
            translated_sql: None,
        };

        let ddl = creator.ddl_for(&view);
        assert_eq!(ddl.len(), 2);
        assert_eq!(ddl[0], "DROP VIEW IF EXISTS hr.emp_v");
        assert!(ddl[1].starts_with("CREATE VIEW hr.emp_v AS"));
        assert!(ddl[1].contains("CURRENT_TIMESTAMP"));
    }

    #[test]
    fn a_precomputed_translated_sql_is_used_over_the_oracle_body() {
        let creator = ViewImplementationCreator;
        let view = View {
            schema: "HR".into(),
            view_name: "EMP_V".into(),
            columns: vec![],
            oracle_definition_sql: "SELECT id FROM emp".into(),
            translated_sql: Some("SELECT id FROM emp WHERE active".into()),
        };

        let ddl = creator.ddl_for(&view);
        assert!(ddl[1].contains("WHERE active"));
    }
}
