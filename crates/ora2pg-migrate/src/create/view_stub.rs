//! ViewStubCreate (spec §4.8): `CREATE VIEW s.v(c1, c2, ...) AS SELECT
//! NULL::t1, NULL::t2, ... WHERE false` — an empty-result-set view with the
//! correct column list and result types, so forward references from other
//! stubs can resolve before the real body is known.

use ora2pg_db::phase_keys;
use ora2pg_jobs::JobContext;
use ora2pg_model::{ErrorInfo, OperationKind, View};
use ora2pg_typemap::{map_column_type, map_identifier, ColumnTypeInput, MappedType};

use super::generic::DdlCreator;

pub struct ViewStubCreator;

impl DdlCreator for ViewStubCreator {
    type Item = View;

    fn operation_kind(&self) -> OperationKind {
        OperationKind::ViewStubCreate
    }

    fn friendly_name(&self) -> &'static str {
        "Create view stubs"
    }

    fn load_items(&self, ctx: &JobContext) -> Result<Vec<Self::Item>, ErrorInfo> {
        ctx.state_store
            .get(phase_keys::ORACLE_VIEWS)
            .map(|opt| opt.unwrap_or_default())
            .map_err(Into::into)
    }

    fn ddl_for(&self, item: &Self::Item) -> Vec<String> {
        let column_names: Vec<String> = item.columns.iter().map(|c| map_identifier(&c.name)).collect();
        let projections: Vec<String> = item
            .columns
            .iter()
            .map(|c| {
                let input = ColumnTypeInput::new(&c.data_type);
                let sql_type = match map_column_type(&input, |_| None) {
                    MappedType::Mapped(ty) => ty,
                    MappedType::Unmapped(_) => "text".to_string(),
                };
                format!("NULL::{sql_type}")
            })
            .collect();

        vec![format!(
            "CREATE VIEW {}.{}({}) AS SELECT {} WHERE false",
            item.schema.to_lowercase(),
            map_identifier(&item.view_name),
            column_names.join(", "),
            projections.join(", ")
        )]
    }

    fn item_label(&self, item: &Self::Item) -> String {
        format!("{}.{}", item.schema, item.view_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ora2pg_model::ViewColumn;

    #[test]
    fn stub_ddl_is_an_always_false_select_with_typed_nulls() {
        let creator = ViewStubCreator;
        let view = View {
            schema: "HR".into(),
            view_name: "EMP_V".into(),
            columns: vec![
                ViewColumn { name: "ID".into(), data_type: "NUMBER(10,0)".into() },
                ViewColumn { name: "NAME".into(), data_type: "VARCHAR2(50)".into() },
            ],
            oracle_definition_sql: "SELECT id, name FROM emp".into(),
            translated_sql: None,
        };

        let ddl = creator.ddl_for(&view);
        assert_eq!(ddl.len(), 1);
        assert!(ddl[0].starts_with("CREATE VIEW hr.emp_v(id, name) AS SELECT"));
        assert!(ddl[0].ends_with("WHERE false"));
        assert!(ddl[0].contains("NULL::"));
    }
}
