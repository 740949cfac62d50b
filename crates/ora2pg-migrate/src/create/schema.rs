//! SchemaCreate (spec §4.8): `CREATE SCHEMA` for every extracted schema.

use ora2pg_db::phase_keys;
use ora2pg_jobs::JobContext;
use ora2pg_model::{ErrorInfo, OperationKind, Schema};
use ora2pg_typemap::map_identifier;

use super::generic::DdlCreator;

pub struct SchemaCreator;

impl DdlCreator for SchemaCreator {
    type Item = Schema;

    fn operation_kind(&self) -> OperationKind {
        OperationKind::SchemaCreate
    }

    fn friendly_name(&self) -> &'static str {
        "Create schemas"
    }

    fn load_items(&self, ctx: &JobContext) -> Result<Vec<Self::Item>, ErrorInfo> {
        ctx.state_store
            .get(phase_keys::ORACLE_SCHEMAS)
            .map(|opt| opt.unwrap_or_default())
            .map_err(Into::into)
    }

    fn ddl_for(&self, item: &Self::Item) -> Vec<String> {
        vec![format!("CREATE SCHEMA {}", map_identifier(&item.name))]
    }

    fn item_label(&self, item: &Self::Item) -> String {
        item.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ddl_creates_a_lowercased_schema() {
        let creator = SchemaCreator;
        let ddl = creator.ddl_for(&Schema { name: "HR".into() });
        assert_eq!(ddl, vec!["CREATE SCHEMA hr".to_string()]);
    }
}
