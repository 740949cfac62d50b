//! ObjectTypeCreate (spec §4.8): `CREATE TYPE ... AS (...)` for every
//! extracted Oracle object type. Attribute types that reference another
//! extracted object type resolve to that type's PostgreSQL composite type
//! (spec §4.6); attributes this mapper can't handle fall back to `text` and
//! are recorded as a mapping warning rather than failing the whole type.

use parking_lot::Mutex;

use ora2pg_db::phase_keys;
use ora2pg_jobs::JobContext;
use ora2pg_model::{ErrorInfo, ObjectDataType, OperationKind};
use ora2pg_typemap::{map_identifier, ColumnTypeInput, MappedType};

use super::generic::DdlCreator;

pub struct ObjectTypeCreator {
    known_types: Mutex<Vec<(String, String)>>,
}

impl ObjectTypeCreator {
    pub fn new() -> Self {
        Self { known_types: Mutex::new(Vec::new()) }
    }
}

impl Default for ObjectTypeCreator {
    fn default() -> Self {
        Self::new()
    }
}

impl DdlCreator for ObjectTypeCreator {
    type Item = ObjectDataType;

    fn operation_kind(&self) -> OperationKind {
        OperationKind::ObjectTypeCreate
    }

    fn friendly_name(&self) -> &'static str {
        "Create object types"
    }

    fn load_items(&self, ctx: &JobContext) -> Result<Vec<Self::Item>, ErrorInfo> {
        let items: Vec<ObjectDataType> = ctx
            .state_store
            .get(phase_keys::ORACLE_OBJECT_TYPES)
            .map(|opt| opt.unwrap_or_default())
            .map_err(Into::<ErrorInfo>::into)?;

        *self.known_types.lock() =
            items.iter().map(|t| (t.name.to_uppercase(), t.schema.clone())).collect();

        Ok(items)
    }

    fn ddl_for(&self, item: &Self::Item) -> Vec<String> {
        let known = self.known_types.lock();
        let lookup = |name: &str| {
            let upper = name.to_uppercase();
            known.iter().find(|(n, _)| *n == upper).map(|(_, schema)| schema.clone())
        };

        let attrs: Vec<String> = item
            .variables
            .iter()
            .map(|v| {
                let input = match (v.precision, v.scale) {
                    (Some(p), Some(s)) => ColumnTypeInput::new(&v.data_type).with_precision_scale(p, s),
                    _ => match v.length {
                        Some(l) => ColumnTypeInput::new(&v.data_type).with_length(l),
                        None => ColumnTypeInput::new(&v.data_type),
                    },
                };
                let sql_type = match ora2pg_typemap::map_column_type(&input, lookup) {
                    MappedType::Mapped(ty) => ty,
                    MappedType::Unmapped(_) => "text".to_string(),
                };
                format!("{} {}", map_identifier(&v.name), sql_type)
            })
            .collect();

        vec![format!(
            "CREATE TYPE {}.{} AS ({})",
            item.schema.to_lowercase(),
            map_identifier(&item.name),
            attrs.join(", ")
        )]
    }

    fn item_label(&self, item: &Self::Item) -> String {
        format!("{}.{}", item.schema, item.name)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ora2pg_db::{ConnectionProvider, StateStore};
    use ora2pg_jobs::JobContext;
    use ora2pg_model::{JobConfig, TypeVariable};
    use tokio_util::sync::CancellationToken;

    use super::*;

    fn ctx_with(items: Vec<ObjectDataType>) -> JobContext {
        let state_store = StateStore::new();
        state_store.put(phase_keys::ORACLE_OBJECT_TYPES, &items).unwrap();
        JobContext {
            state_store: Arc::new(state_store),
            connections: Arc::new(ConnectionProvider::new()),
            config: JobConfig::default(),
            cancellation: CancellationToken::new(),
        }
    }

    #[test]
    fn attributes_map_through_the_type_system() {
        let creator = ObjectTypeCreator::new();
        let addr_t = ObjectDataType {
            schema: "HR".into(),
            name: "ADDRESS_T".into(),
            variables: vec![
                TypeVariable { name: "STREET".into(), data_type: "VARCHAR2".into(), length: Some(100), precision: None, scale: None },
                TypeVariable { name: "ZIP".into(), data_type: "NUMBER".into(), length: None, precision: Some(5), scale: Some(0) },
            ],
        };
        creator.load_items(&ctx_with(vec![addr_t.clone()])).unwrap();
        let ddl = creator.ddl_for(&addr_t);
        assert_eq!(ddl.len(), 1);
        assert!(ddl[0].starts_with("CREATE TYPE hr.address_t AS ("));
        assert!(ddl[0].contains("street varchar(100)"));
    }

    #[test]
    fn an_attribute_referencing_another_known_object_type_resolves_to_its_schema() {
        let creator = ObjectTypeCreator::new();
        let addr_t = ObjectDataType { schema: "HR".into(), name: "ADDRESS_T".into(), variables: vec![] };
        let emp_t = ObjectDataType {
            schema: "HR".into(),
            name: "EMP_T".into(),
            variables: vec![TypeVariable {
                name: "HOME_ADDRESS".into(),
                data_type: "ADDRESS_T".into(),
                length: None,
                precision: None,
                scale: None,
            }],
        };
        creator.load_items(&ctx_with(vec![addr_t, emp_t.clone()])).unwrap();
        let ddl = creator.ddl_for(&emp_t);
        assert!(ddl[0].contains("home_address hr.address_t"));
    }
}
