//! TypeMethodStubCreate (spec §4.8): a stub function in the type's schema
//! named `typename_methodname`, with a "not implemented" body, mirroring
//! `FunctionStubCreator`'s shape for object-type methods.

use ora2pg_db::phase_keys;
use ora2pg_jobs::JobContext;
use ora2pg_model::{ErrorInfo, OperationKind, TypeMethod};

use super::generic::DdlCreator;
use crate::signature::parse_signature;

pub struct TypeMethodStubCreator;

fn flattened_name(item: &TypeMethod) -> String {
    format!("{}_{}", item.type_name.to_lowercase(), item.method_name.to_lowercase())
}

impl DdlCreator for TypeMethodStubCreator {
    type Item = TypeMethod;

    fn operation_kind(&self) -> OperationKind {
        OperationKind::TypeMethodStubCreate
    }

    fn friendly_name(&self) -> &'static str {
        "Create type-method stubs"
    }

    fn load_items(&self, ctx: &JobContext) -> Result<Vec<Self::Item>, ErrorInfo> {
        ctx.state_store
            .get(phase_keys::ORACLE_TYPE_METHODS)
            .map(|opt| opt.unwrap_or_default())
            .map_err(Into::into)
    }

    fn ddl_for(&self, item: &Self::Item) -> Vec<String> {
        let parsed = parse_signature(&item.signature);
        let schema = item.schema.to_lowercase();
        let name = flattened_name(item);
        let params = parsed
            .params
            .iter()
            .map(|(name, ty)| format!("{name} {ty}"))
            .collect::<Vec<_>>()
            .join(", ");
        let return_type = parsed.return_type.unwrap_or_else(|| "void".to_string());

        vec![format!(
            "CREATE FUNCTION {schema}.{name}({params}) RETURNS {return_type} AS $$ \
             BEGIN RAISE EXCEPTION '{name} is not implemented'; END; $$ LANGUAGE plpgsql"
        )]
    }

    fn item_label(&self, item: &Self::Item) -> String {
        format!("{}.{}", item.schema, flattened_name(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ora2pg_model::Instantiable;

    fn sample() -> TypeMethod {
        TypeMethod {
            schema: "HR".into(),
            type_name: "EMP_T".into(),
            method_name: "GET_NAME".into(),
            method_type: "MEMBER FUNCTION".into(),
            instantiable: Instantiable::Yes,
            signature: r#"[{"name":"(return)","type":"VARCHAR2(50)"}]"#.into(),
            body: None,
        }
    }

    #[test]
    fn stub_name_joins_type_and_method() {
        let creator = TypeMethodStubCreator;
        let ddl = creator.ddl_for(&sample());
        assert_eq!(ddl.len(), 1);
        assert!(ddl[0].starts_with("CREATE FUNCTION hr.emp_t_get_name()"));
        assert!(ddl[0].contains("RAISE EXCEPTION 'emp_t_get_name is not implemented'"));
    }
}
