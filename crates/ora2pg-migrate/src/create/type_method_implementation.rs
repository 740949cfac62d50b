//! TypeMethodImplementation (spec §4.8): drops the stub and recreates the
//! function. No automatic PL/SQL body translation exists (spec §1
//! Non-goals), so the extracted Oracle body is not emitted; the
//! implementation keeps raising "not implemented" until a curated
//! translation is added for a given method, exactly like the stub — this
//! phase exists so the Orchestrator has a distinct, observable completion
//! point for type-method work even when no implementation is supplied yet.

use ora2pg_db::phase_keys;
use ora2pg_jobs::JobContext;
use ora2pg_model::{ErrorInfo, OperationKind, TypeMethod};

use super::generic::DdlCreator;
use crate::signature::parse_signature;

pub struct TypeMethodImplementationCreator;

fn flattened_name(item: &TypeMethod) -> String {
    format!("{}_{}", item.type_name.to_lowercase(), item.method_name.to_lowercase())
}

impl DdlCreator for TypeMethodImplementationCreator {
    type Item = TypeMethod;

    fn operation_kind(&self) -> OperationKind {
        OperationKind::TypeMethodImplementation
    }

    fn friendly_name(&self) -> &'static str {
        "Implement type methods"
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

        let body = format!("RAISE EXCEPTION '{name} is not implemented';");

        vec![
            format!("DROP FUNCTION IF EXISTS {schema}.{name}({})", parsed.params.iter().map(|(_, t)| t.clone()).collect::<Vec<_>>().join(", ")),
            format!("CREATE FUNCTION {schema}.{name}({params}) RETURNS {return_type} AS $$ BEGIN {body} END; $$ LANGUAGE plpgsql"),
        ]
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
            signature: r#"[{"name":"(return)","type":"NUMBER"}]"#.into(),
            body: None,
        }
    }

    #[test]
    fn drops_the_stub_before_recreating() {
        let creator = TypeMethodImplementationCreator;
        let ddl = creator.ddl_for(&sample());
        assert_eq!(ddl.len(), 2);
        assert_eq!(ddl[0], "DROP FUNCTION IF EXISTS hr.emp_t_get_name()");
        assert!(ddl[1].starts_with("CREATE FUNCTION hr.emp_t_get_name()"));
    }

    #[test]
    fn always_raises_not_implemented() {
        let creator = TypeMethodImplementationCreator;
        let ddl = creator.ddl_for(&sample());
        assert!(ddl[1].contains("RAISE EXCEPTION 'emp_t_get_name is not implemented';"));
    }
}
