//! FunctionStubCreate (spec §4.8): a PL/pgSQL function or procedure whose
//! signature matches the Oracle counterpart (after type mapping) but whose
//! body only raises a "not implemented" exception. Arbitrary PL/SQL bodies
//! are not translated (spec §1 Non-goals); only the curated compatibility
//! layer (§4.11) and stub/implementation pattern (§9) stand in for them.

use ora2pg_db::phase_keys;
use ora2pg_jobs::JobContext;
use ora2pg_model::{ErrorInfo, FunctionOrProcedure, OperationKind, RoutineKind};

use super::generic::DdlCreator;
use crate::signature::parse_signature;

pub struct FunctionStubCreator;

impl DdlCreator for FunctionStubCreator {
    type Item = FunctionOrProcedure;

    fn operation_kind(&self) -> OperationKind {
        OperationKind::FunctionStubCreate
    }

    fn friendly_name(&self) -> &'static str {
        "Create function/procedure stubs"
    }

    fn load_items(&self, ctx: &JobContext) -> Result<Vec<Self::Item>, ErrorInfo> {
        ctx.state_store
            .get(phase_keys::ORACLE_FUNCTIONS)
            .map(|opt| opt.unwrap_or_default())
            .map_err(Into::into)
    }

    fn ddl_for(&self, item: &Self::Item) -> Vec<String> {
        let parsed = parse_signature(&item.signature);
        let schema = item.schema.to_lowercase();
        let name = parsed_name(item);
        let params = parsed
            .params
            .iter()
            .map(|(name, ty)| format!("{name} {ty}"))
            .collect::<Vec<_>>()
            .join(", ");

        let message = format!("{name} is not implemented");
        match item.object_type {
            RoutineKind::Function => {
                let return_type = parsed.return_type.unwrap_or_else(|| "void".to_string());
                vec![format!(
                    "CREATE FUNCTION {schema}.{name}({params}) RETURNS {return_type} AS $$ \
                     BEGIN RAISE EXCEPTION '{message}'; END; $$ LANGUAGE plpgsql"
                )]
            }
            RoutineKind::Procedure => {
                vec![format!(
                    "CREATE PROCEDURE {schema}.{name}({params}) AS $$ \
                     BEGIN RAISE EXCEPTION '{message}'; END; $$ LANGUAGE plpgsql"
                )]
            }
        }
    }

    fn item_label(&self, item: &Self::Item) -> String {
        format!("{}.{}", item.schema, parsed_name(item))
    }
}

fn parsed_name(item: &FunctionOrProcedure) -> String {
    item.flattened_name()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_qualified_function_flattens_its_name_and_raises_not_implemented() {
        let creator = FunctionStubCreator;
        let item = FunctionOrProcedure {
            schema: "HR".into(),
            object_name: "CALC_BONUS".into(),
            package_name: Some("PAYROLL".into()),
            object_type: RoutineKind::Function,
            signature: r#"[{"name":"p_emp_id","type":"NUMBER"},{"name":"(return)","type":"NUMBER"}]"#.into(),
        };

        let ddl = creator.ddl_for(&item);
        assert_eq!(ddl.len(), 1);
        assert!(ddl[0].starts_with("CREATE FUNCTION hr.payroll_calc_bonus(p_emp_id"));
        assert!(ddl[0].contains("RAISE EXCEPTION 'payroll_calc_bonus is not implemented'"));
    }

    #[test]
    fn a_procedure_creates_a_procedure_not_a_function() {
        let creator = FunctionStubCreator;
        let item = FunctionOrProcedure {
            schema: "HR".into(),
            object_name: "ARCHIVE_EMP".into(),
            package_name: None,
            object_type: RoutineKind::Procedure,
            signature: "[]".into(),
        };

        let ddl = creator.ddl_for(&item);
        assert!(ddl[0].starts_with("CREATE PROCEDURE hr.archive_emp()"));
    }
}
