//! TriggerImplementation (spec §4.8): triggers have no stub phase (unlike
//! views/functions/type methods) since nothing else forward-references a
//! trigger by name; this creates the trigger function and the trigger
//! itself directly. The Oracle trigger body uses `:NEW`/`:OLD` bind syntax
//! and Oracle-only builtins that are not valid PL/pgSQL, so it is never
//! translated or spliced in (spec §1 Non-goals); the function instead
//! raises "not implemented", the same stand-in `FunctionStubCreator` and
//! `TypeMethodStubCreator` use for routine bodies.

use ora2pg_db::phase_keys;
use ora2pg_jobs::JobContext;
use ora2pg_model::{ErrorInfo, OperationKind, Trigger, TriggerLevel, TriggerType};

use super::generic::DdlCreator;

pub struct TriggerImplementationCreator;

impl DdlCreator for TriggerImplementationCreator {
    type Item = Trigger;

    fn operation_kind(&self) -> OperationKind {
        OperationKind::TriggerImplementation
    }

    fn friendly_name(&self) -> &'static str {
        "Implement triggers"
    }

    fn load_items(&self, ctx: &JobContext) -> Result<Vec<Self::Item>, ErrorInfo> {
        ctx.state_store
            .get(phase_keys::ORACLE_TRIGGERS)
            .map(|opt| opt.unwrap_or_default())
            .map_err(Into::into)
    }

    fn ddl_for(&self, item: &Self::Item) -> Vec<String> {
        let schema = item.schema.to_lowercase();
        let table = item.table_name.to_lowercase();
        let fn_name = format!("{}_{}_fn", schema, item.trigger_name.to_lowercase());
        let trigger_name = item.trigger_name.to_lowercase();

        let timing = match item.trigger_type {
            TriggerType::Before => "BEFORE",
            TriggerType::After => "AFTER",
            TriggerType::Instead => "INSTEAD OF",
        };
        let level = match item.trigger_level {
            TriggerLevel::Row => "FOR EACH ROW",
            TriggerLevel::Statement => "FOR EACH STATEMENT",
        };

        let message = format!("{fn_name} is not implemented");

        vec![
            format!(
                "CREATE FUNCTION {schema}.{fn_name}() RETURNS trigger AS $$ \
                 BEGIN RAISE EXCEPTION '{message}'; END; $$ LANGUAGE plpgsql"
            ),
            format!(
                "CREATE TRIGGER {trigger_name} {timing} {event} ON {schema}.{table} {level} \
                 EXECUTE FUNCTION {schema}.{fn_name}()",
                event = item.event
            ),
        ]
    }

    fn item_label(&self, item: &Self::Item) -> String {
        format!("{}.{}", item.table_name, item.trigger_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(trigger_type: TriggerType, trigger_level: TriggerLevel) -> Trigger {
        Trigger {
            schema: "HR".into(),
            trigger_name: "EMP_BIU".into(),
            table_name: "EMP".into(),
            trigger_type,
            trigger_level,
            event: "INSERT OR UPDATE".into(),
            body: "NEW.updated_at := now();".into(),
        }
    }

    #[test]
    fn emits_a_trigger_function_then_the_trigger_itself() {
        let creator = TriggerImplementationCreator;
        let ddl = creator.ddl_for(&sample(TriggerType::Before, TriggerLevel::Row));
        assert_eq!(ddl.len(), 2);
        assert_eq!(ddl[0], "CREATE FUNCTION hr.hr_emp_biu_fn() RETURNS trigger AS $$ BEGIN RAISE EXCEPTION 'hr_emp_biu_fn is not implemented'; END; $$ LANGUAGE plpgsql");
        assert_eq!(
            ddl[1],
            "CREATE TRIGGER emp_biu BEFORE INSERT OR UPDATE ON hr.emp FOR EACH ROW EXECUTE FUNCTION hr.hr_emp_biu_fn()"
        );
    }

    #[test]
    fn statement_level_and_instead_of_map_to_the_right_keywords() {
        let creator = TriggerImplementationCreator;
        let ddl = creator.ddl_for(&sample(TriggerType::Instead, TriggerLevel::Statement));
        assert!(ddl[1].contains("INSTEAD OF"));
        assert!(ddl[1].contains("FOR EACH STATEMENT"));
    }
}
