//! ConstraintCreate (spec §4.8): applies in strict P -> U -> R -> C order so
//! foreign keys always reference an already-existing primary/unique key.

use ora2pg_db::phase_keys;
use ora2pg_jobs::JobContext;
use ora2pg_model::{Constraint, ConstraintType, ErrorInfo, OperationKind};
use ora2pg_typemap::map_identifier;

use super::generic::DdlCreator;

pub struct ConstraintCreator;

impl DdlCreator for ConstraintCreator {
    type Item = Constraint;

    fn operation_kind(&self) -> OperationKind {
        OperationKind::ConstraintCreate
    }

    fn friendly_name(&self) -> &'static str {
        "Create constraints"
    }

    fn load_items(&self, ctx: &JobContext) -> Result<Vec<Self::Item>, ErrorInfo> {
        let mut items: Vec<Constraint> = ctx
            .state_store
            .get(phase_keys::ORACLE_CONSTRAINTS)
            .map(|opt| opt.unwrap_or_default())
            .map_err(Into::<ErrorInfo>::into)?;
        items.sort_by_key(|c| c.constraint_type.creation_rank());
        Ok(items)
    }

    fn ddl_for(&self, item: &Self::Item) -> Vec<String> {
        let schema = item.schema.to_lowercase();
        let table = map_identifier(&item.table_name);
        let name = map_identifier(&item.constraint_name);
        let columns: Vec<String> = item.columns.iter().map(|c| map_identifier(c)).collect();

        let definition = match item.constraint_type {
            ConstraintType::PrimaryKey => format!("PRIMARY KEY ({})", columns.join(", ")),
            ConstraintType::Unique => format!("UNIQUE ({})", columns.join(", ")),
            ConstraintType::ForeignKey => {
                let ref_table = item.referenced_table.as_deref().unwrap_or_default();
                let ref_columns: Vec<String> = item
                    .referenced_columns
                    .as_ref()
                    .map(|cols| cols.iter().map(|c| map_identifier(c)).collect())
                    .unwrap_or_default();
                format!(
                    "FOREIGN KEY ({}) REFERENCES {}.{} ({})",
                    columns.join(", "),
                    schema,
                    map_identifier(ref_table),
                    ref_columns.join(", ")
                )
            }
            ConstraintType::Check => {
                format!("CHECK ({})", item.check_expression.clone().unwrap_or_default())
            }
        };

        let deferrable = if item.deferrable {
            if item.initially_deferred { " DEFERRABLE INITIALLY DEFERRED" } else { " DEFERRABLE" }
        } else {
            ""
        };

        vec![format!(
            "ALTER TABLE {schema}.{table} ADD CONSTRAINT {name} {definition}{deferrable}"
        )]
    }

    fn item_label(&self, item: &Self::Item) -> String {
        format!("{}.{}", item.table_name, item.constraint_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_places_primary_keys_before_foreign_keys() {
        let mut items = vec![
            Constraint {
                schema: "hr".into(),
                table_name: "b".into(),
                constraint_name: "fk_b_a".into(),
                constraint_type: ConstraintType::ForeignKey,
                columns: vec!["a_id".into()],
                referenced_table: Some("a".into()),
                referenced_columns: Some(vec!["id".into()]),
                check_expression: None,
                deferrable: false,
                initially_deferred: false,
            },
            Constraint {
                schema: "hr".into(),
                table_name: "a".into(),
                constraint_name: "pk_a".into(),
                constraint_type: ConstraintType::PrimaryKey,
                columns: vec!["id".into()],
                referenced_table: None,
                referenced_columns: None,
                check_expression: None,
                deferrable: false,
                initially_deferred: false,
            },
        ];
        items.sort_by_key(|c| c.constraint_type.creation_rank());
        assert_eq!(items[0].constraint_type, ConstraintType::PrimaryKey);
        assert_eq!(items[1].constraint_type, ConstraintType::ForeignKey);
    }
}
