//! TriggerExtract (spec §4.7): reads `ALL_TRIGGERS`.

use ora2pg_model::{OperationKind, Trigger, TriggerLevel, TriggerType};

use super::generic::ExtractorQuery;
use crate::schema_filter::SchemaFilter;

pub struct TriggerExtractor;

impl ExtractorQuery for TriggerExtractor {
    type Item = Trigger;

    fn operation_kind(&self) -> OperationKind {
        OperationKind::TriggerExtract
    }

    fn friendly_name(&self) -> &'static str {
        "Extract triggers"
    }

    fn phase_key(&self) -> &'static str {
        "oracle.triggers"
    }

    fn query_sql(&self, filter: &SchemaFilter) -> String {
        format!(
            "SELECT owner, trigger_name, table_name, trigger_type, triggering_event, \
                    trigger_body \
             FROM all_triggers WHERE base_object_type = 'TABLE' AND {}",
            filter.owner_predicate("owner")
        )
    }

    fn row_to_item(&self, row: &oracle::Row) -> Result<Self::Item, oracle::Error> {
        let schema: String = row.get(0)?;
        let trigger_name: String = row.get(1)?;
        let table_name: String = row.get(2)?;
        let trigger_type_str: String = row.get(3)?;
        let event: String = row.get(4)?;
        let body: String = row.get(5)?;

        let trigger_type = if trigger_type_str.contains("INSTEAD") {
            TriggerType::Instead
        } else if trigger_type_str.starts_with("BEFORE") {
            TriggerType::Before
        } else {
            TriggerType::After
        };
        let trigger_level = if trigger_type_str.contains("EACH ROW") {
            TriggerLevel::Row
        } else {
            TriggerLevel::Statement
        };

        Ok(Trigger {
            schema,
            trigger_name,
            table_name,
            trigger_type,
            trigger_level,
            event,
            body,
        })
    }

    fn schema_of(&self, item: &Self::Item) -> &str {
        &item.schema
    }
}
