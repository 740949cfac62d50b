//! ObjectTypeExtract (spec §4.7): reads `ALL_TYPES`/`ALL_TYPE_ATTRS`. Each
//! type's attributes are aggregated into one JSON column server-side
//! (`JSON_ARRAYAGG`) so that one dictionary row maps to one `ObjectDataType`,
//! matching the one-row-per-item shape the generic extractor expects.

use ora2pg_model::{ObjectDataType, OperationKind};

use super::generic::ExtractorQuery;
use crate::schema_filter::SchemaFilter;

pub struct ObjectTypeExtractor;

impl ExtractorQuery for ObjectTypeExtractor {
    type Item = ObjectDataType;

    fn operation_kind(&self) -> OperationKind {
        OperationKind::ObjectTypeExtract
    }

    fn friendly_name(&self) -> &'static str {
        "Extract object types"
    }

    fn phase_key(&self) -> &'static str {
        "oracle.object_types"
    }

    fn query_sql(&self, filter: &SchemaFilter) -> String {
        format!(
            "SELECT t.owner, t.type_name, \
                    (SELECT JSON_ARRAYAGG(JSON_OBJECT( \
                        'name' VALUE a.attr_name, \
                        'data_type' VALUE a.attr_type_name, \
                        'length' VALUE a.length, \
                        'precision' VALUE a.precision, \
                        'scale' VALUE a.scale \
                     ) ORDER BY a.attr_no) \
                     FROM all_type_attrs a \
                     WHERE a.owner = t.owner AND a.type_name = t.type_name) AS variables_json \
             FROM all_types t WHERE t.typecode = 'OBJECT' AND {}",
            filter.owner_predicate("t.owner")
        )
    }

    fn row_to_item(&self, row: &oracle::Row) -> Result<Self::Item, oracle::Error> {
        let schema: String = row.get(0)?;
        let name: String = row.get(1)?;
        let variables_json: Option<String> = row.get(2)?;
        let variables = match variables_json {
            Some(json) => serde_json::from_str(&json).unwrap_or_default(),
            None => Vec::new(),
        };
        Ok(ObjectDataType { schema, name, variables })
    }

    fn schema_of(&self, item: &Self::Item) -> &str {
        &item.schema
    }
}
