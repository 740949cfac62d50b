//! TypeMethodExtract (spec §4.7): reads `ALL_TYPE_METHODS`/`ALL_METHOD_PARAMS`.

use ora2pg_model::{Instantiable, OperationKind, TypeMethod};

use super::generic::ExtractorQuery;
use crate::schema_filter::SchemaFilter;

pub struct TypeMethodExtractor;

impl ExtractorQuery for TypeMethodExtractor {
    type Item = TypeMethod;

    fn operation_kind(&self) -> OperationKind {
        OperationKind::TypeMethodExtract
    }

    fn friendly_name(&self) -> &'static str {
        "Extract type methods"
    }

    fn phase_key(&self) -> &'static str {
        "oracle.type_methods"
    }

    fn query_sql(&self, filter: &SchemaFilter) -> String {
        format!(
            "SELECT m.owner, m.type_name, m.method_name, m.method_type, m.instantiable, \
                    (SELECT JSON_ARRAYAGG(JSON_OBJECT( \
                        'name' VALUE NVL(mp.param_name, '(return)'), \
                        'type' VALUE mp.param_type_name \
                     ) ORDER BY mp.param_no) \
                     FROM all_method_params mp \
                     WHERE mp.owner = m.owner AND mp.type_name = m.type_name \
                       AND mp.method_name = m.method_name AND mp.method_no = m.method_no) AS signature_json \
             FROM all_type_methods m WHERE {}",
            filter.owner_predicate("m.owner")
        )
    }

    fn row_to_item(&self, row: &oracle::Row) -> Result<Self::Item, oracle::Error> {
        let schema: String = row.get(0)?;
        let type_name: String = row.get(1)?;
        let method_name: String = row.get(2)?;
        let method_type: String = row.get(3)?;
        let instantiable_str: String = row.get(4)?;
        let signature_json: Option<String> = row.get(5)?;

        let instantiable = if instantiable_str == "YES" { Instantiable::Yes } else { Instantiable::No };
        let signature = signature_json.unwrap_or_else(|| "[]".to_string());

        Ok(TypeMethod {
            schema,
            type_name,
            method_name,
            method_type,
            instantiable,
            signature,
            body: None,
        })
    }

    fn schema_of(&self, item: &Self::Item) -> &str {
        &item.schema
    }
}
