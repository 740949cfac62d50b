//! FunctionExtract (spec §4.7): reads `ALL_PROCEDURES`/`ALL_ARGUMENTS`,
//! flattening package-qualified names' argument list into a signature
//! string server-side.

use ora2pg_model::{FunctionOrProcedure, OperationKind, RoutineKind};

use super::generic::ExtractorQuery;
use crate::schema_filter::SchemaFilter;

pub struct FunctionExtractor;

impl ExtractorQuery for FunctionExtractor {
    type Item = FunctionOrProcedure;

    fn operation_kind(&self) -> OperationKind {
        OperationKind::FunctionExtract
    }

    fn friendly_name(&self) -> &'static str {
        "Extract functions and procedures"
    }

    fn phase_key(&self) -> &'static str {
        "oracle.functions"
    }

    fn query_sql(&self, filter: &SchemaFilter) -> String {
        format!(
            "SELECT p.owner, p.procedure_name, p.object_name, \
                    CASE WHEN p.procedure_name IS NOT NULL THEN p.object_name ELSE NULL END AS package_name, \
                    CASE WHEN EXISTS ( \
                        SELECT 1 FROM all_arguments a \
                        WHERE a.owner = p.owner AND a.object_name = p.object_name \
                          AND NVL(a.procedure_name, '*') = NVL(p.procedure_name, '*') \
                          AND a.position = 0 \
                    ) THEN 'FUNCTION' ELSE 'PROCEDURE' END AS object_type, \
                    (SELECT JSON_ARRAYAGG(JSON_OBJECT( \
                        'name' VALUE NVL(a.argument_name, '(return)'), \
                        'type' VALUE a.data_type \
                     ) ORDER BY a.position) \
                     FROM all_arguments a \
                     WHERE a.owner = p.owner AND a.object_name = p.object_name \
                       AND NVL(a.procedure_name, '*') = NVL(p.procedure_name, '*')) AS signature_json \
             FROM all_procedures p \
             WHERE p.object_type IN ('FUNCTION', 'PROCEDURE', 'PACKAGE') AND {}",
            filter.owner_predicate("p.owner")
        )
    }

    fn row_to_item(&self, row: &oracle::Row) -> Result<Self::Item, oracle::Error> {
        let schema: String = row.get(0)?;
        let procedure_name: Option<String> = row.get(1)?;
        let object_name: String = row.get(2)?;
        let package_name: Option<String> = row.get(3)?;
        let object_type_str: String = row.get(4)?;
        let signature_json: Option<String> = row.get(5)?;

        let object_name = procedure_name.unwrap_or(object_name);
        let object_type = if object_type_str == "FUNCTION" {
            RoutineKind::Function
        } else {
            RoutineKind::Procedure
        };
        let signature = signature_json.unwrap_or_else(|| "[]".to_string());

        Ok(FunctionOrProcedure {
            schema,
            object_name,
            package_name,
            object_type,
            signature,
        })
    }

    fn schema_of(&self, item: &Self::Item) -> &str {
        &item.schema
    }
}
