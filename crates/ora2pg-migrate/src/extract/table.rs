//! TableMetadataExtract (spec §4.7): reads `ALL_TAB_COLUMNS`, aggregating
//! each table's columns into one JSON column server-side so that one
//! dictionary row maps to one `Table`, ordered by `column_id` (spec §3's
//! "position ordinals are stable").

use ora2pg_model::{Column, OperationKind, Table};
use serde::Deserialize;

use super::generic::ExtractorQuery;
use crate::schema_filter::SchemaFilter;

/// Mirrors `Column` except `nullable`, which Oracle's `JSON_OBJECT` can only
/// emit as the `Y`/`N` string it comes from, not a JSON boolean.
#[derive(Deserialize)]
struct RawColumn {
    name: String,
    oracle_type: String,
    length: Option<u32>,
    precision: Option<u32>,
    scale: Option<i32>,
    nullable: String,
    default_expression: Option<String>,
    position_ordinal: u32,
}

impl From<RawColumn> for Column {
    fn from(raw: RawColumn) -> Self {
        Column {
            name: raw.name,
            oracle_type: raw.oracle_type,
            length: raw.length,
            precision: raw.precision,
            scale: raw.scale,
            nullable: raw.nullable == "Y",
            default_expression: raw.default_expression,
            position_ordinal: raw.position_ordinal,
        }
    }
}

pub struct TableExtractor;

impl ExtractorQuery for TableExtractor {
    type Item = Table;

    fn operation_kind(&self) -> OperationKind {
        OperationKind::TableMetadataExtract
    }

    fn friendly_name(&self) -> &'static str {
        "Extract table metadata"
    }

    fn phase_key(&self) -> &'static str {
        "oracle.tables"
    }

    fn query_sql(&self, filter: &SchemaFilter) -> String {
        format!(
            "SELECT t.owner, t.table_name, \
                    (SELECT JSON_ARRAYAGG(JSON_OBJECT( \
                        'name' VALUE c.column_name, \
                        'oracle_type' VALUE c.data_type, \
                        'length' VALUE c.data_length, \
                        'precision' VALUE c.data_precision, \
                        'scale' VALUE c.data_scale, \
                        'nullable' VALUE c.nullable, \
                        'default_expression' VALUE c.data_default, \
                        'position_ordinal' VALUE c.column_id \
                     ) ORDER BY c.column_id) \
                     FROM all_tab_columns c \
                     WHERE c.owner = t.owner AND c.table_name = t.table_name) AS columns_json \
             FROM all_tables t WHERE {}",
            filter.owner_predicate("t.owner")
        )
    }

    fn row_to_item(&self, row: &oracle::Row) -> Result<Self::Item, oracle::Error> {
        let schema: String = row.get(0)?;
        let name: String = row.get(1)?;
        let columns_json: Option<String> = row.get(2)?;
        let columns: Vec<Column> = match columns_json {
            Some(json) => {
                let raw: Vec<RawColumn> = serde_json::from_str(&json).unwrap_or_default();
                raw.into_iter().map(Column::from).collect()
            }
            None => Vec::new(),
        };
        Ok(Table {
            schema,
            name,
            columns,
            constraints: None,
        })
    }

    fn schema_of(&self, item: &Self::Item) -> &str {
        &item.schema
    }
}
