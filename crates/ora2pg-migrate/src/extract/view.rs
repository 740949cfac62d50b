//! ViewExtract (spec §4.7): reads `ALL_VIEWS` joined to `ALL_TAB_COLUMNS`
//! for the projected column list, aggregated per-view server-side.

use ora2pg_model::{OperationKind, View};
use serde::Deserialize;

use super::generic::ExtractorQuery;
use crate::schema_filter::SchemaFilter;

pub struct ViewExtractor;

#[derive(Deserialize)]
struct RawViewColumn {
    name: String,
    data_type: String,
}

impl From<RawViewColumn> for ora2pg_model::ViewColumn {
    fn from(raw: RawViewColumn) -> Self {
        ora2pg_model::ViewColumn {
            name: raw.name,
            data_type: raw.data_type,
        }
    }
}

impl ExtractorQuery for ViewExtractor {
    type Item = View;

    fn operation_kind(&self) -> OperationKind {
        OperationKind::ViewExtract
    }

    fn friendly_name(&self) -> &'static str {
        "Extract views"
    }

    fn phase_key(&self) -> &'static str {
        "oracle.views"
    }

    fn query_sql(&self, filter: &SchemaFilter) -> String {
        format!(
            "SELECT v.owner, v.view_name, v.text, \
                    (SELECT JSON_ARRAYAGG(JSON_OBJECT( \
                        'name' VALUE c.column_name, \
                        'data_type' VALUE c.data_type \
                     ) ORDER BY c.column_id) \
                     FROM all_tab_columns c \
                     WHERE c.owner = v.owner AND c.table_name = v.view_name) AS columns_json \
             FROM all_views v WHERE {}",
            filter.owner_predicate("v.owner")
        )
    }

    fn row_to_item(&self, row: &oracle::Row) -> Result<Self::Item, oracle::Error> {
        let schema: String = row.get(0)?;
        let view_name: String = row.get(1)?;
        let oracle_definition_sql: String = row.get(2)?;
        let columns_json: Option<String> = row.get(3)?;
        let columns = match columns_json {
            Some(json) => {
                let raw: Vec<RawViewColumn> = serde_json::from_str(&json).unwrap_or_default();
                raw.into_iter().map(Into::into).collect()
            }
            None => Vec::new(),
        };
        Ok(View {
            schema,
            view_name,
            columns,
            oracle_definition_sql,
            translated_sql: None,
        })
    }

    fn schema_of(&self, item: &Self::Item) -> &str {
        &item.schema
    }
}
