//! SchemaExtract (spec §4.7): enumerates candidate Oracle schemas from
//! `ALL_USERS`, scoped by `SchemaFilter`.

use ora2pg_db::phase_keys;
use ora2pg_model::{OperationKind, Schema};

use super::generic::ExtractorQuery;
use crate::schema_filter::SchemaFilter;

pub struct SchemaExtractor;

impl ExtractorQuery for SchemaExtractor {
    type Item = Schema;

    fn operation_kind(&self) -> OperationKind {
        OperationKind::SchemaExtract
    }

    fn friendly_name(&self) -> &'static str {
        "Extract schemas"
    }

    fn phase_key(&self) -> &'static str {
        phase_keys::ORACLE_SCHEMAS
    }

    fn query_sql(&self, filter: &SchemaFilter) -> String {
        format!(
            "SELECT username FROM all_users WHERE {}",
            filter.owner_predicate("username")
        )
    }

    fn row_to_item(&self, row: &oracle::Row) -> Result<Self::Item, oracle::Error> {
        let name: String = row.get(0)?;
        Ok(Schema { name })
    }

    fn schema_of(&self, item: &Self::Item) -> &str {
        &item.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_scopes_to_single_test_schema() {
        let extractor = SchemaExtractor;
        let filter = SchemaFilter {
            all_schemas: false,
            test_schema: Some("hr".to_string()),
        };
        let sql = extractor.query_sql(&filter);
        assert!(sql.contains("username = 'HR'"));
    }
}
