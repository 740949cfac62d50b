//! SynonymExtract (spec §4.7): reads `ALL_SYNONYMS`, scoped by owner.

use ora2pg_db::phase_keys;
use ora2pg_model::{OperationKind, Synonym};

use super::generic::ExtractorQuery;
use crate::schema_filter::SchemaFilter;

pub struct SynonymExtractor;

impl ExtractorQuery for SynonymExtractor {
    type Item = Synonym;

    fn operation_kind(&self) -> OperationKind {
        OperationKind::SynonymExtract
    }

    fn friendly_name(&self) -> &'static str {
        "Extract synonyms"
    }

    fn phase_key(&self) -> &'static str {
        phase_keys::ORACLE_SYNONYMS
    }

    fn query_sql(&self, filter: &SchemaFilter) -> String {
        format!(
            "SELECT owner, synonym_name, table_owner, table_name, db_link \
             FROM all_synonyms WHERE {}",
            filter.owner_predicate("owner")
        )
    }

    fn row_to_item(&self, row: &oracle::Row) -> Result<Self::Item, oracle::Error> {
        Ok(Synonym {
            owner: row.get(0)?,
            synonym_name: row.get(1)?,
            target_owner: row.get(2)?,
            target_name: row.get(3)?,
            db_link: row.get(4)?,
        })
    }

    fn schema_of(&self, item: &Self::Item) -> &str {
        &item.owner
    }
}
