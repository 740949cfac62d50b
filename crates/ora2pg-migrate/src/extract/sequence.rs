//! SequenceExtract (spec §4.7): reads `ALL_SEQUENCES`.

use ora2pg_db::phase_keys;
use ora2pg_model::{OperationKind, Sequence};

use super::generic::ExtractorQuery;
use crate::schema_filter::SchemaFilter;

pub struct SequenceExtractor;

impl ExtractorQuery for SequenceExtractor {
    type Item = Sequence;

    fn operation_kind(&self) -> OperationKind {
        OperationKind::SequenceExtract
    }

    fn friendly_name(&self) -> &'static str {
        "Extract sequences"
    }

    fn phase_key(&self) -> &'static str {
        phase_keys::ORACLE_SEQUENCES
    }

    fn query_sql(&self, filter: &SchemaFilter) -> String {
        format!(
            "SELECT sequence_owner, sequence_name, min_value, max_value, increment_by, \
                    cycle_flag, cache_size, last_number \
             FROM all_sequences WHERE {}",
            filter.owner_predicate("sequence_owner")
        )
    }

    fn row_to_item(&self, row: &oracle::Row) -> Result<Self::Item, oracle::Error> {
        let schema: String = row.get(0)?;
        let name: String = row.get(1)?;
        let min_value: i64 = row.get(2)?;
        let max_value: i64 = row.get(3)?;
        let increment: i64 = row.get(4)?;
        let cycle_flag: String = row.get(5)?;
        let cache_size: i64 = row.get(6)?;
        let last_number: i64 = row.get(7)?;
        Ok(Sequence {
            schema,
            name,
            start_value: last_number,
            min_value,
            max_value,
            increment,
            cycle: cycle_flag == "Y",
            cache_size,
            last_number,
        })
    }

    fn schema_of(&self, item: &Self::Item) -> &str {
        &item.schema
    }
}
