//! SequenceCreate (spec §4.8): `CREATE SEQUENCE` for every extracted
//! sequence, starting from its current `lastNumber` rather than its
//! original `startValue` so the migrated sequence never reissues a value
//! already consumed in Oracle.

use ora2pg_db::phase_keys;
use ora2pg_jobs::JobContext;
use ora2pg_model::{ErrorInfo, OperationKind, Sequence};
use ora2pg_typemap::map_identifier;

use super::generic::DdlCreator;

pub struct SequenceCreator;

impl DdlCreator for SequenceCreator {
    type Item = Sequence;

    fn operation_kind(&self) -> OperationKind {
        OperationKind::SequenceCreate
    }

    fn friendly_name(&self) -> &'static str {
        "Create sequences"
    }

    fn load_items(&self, ctx: &JobContext) -> Result<Vec<Self::Item>, ErrorInfo> {
        ctx.state_store
            .get(phase_keys::ORACLE_SEQUENCES)
            .map(|opt| opt.unwrap_or_default())
            .map_err(Into::into)
    }

    fn ddl_for(&self, item: &Self::Item) -> Vec<String> {
        vec![format!(
            "CREATE SEQUENCE {}.{} INCREMENT BY {} MINVALUE {} MAXVALUE {} START WITH {} CACHE {} {}",
            item.schema.to_lowercase(),
            map_identifier(&item.name),
            item.increment,
            item.min_value,
            item.max_value,
            item.last_number,
            item.cache_size.max(1),
            if item.cycle { "CYCLE" } else { "NO CYCLE" },
        )]
    }

    fn item_label(&self, item: &Self::Item) -> String {
        format!("{}.{}", item.schema, item.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ddl_starts_from_last_number_not_start_value() {
        let creator = SequenceCreator;
        let sequence = Sequence {
            schema: "HR".into(),
            name: "EMP_SEQ".into(),
            start_value: 1,
            min_value: 1,
            max_value: i64::MAX,
            increment: 1,
            cycle: false,
            cache_size: 20,
            last_number: 4521,
        };

        let ddl = creator.ddl_for(&sequence);
        assert_eq!(ddl.len(), 1);
        assert!(ddl[0].contains("START WITH 4521"));
        assert!(!ddl[0].contains("START WITH 1 "));
        assert!(ddl[0].contains("NO CYCLE"));
    }
}
