//! `StateStore` (spec §4.5): a key/value store keyed by phase tag, values are
//! immutable snapshots of the canonical entities in `ora2pg_model::entities`.
//! Writes are last-writer-wins at the phase-key level; reads never block.
//!
//! Grounded on the `Memory*Storage` pattern in
//! `n8n-core::storage::{MemoryWorkflowStorage, MemoryExecutionStorage}`,
//! generalized from two fixed maps to one map keyed by an open-ended phase
//! tag, and from `tokio::sync::RwLock` to `dashmap::DashMap` so that reads of
//! unrelated phase keys never contend with each other or with a write.

use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::DbError;

/// Conventional phase keys written by Extractors and read by Creators /
/// the Orchestrator. Extractors are free to use other keys for auxiliary
/// data, but these are the ones the rest of the workspace agrees on.
pub mod phase_keys {
    pub const ORACLE_SCHEMAS: &str = "oracle.schemas";
    pub const ORACLE_SYNONYMS: &str = "oracle.synonyms";
    pub const ORACLE_OBJECT_TYPES: &str = "oracle.object_types";
    pub const ORACLE_SEQUENCES: &str = "oracle.sequences";
    pub const ORACLE_TABLES: &str = "oracle.tables";
    pub const ORACLE_ROW_COUNTS: &str = "oracle.row_counts";
    pub const ORACLE_CONSTRAINTS: &str = "oracle.constraints";
    pub const ORACLE_VIEWS: &str = "oracle.views";
    pub const ORACLE_FUNCTIONS: &str = "oracle.functions";
    pub const ORACLE_TYPE_METHODS: &str = "oracle.type_methods";
    pub const ORACLE_TRIGGERS: &str = "oracle.triggers";
}

/// Single-process, in-memory repository of extracted metadata and
/// intermediate results, keyed by phase name.
pub struct StateStore {
    phases: DashMap<String, serde_json::Value>,
}

impl StateStore {
    pub fn new() -> Self {
        Self {
            phases: DashMap::new(),
        }
    }

    /// Replaces the snapshot under `phase_key` atomically. Last writer wins.
    pub fn put<T: Serialize>(&self, phase_key: impl Into<String>, value: &T) -> Result<(), DbError> {
        let encoded = serde_json::to_value(value)
            .map_err(|e| DbError::NotConfigured(format!("failed to encode state for phase: {e}")))?;
        self.phases.insert(phase_key.into(), encoded);
        Ok(())
    }

    /// Reads the current snapshot under `phase_key`, if any has been written.
    pub fn get<T: DeserializeOwned>(&self, phase_key: &str) -> Result<Option<T>, DbError> {
        match self.phases.get(phase_key) {
            Some(entry) => {
                let decoded = serde_json::from_value(entry.value().clone())
                    .map_err(|e| DbError::NotConfigured(format!("failed to decode state for phase: {e}")))?;
                Ok(Some(decoded))
            }
            None => Ok(None),
        }
    }

    pub fn contains(&self, phase_key: &str) -> bool {
        self.phases.contains_key(phase_key)
    }

    /// Empties all keys. Subsequent reads never observe a stale snapshot
    /// alongside a freshly reset one, because each key is cleared under its
    /// own shard lock.
    pub fn reset(&self) {
        self.phases.clear();
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ora2pg_model::Schema;

    #[test]
    fn put_then_get_round_trips_a_snapshot() {
        let store = StateStore::new();
        let schemas = vec![
            Schema { name: "HR".into() },
            Schema { name: "SCOTT".into() },
        ];
        store.put(phase_keys::ORACLE_SCHEMAS, &schemas).unwrap();

        let read_back: Vec<Schema> = store.get(phase_keys::ORACLE_SCHEMAS).unwrap().unwrap();
        assert_eq!(read_back.len(), 2);
        assert_eq!(read_back[0].name, "HR");
    }

    #[test]
    fn get_on_unwritten_key_is_none_not_an_error() {
        let store = StateStore::new();
        let read_back: Option<Vec<Schema>> = store.get(phase_keys::ORACLE_TABLES).unwrap();
        assert!(read_back.is_none());
    }

    #[test]
    fn later_write_replaces_earlier_write_for_the_same_key() {
        let store = StateStore::new();
        store.put(phase_keys::ORACLE_SCHEMAS, &vec![Schema { name: "A".into() }]).unwrap();
        store.put(phase_keys::ORACLE_SCHEMAS, &vec![Schema { name: "B".into() }]).unwrap();

        let read_back: Vec<Schema> = store.get(phase_keys::ORACLE_SCHEMAS).unwrap().unwrap();
        assert_eq!(read_back.len(), 1);
        assert_eq!(read_back[0].name, "B");
    }

    #[test]
    fn reset_empties_every_key() {
        let store = StateStore::new();
        store.put(phase_keys::ORACLE_SCHEMAS, &vec![Schema { name: "A".into() }]).unwrap();
        store.put(phase_keys::ORACLE_TABLES, &Vec::<Schema>::new()).unwrap();
        assert_eq!(store.len(), 2);

        store.reset();
        assert!(store.is_empty());
        assert!(store.get::<Vec<Schema>>(phase_keys::ORACLE_SCHEMAS).unwrap().is_none());
    }
}
