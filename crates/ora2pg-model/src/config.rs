//! `JobConfig`: the subset of `ConfigStore` (spec §6's configuration keys,
//! plus §4.1's pool/retention knobs and §4.9's transfer knobs) that Jobs
//! themselves read. Kept in this dependency-free crate, rather than in
//! `ora2pg-server`'s `ConfigStore`, so `ora2pg-jobs` and `ora2pg-migrate` can
//! depend on the shape of the configuration without depending on the crate
//! that owns its REST-facing lifecycle.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    /// `do.all-schemas`.
    pub do_all_schemas: bool,
    /// `do.only-test-schema`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub only_test_schema: Option<String>,
    /// `exclude.lob-data`.
    pub exclude_lob_data: bool,
    /// `allow.lossy` (character-set conversion fallback, spec §4.9).
    pub allow_lossy: bool,
    /// Oracle cursor fetch size (spec §4.9, default 1000).
    pub fetch_size: u32,
    /// Rows per PostgreSQL commit during data transfer (spec §4.9, default 10,000).
    pub commit_interval: u32,
    /// Worker pool size (spec §4.1, default `max(2, ncores)`).
    pub job_pool_size: usize,
    /// Descriptor table LRU eviction cap (spec §4.1, default 1024).
    pub job_retention_cap: usize,
    /// `jobTimeout` for extraction-class jobs in seconds (spec §5, default 300).
    /// Data transfer jobs are exempt (spec: "unlimited for data transfer").
    pub extraction_timeout_secs: u64,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            do_all_schemas: true,
            only_test_schema: None,
            exclude_lob_data: false,
            allow_lossy: false,
            fetch_size: 1000,
            commit_interval: 10_000,
            job_pool_size: default_job_pool_size(),
            job_retention_cap: 1024,
            extraction_timeout_secs: 300,
        }
    }
}

fn default_job_pool_size() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(2)
        .max(2)
}
