//! `ConfigStore` (spec §6 C1): process-wide holder of connection and path
//! settings, loaded env-var-first the way the teacher's `Config::from_env`
//! does, then overridable at runtime via `POST /api/config` and restorable
//! via `POST /api/config/reset`. Every update is pushed down into
//! `ConnectionProvider::reconfigure` and `JobService::update_config` rather
//! than read lazily, so a job already in flight observes a consistent
//! snapshot taken at submit time.

use std::env;

use ora2pg_db::ConnectionSettings;
use ora2pg_model::JobConfig;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// The full set of configuration keys from spec §6, flattened into one
/// struct. `#[serde(default)]` on every field lets `POST /api/config` accept
/// a partial JSON body that only overrides the keys the caller cares about,
/// matching the teacher's `Config` pattern of always having a sane default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigValues {
    #[serde(default = "default_true")]
    pub do_all_schemas: bool,
    #[serde(default)]
    pub only_test_schema: Option<String>,
    #[serde(default)]
    pub exclude_lob_data: bool,
    #[serde(default)]
    pub allow_lossy: bool,

    #[serde(default)]
    pub oracle_url: Option<String>,
    #[serde(default)]
    pub oracle_user: Option<String>,
    #[serde(default)]
    pub oracle_password: Option<String>,

    #[serde(default)]
    pub postgres_url: Option<String>,
    #[serde(default)]
    pub postgres_username: Option<String>,
    #[serde(default)]
    pub postgres_password: Option<String>,

    /// `path.target-project-*`: optional output paths for generated DDL
    /// dumps. The core does not write to disk on its own; a caller that
    /// wants a copy of the emitted SQL sets this and a future exporter job
    /// can pick it up. `None` means "do not dump".
    #[serde(default)]
    pub path_target_project: Option<String>,
    /// Unused by core; retained so external collaborators (code generators
    /// downstream of this service) can round-trip it unmodified.
    #[serde(default)]
    pub java_generated_package_name: Option<String>,

    #[serde(default = "default_fetch_size")]
    pub fetch_size: u32,
    #[serde(default = "default_commit_interval")]
    pub commit_interval: u32,
    #[serde(default = "default_job_pool_size")]
    pub job_pool_size: usize,
    #[serde(default = "default_job_retention_cap")]
    pub job_retention_cap: usize,
    #[serde(default = "default_extraction_timeout_secs")]
    pub extraction_timeout_secs: u64,
}

fn default_true() -> bool {
    true
}
fn default_fetch_size() -> u32 {
    1000
}
fn default_commit_interval() -> u32 {
    10_000
}
fn default_job_pool_size() -> usize {
    JobConfig::default().job_pool_size
}
fn default_job_retention_cap() -> usize {
    1024
}
fn default_extraction_timeout_secs() -> u64 {
    300
}

impl ConfigValues {
    fn from_env() -> Self {
        let defaults = JobConfig::default();
        Self {
            do_all_schemas: env_bool("DO_ALL_SCHEMAS", true),
            only_test_schema: env::var("DO_ONLY_TEST_SCHEMA").ok(),
            exclude_lob_data: env_bool("EXCLUDE_LOB_DATA", false),
            allow_lossy: env_bool("ALLOW_LOSSY", false),

            oracle_url: env::var("ORACLE_URL").ok(),
            oracle_user: env::var("ORACLE_USER").ok(),
            oracle_password: env::var("ORACLE_PASSWORD").ok(),

            postgres_url: env::var("POSTGRES_URL").ok(),
            postgres_username: env::var("POSTGRES_USERNAME").ok(),
            postgres_password: env::var("POSTGRES_PASSWORD").ok(),

            path_target_project: env::var("PATH_TARGET_PROJECT").ok(),
            java_generated_package_name: env::var("JAVA_GENERATED_PACKAGE_NAME").ok(),

            fetch_size: env_num("FETCH_SIZE", defaults.fetch_size),
            commit_interval: env_num("COMMIT_INTERVAL", defaults.commit_interval),
            job_pool_size: env_num("JOB_POOL_SIZE", defaults.job_pool_size),
            job_retention_cap: env_num("JOB_RETENTION_CAP", defaults.job_retention_cap),
            extraction_timeout_secs: env_num("EXTRACTION_TIMEOUT_SECS", defaults.extraction_timeout_secs),
        }
    }

    pub fn to_job_config(&self) -> JobConfig {
        JobConfig {
            do_all_schemas: self.do_all_schemas,
            only_test_schema: self.only_test_schema.clone(),
            exclude_lob_data: self.exclude_lob_data,
            allow_lossy: self.allow_lossy,
            fetch_size: self.fetch_size,
            commit_interval: self.commit_interval,
            job_pool_size: self.job_pool_size,
            job_retention_cap: self.job_retention_cap,
            extraction_timeout_secs: self.extraction_timeout_secs,
        }
    }

    pub fn to_connection_settings(&self) -> ConnectionSettings {
        ConnectionSettings {
            oracle_connect_string: self.oracle_url.clone(),
            oracle_user: self.oracle_user.clone(),
            oracle_password: self.oracle_password.clone(),
            postgres_url: self.postgres_url.clone(),
        }
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_num<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

/// Holds the live configuration plus the env-loaded baseline `/api/config/reset`
/// restores. A single `RwLock` is enough: reads are short, writes are rare
/// (operator-driven, not per-job).
pub struct ConfigStore {
    defaults: ConfigValues,
    current: RwLock<ConfigValues>,
}

impl ConfigStore {
    pub fn from_env() -> Self {
        let defaults = ConfigValues::from_env();
        Self {
            current: RwLock::new(defaults.clone()),
            defaults,
        }
    }

    pub fn get(&self) -> ConfigValues {
        self.current.read().clone()
    }

    pub fn set(&self, values: ConfigValues) {
        *self.current.write() = values;
    }

    pub fn reset(&self) -> ConfigValues {
        let restored = self.defaults.clone();
        *self.current.write() = restored.clone();
        restored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_restores_the_env_loaded_baseline_after_an_override() {
        let store = ConfigStore::from_env();
        let mut overridden = store.get();
        overridden.exclude_lob_data = true;
        overridden.commit_interval = 1;
        store.set(overridden);
        assert!(store.get().exclude_lob_data);

        let restored = store.reset();
        assert_eq!(restored.exclude_lob_data, store.defaults.exclude_lob_data);
        assert_eq!(store.get().commit_interval, store.defaults.commit_interval);
    }

    #[test]
    fn job_config_projection_carries_every_job_relevant_field() {
        let store = ConfigStore::from_env();
        let mut values = store.get();
        values.fetch_size = 42;
        values.commit_interval = 7;
        let job_config = values.to_job_config();
        assert_eq!(job_config.fetch_size, 42);
        assert_eq!(job_config.commit_interval, 7);
    }
}
