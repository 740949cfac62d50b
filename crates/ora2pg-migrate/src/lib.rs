//! Phase bodies of the migration pipeline (spec §4.7-§4.11): the
//! Extractors and Creators that read Oracle's dictionary and emit
//! PostgreSQL DDL, the `DataTransferEngine`, and the Oracle compatibility
//! layer. `ora2pg-orchestrator` sequences these; `ora2pg-server` wires each
//! concrete job into the `JobRegistry`.

pub mod compat;
pub mod create;
pub mod extract;
pub mod schema_filter;
pub mod signature;
pub mod sql_classify;
pub mod transfer;
pub mod view_translate;

pub use compat::{CompatibilityInstaller, CompatibilityVerifier};
pub use transfer::DataTransferEngine;
