//! `StateStore` (spec §4.5) and `ConnectionProvider` (spec §4.4): the shared,
//! process-wide state that every Extractor, Creator, and the Orchestrator is
//! given by dependency injection rather than reaching for as an ambient
//! global (spec §9, "Process-wide state").

pub mod connection;
pub mod error;
pub mod state_store;

pub use connection::{ConnectionProvider, ConnectionSettings, ConnectionTestResult};
pub use error::DbError;
pub use state_store::{phase_keys, StateStore};
