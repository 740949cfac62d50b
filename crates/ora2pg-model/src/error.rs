//! Error taxonomy (spec §7). One shared enum of error *kinds*, classifying
//! both per-item failures (folded into a `CreationOutcome`) and job-level
//! failures (which abort a job and land in `JobDescriptor.error`).

use thiserror::Error;

/// The taxonomy itself. Kept separate from `ModelError` because `ErrorKind`
/// is a plain, serializable classification attached to `ErrorInfo`, while
/// `ModelError` is this crate's own fallible-operation error (identifier
/// validation, malformed `OperationKind` strings, etc).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Missing or invalid configuration; surfaced at connection test.
    ConfigError,
    /// Network/auth failure; retryable by the caller.
    ConnectionError,
    /// Referenced job or entity unknown.
    NotFound,
    /// Object already exists (benign; produces `skipped`).
    Conflict,
    /// SQL execution failed; captured per-item with the SQL text.
    SqlError,
    /// TypeMapper could not handle an input; non-fatal.
    MappingWarning,
    /// Job exceeded its deadline.
    Timeout,
    /// Job was cancelled.
    Cancelled,
    /// Unexpected invariant violation.
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ConfigError => "CONFIG_ERROR",
            ErrorKind::ConnectionError => "CONNECTION_ERROR",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::SqlError => "SQL_ERROR",
            ErrorKind::MappingWarning => "MAPPING_WARNING",
            ErrorKind::Timeout => "TIMEOUT",
            ErrorKind::Cancelled => "CANCELLED",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `{kind, message, cause?}` — attached to a `FAILED` `JobDescriptor` and to
/// `JobResult::Failure`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl ErrorInfo {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }
}

impl std::fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ErrorInfo {}

/// Failures internal to this crate's own operations (parsing, validation).
#[derive(Error, Debug, Clone)]
pub enum ModelError {
    #[error("unknown operation kind: {0}")]
    UnknownOperationKind(String),

    #[error("unknown database tag: {0}")]
    UnknownDatabaseTag(String),

    #[error("invalid job state transition: {from:?} -> {to:?}")]
    InvalidStateTransition { from: String, to: String },
}
