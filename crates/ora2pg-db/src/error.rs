//! Errors surfaced by `StateStore` and `ConnectionProvider`.

use ora2pg_model::{ErrorInfo, ErrorKind};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("not configured: {0}")]
    NotConfigured(String),

    #[error("oracle connection error: {0}")]
    Oracle(#[from] oracle::Error),

    #[error("postgres connection error: {0}")]
    Postgres(#[from] sqlx::Error),

    #[error("blocking task panicked: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl From<&DbError> for ErrorKind {
    fn from(err: &DbError) -> Self {
        match err {
            DbError::NotConfigured(_) => ErrorKind::ConfigError,
            DbError::Oracle(_) | DbError::Postgres(_) => ErrorKind::ConnectionError,
            DbError::TaskJoin(_) => ErrorKind::Internal,
        }
    }
}

impl From<DbError> for ErrorInfo {
    fn from(err: DbError) -> Self {
        let kind = ErrorKind::from(&err);
        ErrorInfo::new(kind, err.to_string())
    }
}
