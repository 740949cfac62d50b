use ora2pg_model::{ErrorInfo, ErrorKind, JobId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobsError {
    #[error("job not found: {0}")]
    NotFound(JobId),

    #[error("job {0} has not completed yet")]
    NotReady(JobId),

    #[error("no job factory registered for ({0}, {1})")]
    UnknownOperation(ora2pg_model::DatabaseTag, ora2pg_model::OperationKind),

    #[error("the job service is shutting down")]
    ShuttingDown,
}

impl From<JobsError> for ErrorInfo {
    fn from(err: JobsError) -> Self {
        let kind = match &err {
            JobsError::NotFound(_) => ErrorKind::NotFound,
            JobsError::NotReady(_) => ErrorKind::Internal,
            JobsError::UnknownOperation(_, _) => ErrorKind::ConfigError,
            JobsError::ShuttingDown => ErrorKind::Internal,
        };
        ErrorInfo::new(kind, err.to_string())
    }
}
