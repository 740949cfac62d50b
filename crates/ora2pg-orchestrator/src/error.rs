use ora2pg_model::OperationKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("phase {phase} failed: {message}")]
    PhaseFailed { phase: OperationKind, message: String },

    #[error("phase {phase} required at least one item but extracted/created zero")]
    PolicyViolation { phase: OperationKind },

    #[error(transparent)]
    Jobs(#[from] ora2pg_jobs::JobsError),
}
