//! The asynchronous job subsystem (spec §4.1-§4.3, §4.10): `JobRegistry`,
//! `JobService`, the `Job` trait, and `JobResultSummarizer`.

pub mod builtin;
pub mod error;
pub mod job_trait;
pub mod registry;
pub mod service;
pub mod summarizer;

pub use builtin::TestConnectionJob;
pub use error::JobsError;
pub use job_trait::{Job, JobContext, JobDescription, ProgressReporter};
pub use registry::JobRegistry;
pub use service::{CancelOutcome, JobService};
pub use summarizer::summarize;
