//! Job contracts (spec §3, §4.2): `JobId`, `DatabaseTag`, `OperationKind`,
//! `JobState`, `Progress`, `JobDescriptor`, `JobResult`, `CreationOutcome<T>`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ErrorInfo, ModelError};

/// Opaque, globally-unique-within-a-process-run job identifier. Generated at
/// submit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for JobId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Which database a job operates against, used as the first half of the
/// `JobRegistry` dispatch key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseTag {
    Oracle,
    Postgres,
}

impl DatabaseTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseTag::Oracle => "oracle",
            DatabaseTag::Postgres => "postgres",
        }
    }
}

impl fmt::Display for DatabaseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatabaseTag {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "oracle" => Ok(DatabaseTag::Oracle),
            "postgres" | "postgresql" => Ok(DatabaseTag::Postgres),
            other => Err(ModelError::UnknownDatabaseTag(other.to_string())),
        }
    }
}

/// Every phase the migration pipeline (or an out-of-band caller) can submit.
/// The second half of the `JobRegistry` dispatch key, alongside `DatabaseTag`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationKind {
    TestConnection,
    SchemaExtract,
    SchemaCreate,
    SynonymExtract,
    SynonymReplacementViews,
    ObjectTypeExtract,
    ObjectTypeCreate,
    SequenceExtract,
    SequenceCreate,
    TableMetadataExtract,
    TableCreate,
    RowCountExtract,
    DataTransfer,
    ConstraintExtract,
    ConstraintCreate,
    FkIndexCreate,
    ViewExtract,
    ViewStubCreate,
    ViewImplementation,
    ViewVerify,
    FunctionExtract,
    FunctionStubCreate,
    TypeMethodExtract,
    TypeMethodStubCreate,
    TypeMethodImplementation,
    TriggerExtract,
    TriggerImplementation,
    TriggerVerify,
    OracleCompatInstall,
    OracleCompatVerify,
}

impl OperationKind {
    pub const ALL: &'static [OperationKind] = &[
        OperationKind::TestConnection,
        OperationKind::SchemaExtract,
        OperationKind::SchemaCreate,
        OperationKind::SynonymExtract,
        OperationKind::SynonymReplacementViews,
        OperationKind::ObjectTypeExtract,
        OperationKind::ObjectTypeCreate,
        OperationKind::SequenceExtract,
        OperationKind::SequenceCreate,
        OperationKind::TableMetadataExtract,
        OperationKind::TableCreate,
        OperationKind::RowCountExtract,
        OperationKind::DataTransfer,
        OperationKind::ConstraintExtract,
        OperationKind::ConstraintCreate,
        OperationKind::FkIndexCreate,
        OperationKind::ViewExtract,
        OperationKind::ViewStubCreate,
        OperationKind::ViewImplementation,
        OperationKind::ViewVerify,
        OperationKind::FunctionExtract,
        OperationKind::FunctionStubCreate,
        OperationKind::TypeMethodExtract,
        OperationKind::TypeMethodStubCreate,
        OperationKind::TypeMethodImplementation,
        OperationKind::TriggerExtract,
        OperationKind::TriggerImplementation,
        OperationKind::TriggerVerify,
        OperationKind::OracleCompatInstall,
        OperationKind::OracleCompatVerify,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::TestConnection => "TEST_CONNECTION",
            OperationKind::SchemaExtract => "SCHEMA_EXTRACT",
            OperationKind::SchemaCreate => "SCHEMA_CREATE",
            OperationKind::SynonymExtract => "SYNONYM_EXTRACT",
            OperationKind::SynonymReplacementViews => "SYNONYM_REPLACEMENT_VIEWS",
            OperationKind::ObjectTypeExtract => "OBJECT_TYPE_EXTRACT",
            OperationKind::ObjectTypeCreate => "OBJECT_TYPE_CREATE",
            OperationKind::SequenceExtract => "SEQUENCE_EXTRACT",
            OperationKind::SequenceCreate => "SEQUENCE_CREATE",
            OperationKind::TableMetadataExtract => "TABLE_METADATA_EXTRACT",
            OperationKind::TableCreate => "TABLE_CREATE",
            OperationKind::RowCountExtract => "ROW_COUNT_EXTRACT",
            OperationKind::DataTransfer => "DATA_TRANSFER",
            OperationKind::ConstraintExtract => "CONSTRAINT_EXTRACT",
            OperationKind::ConstraintCreate => "CONSTRAINT_CREATE",
            OperationKind::FkIndexCreate => "FK_INDEX_CREATE",
            OperationKind::ViewExtract => "VIEW_EXTRACT",
            OperationKind::ViewStubCreate => "VIEW_STUB_CREATE",
            OperationKind::ViewImplementation => "VIEW_IMPLEMENTATION",
            OperationKind::ViewVerify => "VIEW_VERIFY",
            OperationKind::FunctionExtract => "FUNCTION_EXTRACT",
            OperationKind::FunctionStubCreate => "FUNCTION_STUB_CREATE",
            OperationKind::TypeMethodExtract => "TYPE_METHOD_EXTRACT",
            OperationKind::TypeMethodStubCreate => "TYPE_METHOD_STUB_CREATE",
            OperationKind::TypeMethodImplementation => "TYPE_METHOD_IMPLEMENTATION",
            OperationKind::TriggerExtract => "TRIGGER_EXTRACT",
            OperationKind::TriggerImplementation => "TRIGGER_IMPLEMENTATION",
            OperationKind::TriggerVerify => "TRIGGER_VERIFY",
            OperationKind::OracleCompatInstall => "ORACLE_COMPAT_INSTALL",
            OperationKind::OracleCompatVerify => "ORACLE_COMPAT_VERIFY",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OperationKind::ALL
            .iter()
            .find(|k| k.as_str() == s)
            .copied()
            .ok_or_else(|| ModelError::UnknownOperationKind(s.to_string()))
    }
}

/// `PENDING -> RUNNING -> {COMPLETED, FAILED, CANCELLED}`. Terminal states
/// are immutable; `CANCELLED` is reachable only from `PENDING` or `RUNNING`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobState {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobState::Completed | JobState::Failed | JobState::Cancelled
        )
    }

    /// Whether `self -> next` is a legal transition per the state machine in
    /// spec §3.
    pub fn can_transition_to(&self, next: JobState) -> bool {
        use JobState::*;
        matches!(
            (self, next),
            (Pending, Running)
                | (Pending, Cancelled)
                | (Running, Completed)
                | (Running, Failed)
                | (Running, Cancelled)
        )
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobState::Pending => "PENDING",
            JobState::Running => "RUNNING",
            JobState::Completed => "COMPLETED",
            JobState::Failed => "FAILED",
            JobState::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

/// `{percentage, currentTask, details}`. Monotonic non-decreasing in
/// `percentage` while `RUNNING`; may reach 100 only at `COMPLETED`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Progress {
    pub percentage: u8,
    pub current_task: String,
    pub details: String,
}

impl Progress {
    pub fn new(percentage: u8, current_task: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            percentage: percentage.min(100),
            current_task: current_task.into(),
            details: details.into(),
        }
    }

    pub fn started() -> Self {
        Self::new(0, "queued", "")
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::started()
    }
}

/// `{id, kind, database, state, progress, submittedAt, startedAt?,
/// finishedAt?, result?, error?}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDescriptor {
    pub id: JobId,
    pub kind: OperationKind,
    pub database: DatabaseTag,
    pub state: JobState,
    pub progress: Progress,
    pub submitted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<JobResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl JobDescriptor {
    pub fn new(id: JobId, kind: OperationKind, database: DatabaseTag) -> Self {
        Self {
            id,
            kind,
            database,
            state: JobState::Pending,
            progress: Progress::started(),
            submitted_at: Utc::now(),
            started_at: None,
            finished_at: None,
            result: None,
            error: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state.is_terminal()
    }
}

/// `Success(payload, summary) | Failure(errorInfo)` (spec §4.2). `payload`
/// and `summary` are kept as `serde_json::Value` here: each domain module
/// (extractor output, `CreationOutcome<T>`) defines its own concrete shape
/// and serializes into this envelope rather than this crate depending on
/// every downstream crate's types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum JobResult {
    Success {
        payload: serde_json::Value,
        summary: serde_json::Value,
    },
    Failure {
        error: ErrorInfo,
    },
}

impl JobResult {
    pub fn success(payload: serde_json::Value, summary: serde_json::Value) -> Self {
        JobResult::Success { payload, summary }
    }

    pub fn failure(error: ErrorInfo) -> Self {
        JobResult::Failure { error }
    }

    pub fn is_successful(&self) -> bool {
        matches!(self, JobResult::Success { .. })
    }
}

/// An item a Creator declined to create because it already exists, paired
/// with the human-readable reason (e.g. `"already exists"`, `"remote
/// synonym"`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedItem<T> {
    pub item: T,
    pub reason: String,
}

/// An item a Creator failed to create, with the DDL it attempted (invariant:
/// spec §8.5 requires this to be non-empty).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorItem<T> {
    pub item: T,
    pub error_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql_statement: Option<String>,
}

/// `{created, skipped, errors, executionTimestamp, isSuccessful}` (spec §3).
/// The standard output shape of every Creator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreationOutcome<T> {
    pub created: Vec<T>,
    pub skipped: Vec<SkippedItem<T>>,
    pub errors: Vec<ErrorItem<T>>,
    pub execution_timestamp: DateTime<Utc>,
}

impl<T> CreationOutcome<T> {
    pub fn new() -> Self {
        Self {
            created: Vec::new(),
            skipped: Vec::new(),
            errors: Vec::new(),
            execution_timestamp: Utc::now(),
        }
    }

    /// `isSuccessful := errors.empty` (spec §3).
    pub fn is_successful(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn created_count(&self) -> usize {
        self.created.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn push_created(&mut self, item: T) {
        self.created.push(item);
    }

    pub fn push_skipped(&mut self, item: T, reason: impl Into<String>) {
        self.skipped.push(SkippedItem {
            item,
            reason: reason.into(),
        });
    }

    pub fn push_error(&mut self, item: T, error_message: impl Into<String>, sql_statement: Option<String>) {
        self.errors.push(ErrorItem {
            item,
            error_message: error_message.into(),
            sql_statement,
        });
    }
}

impl<T> Default for CreationOutcome<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_kind_roundtrips_through_display_and_from_str() {
        for kind in OperationKind::ALL {
            let s = kind.to_string();
            let parsed: OperationKind = s.parse().expect("round-trip parse");
            assert_eq!(parsed, *kind);
        }
    }

    #[test]
    fn unknown_operation_kind_is_rejected() {
        assert!("NOT_A_REAL_PHASE".parse::<OperationKind>().is_err());
    }

    #[test]
    fn job_state_transitions_follow_the_spec_state_machine() {
        assert!(JobState::Pending.can_transition_to(JobState::Running));
        assert!(JobState::Pending.can_transition_to(JobState::Cancelled));
        assert!(JobState::Running.can_transition_to(JobState::Completed));
        assert!(JobState::Running.can_transition_to(JobState::Failed));
        assert!(JobState::Running.can_transition_to(JobState::Cancelled));
        assert!(!JobState::Completed.can_transition_to(JobState::Running));
        assert!(!JobState::Pending.can_transition_to(JobState::Completed));
    }

    #[test]
    fn terminal_states_are_identified_correctly() {
        assert!(!JobState::Pending.is_terminal());
        assert!(!JobState::Running.is_terminal());
        assert!(JobState::Completed.is_terminal());
        assert!(JobState::Failed.is_terminal());
        assert!(JobState::Cancelled.is_terminal());
    }

    #[test]
    fn creation_outcome_is_successful_iff_errors_are_empty() {
        let mut outcome: CreationOutcome<String> = CreationOutcome::new();
        assert!(outcome.is_successful());
        outcome.push_created("s.t1".to_string());
        outcome.push_skipped("s.t2".to_string(), "already exists");
        assert!(outcome.is_successful());
        outcome.push_error("s.t3".to_string(), "boom", Some("CREATE TABLE s.t3 (...)".to_string()));
        assert!(!outcome.is_successful());
        assert_eq!(outcome.created_count(), 1);
        assert_eq!(outcome.skipped_count(), 1);
        assert_eq!(outcome.error_count(), 1);
    }

    #[test]
    fn database_tag_parses_common_spellings() {
        assert_eq!("oracle".parse::<DatabaseTag>().unwrap(), DatabaseTag::Oracle);
        assert_eq!("postgres".parse::<DatabaseTag>().unwrap(), DatabaseTag::Postgres);
        assert_eq!("postgresql".parse::<DatabaseTag>().unwrap(), DatabaseTag::Postgres);
        assert!("mysql".parse::<DatabaseTag>().is_err());
    }
}
