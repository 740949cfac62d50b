//! Composition root: wires every concrete `Job` implementation from
//! `ora2pg-jobs`/`ora2pg-migrate` into a `JobRegistry`. Lives here rather
//! than in `ora2pg-migrate` itself so that crate can stay ignorant of
//! `ora2pg-jobs`' `TestConnectionJob` without an upward dependency, and so
//! new phases are added in exactly one place regardless of which crate
//! defines them. Grounded on `n8n_core::executor::NodeExecutorRegistry::new`,
//! which performs the same one-shot, exhaustive registration at startup.

use std::sync::Arc;

use ora2pg_jobs::{JobRegistry, TestConnectionJob};
use ora2pg_migrate::compat::{CompatibilityInstaller, CompatibilityVerifier};
use ora2pg_migrate::create::{
    generic::CreatorJob, verify::{TriggerVerifier, ViewVerifier}, ConstraintCreator, FkIndexCreator,
    FunctionStubCreator, ObjectTypeCreator, SchemaCreator, SequenceCreator, SynonymReplacementViewCreator,
    TableCreator, TriggerImplementationCreator, TypeMethodImplementationCreator, TypeMethodStubCreator,
    ViewImplementationCreator, ViewStubCreator,
};
use ora2pg_migrate::extract::generic::ExtractorJob;
use ora2pg_migrate::extract::{
    ConstraintExtractor, FunctionExtractor, ObjectTypeExtractor, RowCountExtractor, SchemaExtractor,
    SequenceExtractor, SynonymExtractor, TableExtractor, TriggerExtractor, TypeMethodExtractor, ViewExtractor,
};
use ora2pg_migrate::transfer::DataTransferEngine;
use ora2pg_model::{DatabaseTag, OperationKind};

pub fn build() -> JobRegistry {
    let mut registry = JobRegistry::new();

    registry.register(DatabaseTag::Oracle, OperationKind::TestConnection, Arc::new(TestConnectionJob::oracle()));
    registry.register(DatabaseTag::Postgres, OperationKind::TestConnection, Arc::new(TestConnectionJob::postgres()));

    registry.register(DatabaseTag::Oracle, OperationKind::SchemaExtract, Arc::new(ExtractorJob::new(SchemaExtractor)));
    registry.register(DatabaseTag::Oracle, OperationKind::SynonymExtract, Arc::new(ExtractorJob::new(SynonymExtractor)));
    registry.register(DatabaseTag::Oracle, OperationKind::ObjectTypeExtract, Arc::new(ExtractorJob::new(ObjectTypeExtractor)));
    registry.register(DatabaseTag::Oracle, OperationKind::SequenceExtract, Arc::new(ExtractorJob::new(SequenceExtractor)));
    registry.register(DatabaseTag::Oracle, OperationKind::TableMetadataExtract, Arc::new(ExtractorJob::new(TableExtractor)));
    registry.register(DatabaseTag::Oracle, OperationKind::RowCountExtract, Arc::new(RowCountExtractor));
    registry.register(DatabaseTag::Oracle, OperationKind::ConstraintExtract, Arc::new(ExtractorJob::new(ConstraintExtractor)));
    registry.register(DatabaseTag::Oracle, OperationKind::ViewExtract, Arc::new(ExtractorJob::new(ViewExtractor)));
    registry.register(DatabaseTag::Oracle, OperationKind::FunctionExtract, Arc::new(ExtractorJob::new(FunctionExtractor)));
    registry.register(DatabaseTag::Oracle, OperationKind::TypeMethodExtract, Arc::new(ExtractorJob::new(TypeMethodExtractor)));
    registry.register(DatabaseTag::Oracle, OperationKind::TriggerExtract, Arc::new(ExtractorJob::new(TriggerExtractor)));

    registry.register(DatabaseTag::Oracle, OperationKind::DataTransfer, Arc::new(DataTransferEngine));

    registry.register(DatabaseTag::Postgres, OperationKind::SchemaCreate, Arc::new(CreatorJob::new(SchemaCreator)));
    registry.register(DatabaseTag::Postgres, OperationKind::ObjectTypeCreate, Arc::new(CreatorJob::new(ObjectTypeCreator::new())));
    registry.register(DatabaseTag::Postgres, OperationKind::SequenceCreate, Arc::new(CreatorJob::new(SequenceCreator)));
    registry.register(DatabaseTag::Postgres, OperationKind::TableCreate, Arc::new(TableCreator));
    registry.register(DatabaseTag::Postgres, OperationKind::ConstraintCreate, Arc::new(CreatorJob::new(ConstraintCreator)));
    registry.register(DatabaseTag::Postgres, OperationKind::FkIndexCreate, Arc::new(FkIndexCreator));
    registry.register(DatabaseTag::Postgres, OperationKind::ViewStubCreate, Arc::new(CreatorJob::new(ViewStubCreator)));
    registry.register(DatabaseTag::Postgres, OperationKind::ViewImplementation, Arc::new(CreatorJob::new(ViewImplementationCreator)));
    registry.register(DatabaseTag::Postgres, OperationKind::ViewVerify, Arc::new(ViewVerifier));
    registry.register(DatabaseTag::Postgres, OperationKind::FunctionStubCreate, Arc::new(CreatorJob::new(FunctionStubCreator)));
    registry.register(DatabaseTag::Postgres, OperationKind::TypeMethodStubCreate, Arc::new(CreatorJob::new(TypeMethodStubCreator)));
    registry.register(DatabaseTag::Postgres, OperationKind::TypeMethodImplementation, Arc::new(CreatorJob::new(TypeMethodImplementationCreator)));
    registry.register(DatabaseTag::Postgres, OperationKind::TriggerImplementation, Arc::new(CreatorJob::new(TriggerImplementationCreator)));
    registry.register(DatabaseTag::Postgres, OperationKind::TriggerVerify, Arc::new(TriggerVerifier));
    registry.register(DatabaseTag::Postgres, OperationKind::OracleCompatInstall, Arc::new(CompatibilityInstaller));
    registry.register(DatabaseTag::Postgres, OperationKind::OracleCompatVerify, Arc::new(CompatibilityVerifier));
    registry.register(DatabaseTag::Postgres, OperationKind::SynonymReplacementViews, Arc::new(SynonymReplacementViewCreator));

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_operation_kind_has_a_registered_factory() {
        let registry = build();
        for kind in OperationKind::ALL {
            let database = ora2pg_orchestrator::PHASES
                .iter()
                .find(|p| p.kind == *kind)
                .map(|p| p.database)
                .expect("every OperationKind appears in PHASES");
            assert!(
                registry.create_job(database, *kind).is_some(),
                "{kind} has no registered Job factory"
            );
        }
    }
}
