use ora2pg_model::{DatabaseTag, OperationKind};

/// Whether a phase's completed item count gates the rest of the migration
/// (spec §4.12: `requireNonZero` / `allowZero`). `None` means the phase's
/// own success/failure is the only signal — item count is meaningless for
/// connection tests and for phases that legitimately expect zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortPolicy {
    RequireNonZero,
    AllowZero,
    None,
}

#[derive(Debug, Clone, Copy)]
pub struct PhaseSpec {
    pub database: DatabaseTag,
    pub kind: OperationKind,
    pub abort_policy: AbortPolicy,
}

/// Fixed migration sequence (spec §4.12). Ordering follows the dependency
/// rules in spec.md §0/§4.8: types before tables, tables before constraints
/// and data, stubs before implementations, compatibility layer and
/// synonym-replacement views last since they may reference anything.
///
/// `SynonymReplacementViews`, `ViewVerify`, `TriggerVerify`, and
/// `OracleCompatVerify` are not in spec.md's illustrative phase list but
/// exist as `OperationKind` variants; placing them after every phase whose
/// objects they could reference (DESIGN.md records this as an Open
/// Question resolution) keeps the fixed sequence exhaustive over the enum.
pub const PHASES: &[PhaseSpec] = &[
    PhaseSpec { database: DatabaseTag::Oracle, kind: OperationKind::TestConnection, abort_policy: AbortPolicy::None },
    PhaseSpec { database: DatabaseTag::Postgres, kind: OperationKind::TestConnection, abort_policy: AbortPolicy::None },
    PhaseSpec { database: DatabaseTag::Oracle, kind: OperationKind::SchemaExtract, abort_policy: AbortPolicy::RequireNonZero },
    PhaseSpec { database: DatabaseTag::Postgres, kind: OperationKind::SchemaCreate, abort_policy: AbortPolicy::AllowZero },
    PhaseSpec { database: DatabaseTag::Oracle, kind: OperationKind::SynonymExtract, abort_policy: AbortPolicy::AllowZero },
    PhaseSpec { database: DatabaseTag::Oracle, kind: OperationKind::ObjectTypeExtract, abort_policy: AbortPolicy::AllowZero },
    PhaseSpec { database: DatabaseTag::Postgres, kind: OperationKind::ObjectTypeCreate, abort_policy: AbortPolicy::AllowZero },
    PhaseSpec { database: DatabaseTag::Oracle, kind: OperationKind::SequenceExtract, abort_policy: AbortPolicy::AllowZero },
    PhaseSpec { database: DatabaseTag::Postgres, kind: OperationKind::SequenceCreate, abort_policy: AbortPolicy::AllowZero },
    PhaseSpec { database: DatabaseTag::Oracle, kind: OperationKind::TableMetadataExtract, abort_policy: AbortPolicy::RequireNonZero },
    PhaseSpec { database: DatabaseTag::Postgres, kind: OperationKind::TableCreate, abort_policy: AbortPolicy::AllowZero },
    PhaseSpec { database: DatabaseTag::Oracle, kind: OperationKind::RowCountExtract, abort_policy: AbortPolicy::AllowZero },
    PhaseSpec { database: DatabaseTag::Oracle, kind: OperationKind::DataTransfer, abort_policy: AbortPolicy::AllowZero },
    PhaseSpec { database: DatabaseTag::Oracle, kind: OperationKind::ConstraintExtract, abort_policy: AbortPolicy::AllowZero },
    PhaseSpec { database: DatabaseTag::Postgres, kind: OperationKind::ConstraintCreate, abort_policy: AbortPolicy::AllowZero },
    PhaseSpec { database: DatabaseTag::Postgres, kind: OperationKind::FkIndexCreate, abort_policy: AbortPolicy::AllowZero },
    PhaseSpec { database: DatabaseTag::Oracle, kind: OperationKind::ViewExtract, abort_policy: AbortPolicy::AllowZero },
    PhaseSpec { database: DatabaseTag::Postgres, kind: OperationKind::ViewStubCreate, abort_policy: AbortPolicy::AllowZero },
    PhaseSpec { database: DatabaseTag::Oracle, kind: OperationKind::FunctionExtract, abort_policy: AbortPolicy::AllowZero },
    PhaseSpec { database: DatabaseTag::Postgres, kind: OperationKind::FunctionStubCreate, abort_policy: AbortPolicy::AllowZero },
    PhaseSpec { database: DatabaseTag::Oracle, kind: OperationKind::TypeMethodExtract, abort_policy: AbortPolicy::AllowZero },
    PhaseSpec { database: DatabaseTag::Postgres, kind: OperationKind::TypeMethodStubCreate, abort_policy: AbortPolicy::AllowZero },
    PhaseSpec { database: DatabaseTag::Postgres, kind: OperationKind::TypeMethodImplementation, abort_policy: AbortPolicy::AllowZero },
    PhaseSpec { database: DatabaseTag::Oracle, kind: OperationKind::TriggerExtract, abort_policy: AbortPolicy::AllowZero },
    PhaseSpec { database: DatabaseTag::Postgres, kind: OperationKind::TriggerImplementation, abort_policy: AbortPolicy::AllowZero },
    PhaseSpec { database: DatabaseTag::Postgres, kind: OperationKind::OracleCompatInstall, abort_policy: AbortPolicy::AllowZero },
    PhaseSpec { database: DatabaseTag::Postgres, kind: OperationKind::SynonymReplacementViews, abort_policy: AbortPolicy::None },
    PhaseSpec { database: DatabaseTag::Postgres, kind: OperationKind::ViewImplementation, abort_policy: AbortPolicy::AllowZero },
    PhaseSpec { database: DatabaseTag::Postgres, kind: OperationKind::ViewVerify, abort_policy: AbortPolicy::None },
    PhaseSpec { database: DatabaseTag::Postgres, kind: OperationKind::TriggerVerify, abort_policy: AbortPolicy::None },
    PhaseSpec { database: DatabaseTag::Postgres, kind: OperationKind::OracleCompatVerify, abort_policy: AbortPolicy::None },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_create_follows_schema_extract() {
        let extract_pos = PHASES.iter().position(|p| p.kind == OperationKind::SchemaExtract).unwrap();
        let create_pos = PHASES.iter().position(|p| p.kind == OperationKind::SchemaCreate).unwrap();
        assert!(extract_pos < create_pos);
    }

    #[test]
    fn stub_phases_precede_their_implementation_phases() {
        let stub = PHASES.iter().position(|p| p.kind == OperationKind::TypeMethodStubCreate).unwrap();
        let implementation = PHASES.iter().position(|p| p.kind == OperationKind::TypeMethodImplementation).unwrap();
        assert!(stub < implementation);

        let view_stub = PHASES.iter().position(|p| p.kind == OperationKind::ViewStubCreate).unwrap();
        let view_implementation = PHASES.iter().position(|p| p.kind == OperationKind::ViewImplementation).unwrap();
        assert!(view_stub < view_implementation);
    }

    #[test]
    fn table_create_precedes_constraint_and_data_phases() {
        let table_create = PHASES.iter().position(|p| p.kind == OperationKind::TableCreate).unwrap();
        let constraint_create = PHASES.iter().position(|p| p.kind == OperationKind::ConstraintCreate).unwrap();
        let data_transfer = PHASES.iter().position(|p| p.kind == OperationKind::DataTransfer).unwrap();
        assert!(table_create < constraint_create);
        assert!(table_create < data_transfer);
    }

    #[test]
    fn every_operation_kind_appears_exactly_once() {
        for kind in OperationKind::ALL {
            let count = PHASES.iter().filter(|p| p.kind == *kind).count();
            assert_eq!(count, 1, "{kind} should appear exactly once in the fixed phase list");
        }
    }
}
