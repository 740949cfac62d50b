//! Canonical metadata entities (spec §3). Produced by Extractors, owned by
//! `StateStore`, read by Creators and the Orchestrator. Plain data only — no
//! behavior beyond small accessors.

use serde::{Deserialize, Serialize};

/// `{name}`. Unique by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub name: String,
}

/// `{owner, synonymName, targetOwner, targetName, dbLink?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Synonym {
    pub owner: String,
    pub synonym_name: String,
    pub target_owner: String,
    pub target_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_link: Option<String>,
}

impl Synonym {
    /// A synonym pointing at a remote database, which `SynonymReplacementViewCreator`
    /// must skip with reason `"remote synonym"`.
    pub fn is_remote(&self) -> bool {
        self.db_link.is_some()
    }
}

/// A single attribute of an Oracle object type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeVariable {
    pub name: String,
    pub data_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<i32>,
}

/// Oracle user-defined type. `(schema, name)` unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDataType {
    pub schema: String,
    pub name: String,
    pub variables: Vec<TypeVariable>,
}

/// `{schema, name, startValue, minValue, maxValue, increment, cycle,
/// cacheSize, lastNumber}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    pub schema: String,
    pub name: String,
    pub start_value: i64,
    pub min_value: i64,
    pub max_value: i64,
    pub increment: i64,
    pub cycle: bool,
    pub cache_size: i64,
    pub last_number: i64,
}

/// `{name, oracleType, length?, precision?, scale?, nullable,
/// defaultExpression?, positionOrdinal}`. Position ordinals are stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub oracle_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<i32>,
    pub nullable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_expression: Option<String>,
    pub position_ordinal: u32,
}

/// `{schema, name, columns, constraints?}`. PostgreSQL creation happens
/// without constraints; constraints are added by a later phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub schema: String,
    pub name: String,
    pub columns: Vec<Column>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Vec<Constraint>>,
}

impl Table {
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }
}

/// `P | U | R | C` — primary key, unique, foreign key (references), check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintType {
    #[serde(rename = "P")]
    PrimaryKey,
    #[serde(rename = "U")]
    Unique,
    #[serde(rename = "R")]
    ForeignKey,
    #[serde(rename = "C")]
    Check,
}

impl ConstraintType {
    /// Application order required by `ConstraintCreator` (spec §4.8): P -> U
    /// -> R -> C, so foreign keys always reference an already-existing
    /// primary/unique key.
    pub fn creation_rank(&self) -> u8 {
        match self {
            ConstraintType::PrimaryKey => 0,
            ConstraintType::Unique => 1,
            ConstraintType::ForeignKey => 2,
            ConstraintType::Check => 3,
        }
    }

    pub fn as_letter(&self) -> char {
        match self {
            ConstraintType::PrimaryKey => 'P',
            ConstraintType::Unique => 'U',
            ConstraintType::ForeignKey => 'R',
            ConstraintType::Check => 'C',
        }
    }
}

/// `{schema, tableName, constraintName, constraintType, columns,
/// referencedTable?, referencedColumns?, checkExpression?, deferrable,
/// initiallyDeferred}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub schema: String,
    pub table_name: String,
    pub constraint_name: String,
    pub constraint_type: ConstraintType,
    /// Oracle key-column ordering preserved as-is (composite keys must keep
    /// their original column order).
    pub columns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referenced_table: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referenced_columns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_expression: Option<String>,
    pub deferrable: bool,
    pub initially_deferred: bool,
}

/// A single projected output column of a view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewColumn {
    pub name: String,
    pub data_type: String,
}

/// `{schema, viewName, columns, oracleDefinitionSql, translatedSql?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub schema: String,
    pub view_name: String,
    pub columns: Vec<ViewColumn>,
    pub oracle_definition_sql: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translated_sql: Option<String>,
}

/// `FUNCTION | PROCEDURE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoutineKind {
    Function,
    Procedure,
}

/// `{schema, objectName, packageName?, objectType, signature}`.
/// Package-qualified names are flattened on the PostgreSQL side as
/// `package_objectname`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionOrProcedure {
    pub schema: String,
    pub object_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,
    pub object_type: RoutineKind,
    pub signature: String,
}

impl FunctionOrProcedure {
    /// The flattened PostgreSQL-side name, per spec §9's uniform
    /// `pkg_objectname` convention.
    pub fn flattened_name(&self) -> String {
        match &self.package_name {
            Some(pkg) => format!("{}_{}", pkg.to_lowercase(), self.object_name.to_lowercase()),
            None => self.object_name.to_lowercase(),
        }
    }
}

/// `YES | NO` — whether a type method can be invoked on an uninitialized
/// instance (Oracle `INSTANTIABLE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instantiable {
    Yes,
    No,
}

/// `{schema, typeName, methodName, methodType, instantiable, signature, body?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeMethod {
    pub schema: String,
    pub type_name: String,
    pub method_name: String,
    pub method_type: String,
    pub instantiable: Instantiable,
    pub signature: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// `BEFORE | AFTER | INSTEAD (OF)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerType {
    Before,
    After,
    Instead,
}

/// `ROW | STATEMENT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerLevel {
    Row,
    Statement,
}

/// `{schema, triggerName, tableName, triggerType, triggerLevel, event, body}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    pub schema: String,
    pub trigger_name: String,
    pub table_name: String,
    pub trigger_type: TriggerType,
    pub trigger_level: TriggerLevel,
    pub event: String,
    pub body: String,
}

/// `rowCount: int64 | ERROR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowCountValue {
    Count(i64),
    Error,
}

/// `{schema, tableName, rowCount}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowCount {
    pub schema: String,
    pub table_name: String,
    pub row_count: RowCountValue,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_creation_rank_orders_p_u_r_c() {
        let mut ranks = vec![
            ConstraintType::Check.creation_rank(),
            ConstraintType::ForeignKey.creation_rank(),
            ConstraintType::PrimaryKey.creation_rank(),
            ConstraintType::Unique.creation_rank(),
        ];
        ranks.sort();
        assert_eq!(
            ranks,
            vec![
                ConstraintType::PrimaryKey.creation_rank(),
                ConstraintType::Unique.creation_rank(),
                ConstraintType::ForeignKey.creation_rank(),
                ConstraintType::Check.creation_rank(),
            ]
        );
    }

    #[test]
    fn package_qualified_names_flatten_with_underscore() {
        let f = FunctionOrProcedure {
            schema: "hr".into(),
            object_name: "calc_bonus".into(),
            package_name: Some("PAYROLL".into()),
            object_type: RoutineKind::Function,
            signature: "()".into(),
        };
        assert_eq!(f.flattened_name(), "payroll_calc_bonus");

        let g = FunctionOrProcedure {
            schema: "hr".into(),
            object_name: "calc_bonus".into(),
            package_name: None,
            object_type: RoutineKind::Function,
            signature: "()".into(),
        };
        assert_eq!(g.flattened_name(), "calc_bonus");
    }

    #[test]
    fn synonym_is_remote_iff_db_link_present() {
        let local = Synonym {
            owner: "hr".into(),
            synonym_name: "emp".into(),
            target_owner: "hr".into(),
            target_name: "employees".into(),
            db_link: None,
        };
        assert!(!local.is_remote());

        let remote = Synonym {
            db_link: Some("remote_db".into()),
            ..local
        };
        assert!(remote.is_remote());
    }
}
