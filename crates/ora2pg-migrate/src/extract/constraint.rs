//! ConstraintExtract (spec §4.7): reads `ALL_CONSTRAINTS` joined to
//! `ALL_CONS_COLUMNS`, aggregating each constraint's columns (in Oracle's
//! `position` order, so composite keys keep their original ordering) into a
//! JSON array server-side.

use ora2pg_model::{Constraint, ConstraintType, OperationKind};
use serde::Deserialize;

use super::generic::ExtractorQuery;
use crate::schema_filter::SchemaFilter;

pub struct ConstraintExtractor;

#[derive(Deserialize)]
struct RawConstraint {
    schema: String,
    table_name: String,
    constraint_name: String,
    constraint_type: String,
    columns: Vec<String>,
    referenced_table: Option<String>,
    referenced_columns: Option<Vec<String>>,
    check_expression: Option<String>,
    deferrable: String,
    initially_deferred: String,
}

impl RawConstraint {
    /// `query_sql` restricts `constraint_type IN ('P','U','R','C')`, so an
    /// unrecognized code here means the dictionary returned something the
    /// query didn't ask for; fall back to `Check` rather than drop the row.
    fn constraint_type(&self) -> ConstraintType {
        match self.constraint_type.as_str() {
            "P" => ConstraintType::PrimaryKey,
            "U" => ConstraintType::Unique,
            "R" => ConstraintType::ForeignKey,
            _ => ConstraintType::Check,
        }
    }
}

impl From<RawConstraint> for Constraint {
    fn from(raw: RawConstraint) -> Self {
        let constraint_type = raw.constraint_type();
        Constraint {
            schema: raw.schema,
            table_name: raw.table_name,
            constraint_name: raw.constraint_name,
            constraint_type,
            columns: raw.columns,
            referenced_table: raw.referenced_table,
            referenced_columns: raw.referenced_columns,
            check_expression: raw.check_expression,
            deferrable: raw.deferrable == "DEFERRABLE",
            initially_deferred: raw.initially_deferred == "DEFERRED",
        }
    }
}

impl ExtractorQuery for ConstraintExtractor {
    type Item = Constraint;

    fn operation_kind(&self) -> OperationKind {
        OperationKind::ConstraintExtract
    }

    fn friendly_name(&self) -> &'static str {
        "Extract constraints"
    }

    fn phase_key(&self) -> &'static str {
        "oracle.constraints"
    }

    fn query_sql(&self, filter: &SchemaFilter) -> String {
        format!(
            "SELECT c.owner, c.table_name, c.constraint_name, c.constraint_type, \
                    (SELECT JSON_ARRAYAGG(cc.column_name ORDER BY cc.position) \
                     FROM all_cons_columns cc \
                     WHERE cc.owner = c.owner AND cc.constraint_name = c.constraint_name) AS columns_json, \
                    r.table_name AS referenced_table, \
                    (SELECT JSON_ARRAYAGG(rc.column_name ORDER BY rc.position) \
                     FROM all_cons_columns rc \
                     WHERE rc.owner = c.r_owner AND rc.constraint_name = c.r_constraint_name) AS referenced_columns_json, \
                    c.search_condition AS check_expression, \
                    c.deferrable, c.deferred \
             FROM all_constraints c \
             LEFT JOIN all_constraints r ON r.owner = c.r_owner AND r.constraint_name = c.r_constraint_name \
             WHERE c.constraint_type IN ('P','U','R','C') AND {}",
            filter.owner_predicate("c.owner")
        )
    }

    fn row_to_item(&self, row: &oracle::Row) -> Result<Self::Item, oracle::Error> {
        let columns_json: Option<String> = row.get(4)?;
        let referenced_columns_json: Option<String> = row.get(6)?;

        let raw = RawConstraint {
            schema: row.get(0)?,
            table_name: row.get(1)?,
            constraint_name: row.get(2)?,
            constraint_type: row.get(3)?,
            columns: columns_json.and_then(|j| serde_json::from_str(&j).ok()).unwrap_or_default(),
            referenced_table: row.get(5)?,
            referenced_columns: referenced_columns_json.and_then(|j| serde_json::from_str(&j).ok()),
            check_expression: row.get(7)?,
            deferrable: row.get(8)?,
            initially_deferred: row.get(9)?,
        };

        Ok(Constraint::from(raw))
    }

    fn schema_of(&self, item: &Self::Item) -> &str {
        &item.schema
    }
}
