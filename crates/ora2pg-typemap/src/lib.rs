//! `TypeMapper` (spec §4.6): pure functions translating Oracle type,
//! identifier, and default-expression artifacts to PostgreSQL equivalents.
//! No I/O, no external crates — every mapping is total: unhandled inputs
//! produce a typed `Unmapped*` value rather than an error, since a caller
//! (a Creator) treats a missing mapping as a warning, not a failure.

mod column;
mod default_expr;
mod identifier;
mod reserved_words;

pub use column::{map_column_type, CharSemantics, ColumnTypeInput, MappedType, Unmapped};
pub use default_expr::{map_default_expression, MappedDefault, UnmappedDefault};
pub use identifier::map_identifier;
