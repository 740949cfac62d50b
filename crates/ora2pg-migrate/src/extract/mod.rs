//! Extractors (spec §4.7): one per canonical object kind, sharing the
//! `ExtractorQuery`/`ExtractorJob` scaffold except `RowCountExtractor`,
//! which has no single dictionary view to read and is a bespoke `Job`.

pub mod generic;

pub mod constraint;
pub mod function;
pub mod object_type;
pub mod row_count;
pub mod schema;
pub mod sequence;
pub mod synonym;
pub mod table;
pub mod trigger;
pub mod type_method;
pub mod view;

pub use generic::{ExtractorJob, ExtractorQuery};

pub use constraint::ConstraintExtractor;
pub use function::FunctionExtractor;
pub use object_type::ObjectTypeExtractor;
pub use row_count::RowCountExtractor;
pub use schema::SchemaExtractor;
pub use sequence::SequenceExtractor;
pub use synonym::SynonymExtractor;
pub use table::TableExtractor;
pub use trigger::TriggerExtractor;
pub use type_method::TypeMethodExtractor;
pub use view::ViewExtractor;
