//! Creators (spec §4.8): one per canonical object kind, sharing the
//! `DdlCreator`/`CreatorJob` scaffold except where a pre-check must gate
//! whether DDL is attempted at all (`TableCreator`, `FkIndexCreator`,
//! `SynonymReplacementViewCreator`), which are bespoke `Job`s instead.

pub mod generic;

pub mod constraint;
pub mod fk_index;
pub mod function_stub;
pub mod object_type;
pub mod schema;
pub mod sequence;
pub mod synonym_replacement_view;
pub mod table;
pub mod trigger_implementation;
pub mod type_method_implementation;
pub mod type_method_stub;
pub mod verify;
pub mod view_implementation;
pub mod view_stub;

pub use generic::{CreatorJob, DdlCreator};

pub use constraint::ConstraintCreator;
pub use fk_index::FkIndexCreator;
pub use function_stub::FunctionStubCreator;
pub use object_type::ObjectTypeCreator;
pub use schema::SchemaCreator;
pub use sequence::SequenceCreator;
pub use synonym_replacement_view::SynonymReplacementViewCreator;
pub use table::TableCreator;
pub use trigger_implementation::TriggerImplementationCreator;
pub use type_method_implementation::TypeMethodImplementationCreator;
pub use type_method_stub::TypeMethodStubCreator;
pub use verify::{TriggerVerifier, ViewVerifier};
pub use view_implementation::ViewImplementationCreator;
pub use view_stub::ViewStubCreator;
