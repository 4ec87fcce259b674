//! Declarative records for shapecheck.
//!
//! A [`RecordSchema`] declares named fields with type descriptors. Building
//! an instance checks every supplied argument with the value checker and
//! refuses the construction on the first disagreement:
//! - strict schemas (the default) require every declared field
//! - non-strict schemas leave omitted fields unbound
//! - arguments the schema does not declare are rejected
//!
//! Schemas may extend other schemas. Fields are merged root-first, so a
//! derived schema can narrow a field it inherits.

// Construction failures
mod error;
pub use error::ConstructError;

// Schema declaration and construction
mod schema;
pub use schema::{RecordSchema, RecordSchemaBuilder};

// Constructed instances
mod instance;
pub use instance::RecordInstance;
