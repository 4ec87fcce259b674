//! Structural Type-Compatibility Solver
//!
//! This crate decides two questions over a fixed algebra of type
//! descriptors:
//!
//! - **is-type**: does a runtime [`Value`] conform to a [`Descriptor`]?
//! - **is-subtype**: is one descriptor a structural subtype of another?
//!
//! Both engines are pure recursive walks. They keep no state between calls,
//! never rewrite their inputs, and bound their recursion with a depth
//! counter that fails closed.
//!
//! Dependency order, leaves first: `normalize` → `subtype` → `checker`.
mod checker;
mod diagnostics;
mod format;
pub mod nominal;
mod normalize;
pub mod options;
mod queries;
pub mod recursion;
mod subtype;
mod subtype_explain;
mod subtype_rules;
pub mod types;
pub mod value;

pub use checker::{CheckResult, ValueChecker};
pub use diagnostics::{
    DiagnosticTracer, FastTracer, MalformedDescriptor, Mismatch, SubtypeFailureReason,
    SubtypeTracer,
};
pub use nominal::{Builtin, Capabilities, ClassBuilder, ClassRef, Nominal};
pub use normalize::{normalize_absence, record_to_mapping};
pub use options::{CheckOptions, RecordMode};
pub use queries::{
    check_type, check_type_pair, check_type_with, is_subtype, is_subtype_with, is_type,
    try_check_type, try_is_subtype,
};
pub use recursion::{DepthCounter, RecursionProfile};
pub use subtype::SubtypeChecker;
pub use subtype_explain::explain_subtype_failure;
pub use types::{Capability, Container, Descriptor, RecordDef, Signature, Totality};
pub use value::{FunctionValue, Instance, Invocable, ParamInfo, Value};

#[cfg(test)]
#[path = "../tests/concurrency_tests.rs"]
mod concurrency_tests;
