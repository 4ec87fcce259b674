//! shapecheck
//!
//! Structural type-compatibility checking for a small, dynamically typed
//! value model:
//!
//! - [`check_type`] / [`is_type`] decide whether a runtime [`Value`]
//!   conforms to a [`Descriptor`], reporting the first disagreement.
//! - [`is_subtype`] decides whether one descriptor is a structural subtype
//!   of another. [`explain_subtype_failure`] says why it is not.
//! - [`RecordSchema`] declares records whose constructor checks every
//!   argument before an instance exists.
//!
//! The engines live in `shapecheck-solver`, records in `shapecheck-record`.
//! This crate re-exports both and adds [`tracing_config`].

pub mod tracing_config;

pub use shapecheck_record::{ConstructError, RecordInstance, RecordSchema, RecordSchemaBuilder};
pub use shapecheck_solver::{
    Builtin, Capabilities, Capability, CheckOptions, CheckResult, ClassBuilder, ClassRef,
    Container, Descriptor, DiagnosticTracer, FastTracer, FunctionValue, Instance, Invocable,
    MalformedDescriptor, Mismatch, Nominal, ParamInfo, RecordDef, RecordMode, RecursionProfile,
    Signature, SubtypeChecker, SubtypeFailureReason, SubtypeTracer, Totality, Value, ValueChecker,
    check_type, check_type_pair, check_type_with, explain_subtype_failure, is_subtype,
    is_subtype_with, is_type, normalize_absence, record_to_mapping, try_check_type,
    try_is_subtype,
};

/// Full access to the solver crate, for callers that need its submodules.
pub use shapecheck_solver as solver;
