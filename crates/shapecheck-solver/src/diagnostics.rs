//! Failure reporting for both engines.
//!
//! Three kinds of failure are kept apart:
//!
//! - [`Mismatch`]: a value does not conform to a descriptor. This is an
//!   expected outcome and is always returned as a value.
//! - [`SubtypeFailureReason`]: why one descriptor is not a subtype of another.
//!   Only built on the slow explain path.
//! - [`MalformedDescriptor`]: the descriptor itself violates the algebra. This
//!   is a bug in the calling code and is never folded into a `false`.
//!
//! ## Tracer Pattern
//!
//! The subtype rules are written once, generic over a [`SubtypeTracer`].
//! [`FastTracer`] turns every reported mismatch into a plain `false` without
//! building the reason; [`DiagnosticTracer`] keeps the first reason it sees.

use crate::nominal::{Builtin, Nominal};
use crate::types::{Capability, Descriptor};
use std::fmt::Write as _;

// =============================================================================
// Tracer Pattern
// =============================================================================

/// Receives subtype mismatches.
///
/// The reason is passed as a closure so tracers that only need the boolean
/// never pay for building it.
pub trait SubtypeTracer {
    /// Returns `true` if checking should continue, `false` to stop.
    fn on_mismatch(&mut self, reason: impl FnOnce() -> SubtypeFailureReason) -> bool;
}

/// Stops on the first mismatch without building a reason.
#[derive(Clone, Copy, Debug, Default)]
pub struct FastTracer;

impl SubtypeTracer for FastTracer {
    #[inline(always)]
    fn on_mismatch(&mut self, _reason: impl FnOnce() -> SubtypeFailureReason) -> bool {
        false
    }
}

/// Records the first mismatch reason and stops.
#[derive(Debug, Default)]
pub struct DiagnosticTracer {
    failure: Option<SubtypeFailureReason>,
}

impl DiagnosticTracer {
    pub fn new() -> Self {
        Self { failure: None }
    }

    /// Take the collected failure reason, leaving `None` in its place.
    pub fn take_failure(&mut self) -> Option<SubtypeFailureReason> {
        self.failure.take()
    }

    pub fn get_failure(&self) -> Option<&SubtypeFailureReason> {
        self.failure.as_ref()
    }

    pub fn has_failure(&self) -> bool {
        self.failure.is_some()
    }
}

impl SubtypeTracer for DiagnosticTracer {
    #[inline]
    fn on_mismatch(&mut self, reason: impl FnOnce() -> SubtypeFailureReason) -> bool {
        // Nested comparisons run with their own tracer; only the first
        // failure on this level is kept.
        if self.failure.is_none() {
            self.failure = Some(reason());
        }
        false
    }
}

// =============================================================================
// Subtype failure reasons
// =============================================================================

/// Why `first` is not a subtype of `second`.
///
/// Variants that compare nested descriptors carry the nested reason, so a
/// failure deep inside a container can be reported from the outside in.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SubtypeFailureReason {
    #[error("\"{first}\" is not a subclass of \"{second}\"")]
    NominalMismatch { first: Nominal, second: Nominal },

    #[error("\"Any\" is only a subtype of itself, not of \"{second}\"")]
    WildcardSource { second: Descriptor },

    #[error("type variable \"{first}\" is not compatible with \"{second}\"")]
    TypeVarMismatch { first: Descriptor, second: Descriptor },

    #[error("\"{first}\" matches no member of [{}]", display_list(.members))]
    NoUnionMemberMatches {
        first: Descriptor,
        members: Vec<Descriptor>,
    },

    #[error("union member \"{member}\" is not a subtype of \"{second}\"")]
    UnionMemberMismatch {
        member: Descriptor,
        second: Descriptor,
        nested: Option<Box<SubtypeFailureReason>>,
    },

    #[error("\"{first}\" is not rooted at \"{second}\"")]
    OriginMismatch { first: Descriptor, second: Descriptor },

    #[error("element type \"{element}\" is not a subtype of any argument of \"{second}\"")]
    ElementMismatch {
        element: Descriptor,
        second: Descriptor,
        nested: Option<Box<SubtypeFailureReason>>,
    },

    #[error("tuple of {first_len} items is not compatible with tuple of {second_len} items")]
    TupleLengthMismatch { first_len: usize, second_len: usize },

    #[error("tuple item {index}: \"{first_element}\" is not a subtype of \"{second_element}\"")]
    TupleElementMismatch {
        index: usize,
        first_element: Descriptor,
        second_element: Descriptor,
        nested: Option<Box<SubtypeFailureReason>>,
    },

    #[error("key type \"{first_key}\" is not a subtype of \"{second_key}\"")]
    KeyMismatch {
        first_key: Descriptor,
        second_key: Descriptor,
        nested: Option<Box<SubtypeFailureReason>>,
    },

    #[error("value type \"{first_value}\" is not a subtype of \"{second_value}\"")]
    ValueMismatch {
        first_value: Descriptor,
        second_value: Descriptor,
        nested: Option<Box<SubtypeFailureReason>>,
    },

    #[error("callable takes {first_count} parameters, expected {second_count}")]
    ParameterCountMismatch {
        first_count: usize,
        second_count: usize,
    },

    #[error("parameter {index}: \"{first_param}\" is not a subtype of \"{second_param}\"")]
    ParameterMismatch {
        index: usize,
        first_param: Descriptor,
        second_param: Descriptor,
        nested: Option<Box<SubtypeFailureReason>>,
    },

    #[error("return type \"{first_return}\" is not a subtype of \"{second_return}\"")]
    ReturnMismatch {
        first_return: Descriptor,
        second_return: Descriptor,
        nested: Option<Box<SubtypeFailureReason>>,
    },

    #[error("an unconstrained callable is not a subtype of \"{second}\"")]
    UnconstrainedCallable { second: Descriptor },

    #[error("\"{first}\" does not support {}", .capability.name())]
    CapabilityMissing {
        first: Descriptor,
        capability: Capability,
    },

    #[error("\"{first}\" takes {first_count} type arguments, \"{second}\" takes {second_count}")]
    TypeArgumentCountMismatch {
        first: Descriptor,
        second: Descriptor,
        first_count: usize,
        second_count: usize,
    },

    #[error("type argument {index}: \"{first_arg}\" is not a subtype of \"{second_arg}\"")]
    TypeArgumentMismatch {
        index: usize,
        first_arg: Descriptor,
        second_arg: Descriptor,
        nested: Option<Box<SubtypeFailureReason>>,
    },

    #[error("field \"{field}\" required by \"{record}\" is missing")]
    MissingField { field: String, record: String },

    #[error("field \"{field}\": \"{first_type}\" is not a subtype of \"{second_type}\"")]
    FieldTypeMismatch {
        field: String,
        first_type: Descriptor,
        second_type: Descriptor,
        nested: Option<Box<SubtypeFailureReason>>,
    },

    #[error("partial record \"{first_record}\" cannot stand for total record \"{second_record}\"")]
    PartialRecord {
        first_record: String,
        second_record: String,
    },

    #[error("\"{first}\" is not a subtype of \"{second}\"")]
    TypeMismatch { first: Descriptor, second: Descriptor },

    #[error("descriptor nesting exceeds {limit} levels")]
    RecursionLimitExceeded { limit: u32 },
}

impl SubtypeFailureReason {
    /// The directly nested reason, if the variant carries one.
    pub fn nested(&self) -> Option<&SubtypeFailureReason> {
        match self {
            Self::UnionMemberMismatch { nested, .. }
            | Self::ElementMismatch { nested, .. }
            | Self::TupleElementMismatch { nested, .. }
            | Self::KeyMismatch { nested, .. }
            | Self::ValueMismatch { nested, .. }
            | Self::ParameterMismatch { nested, .. }
            | Self::ReturnMismatch { nested, .. }
            | Self::TypeArgumentMismatch { nested, .. }
            | Self::FieldTypeMismatch { nested, .. } => nested.as_deref(),
            _ => None,
        }
    }

    /// The most specific reason in the chain.
    pub fn innermost(&self) -> &SubtypeFailureReason {
        let mut current = self;
        while let Some(next) = current.nested() {
            current = next;
        }
        current
    }

    /// Render the whole chain, outermost first, one reason per line.
    pub fn render_chain(&self) -> String {
        let mut out = self.to_string();
        let mut current = self.nested();
        let mut indent = 1;
        while let Some(reason) = current {
            let _ = write!(out, "\n{:width$}{reason}", "", width = indent * 2);
            current = reason.nested();
            indent += 1;
        }
        out
    }
}

// =============================================================================
// Value mismatches
// =============================================================================

/// A value that does not conform to a descriptor.
///
/// Messages follow the wording users of dynamic runtime checkers expect,
/// e.g. `for "1" expected type "str", got "int"`.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Mismatch {
    #[error("for \"{value}\" expected type \"{expected}\", got \"{actual}\"")]
    Type {
        value: String,
        expected: Descriptor,
        actual: Nominal,
    },

    #[error("expected value any type of [{}], got \"{value}\"", display_list(.members))]
    NoUnionMember {
        value: String,
        members: Vec<Descriptor>,
    },

    #[error(
        "expected \"{expected}\" with {expected_len} items, got \"{value}\" with {actual_len}"
    )]
    Length {
        value: String,
        expected: Descriptor,
        expected_len: usize,
        actual_len: usize,
    },

    #[error("key \"{key}\", {reason}")]
    Key { key: String, reason: Box<Mismatch> },

    #[error("value for key \"{key}\", {reason}")]
    KeyValue { key: String, reason: Box<Mismatch> },

    #[error("key \"{key}\" required by \"{record}\" is missing")]
    MissingKey { key: String, record: String },

    #[error("key \"{key}\" is not declared by \"{record}\"")]
    UnexpectedKey { key: String, record: String },

    #[error("callable \"{name}\" takes {actual} arguments, expected {expected}")]
    ArgumentCount {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("arg \"{param}\" is type of \"{declared}\", expected {expected}")]
    Parameter {
        param: String,
        declared: Descriptor,
        expected: Descriptor,
    },

    #[error("return value is type of \"{declared}\", expected {expected}")]
    Return {
        declared: Descriptor,
        expected: Descriptor,
    },

    #[error("expected callable, got \"{value}\"")]
    NotCallable { value: String },

    #[error("expected Coroutine, got \"{value}\"")]
    NotCoroutine { value: String },

    #[error("expected obj with method \"{method}()\", got \"{value}\"")]
    Capability {
        capability: Capability,
        method: &'static str,
        value: String,
    },

    #[error("value nesting exceeds {limit} levels")]
    DepthExceeded { limit: u32 },
}

impl Mismatch {
    /// Whether this is (or wraps) a length mismatch.
    pub fn is_length(&self) -> bool {
        match self {
            Mismatch::Length { .. } => true,
            Mismatch::Key { reason, .. } | Mismatch::KeyValue { reason, .. } => reason.is_length(),
            _ => false,
        }
    }

    /// Whether this identifies an offending mapping key.
    pub fn is_key(&self) -> bool {
        matches!(
            self,
            Mismatch::Key { .. }
                | Mismatch::KeyValue { .. }
                | Mismatch::MissingKey { .. }
                | Mismatch::UnexpectedKey { .. }
        )
    }
}

// =============================================================================
// Malformed descriptors
// =============================================================================

/// A descriptor that violates the structural assumptions of the algebra.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MalformedDescriptor {
    #[error("{container} takes {expected} type arguments, got {actual}")]
    ContainerArity {
        container: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("union member \"{member}\" is itself a union")]
    NestedUnion { member: Descriptor },

    #[error("{capability} takes at most {max} type arguments, got {actual}")]
    ProtocolArity {
        capability: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("generic origin must be a user class, got builtin \"{}\"", .origin.name())]
    BuiltinGenericOrigin { origin: Builtin },
}

fn display_list(items: &[Descriptor]) -> String {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{item}");
    }
    out
}

#[cfg(test)]
#[path = "../tests/diagnostics_tests.rs"]
mod tests;
