//! Error explanation API for subtype checking.
//!
//! This is the slow path: it re-runs the same rules with a
//! [`DiagnosticTracer`] to produce a structured [`SubtypeFailureReason`].
//! Callers run it only after [`SubtypeChecker::is_subtype`] returned `false`.

use crate::diagnostics::{DiagnosticTracer, SubtypeFailureReason};
use crate::subtype::SubtypeChecker;
use crate::types::Descriptor;

impl SubtypeChecker {
    /// Explain why `first` is not a subtype of `second`.
    ///
    /// Returns `None` if the descriptors are actually related.
    pub fn explain_failure(
        &mut self,
        first: &Descriptor,
        second: &Descriptor,
    ) -> Option<SubtypeFailureReason> {
        if self.depth_is_idle() {
            self.reset_depth();
        }
        let mut tracer = DiagnosticTracer::new();
        if self.check(first, second, &mut tracer) {
            return None;
        }
        tracer.take_failure()
    }
}

/// Explain a failed subtype check with default options.
pub fn explain_subtype_failure(
    first: &Descriptor,
    second: &Descriptor,
) -> Option<SubtypeFailureReason> {
    SubtypeChecker::new().explain_failure(first, second)
}

#[cfg(test)]
#[path = "../tests/subtype_explain_tests.rs"]
mod tests;
