//! Entry points.
//!
//! Each call builds a fresh engine, so calls share no state and repeated
//! calls on the same inputs give the same answer.

use crate::checker::{CheckResult, ValueChecker};
use crate::diagnostics::MalformedDescriptor;
use crate::options::CheckOptions;
use crate::subtype::SubtypeChecker;
use crate::types::Descriptor;
use crate::value::Value;

/// Is `first` a structural subtype of `second`?
pub fn is_subtype(first: &Descriptor, second: &Descriptor) -> bool {
    SubtypeChecker::new().is_subtype(first, second)
}

pub fn is_subtype_with(first: &Descriptor, second: &Descriptor, options: &CheckOptions) -> bool {
    SubtypeChecker::with_options(options).is_subtype(first, second)
}

/// Like [`is_subtype`], but rejects malformed descriptors instead of
/// answering for them.
pub fn try_is_subtype(
    first: &Descriptor,
    second: &Descriptor,
) -> Result<bool, MalformedDescriptor> {
    first.validate()?;
    second.validate()?;
    Ok(is_subtype(first, second))
}

/// Check `value` against `descriptor`, reporting the first disagreement.
pub fn check_type(value: &Value, descriptor: &Descriptor) -> CheckResult {
    ValueChecker::new().check(value, descriptor)
}

pub fn check_type_with(value: &Value, descriptor: &Descriptor, options: &CheckOptions) -> CheckResult {
    ValueChecker::with_options(*options).check(value, descriptor)
}

/// Like [`check_type`], but validates the descriptor first.
pub fn try_check_type(
    value: &Value,
    descriptor: &Descriptor,
) -> Result<CheckResult, MalformedDescriptor> {
    descriptor.validate()?;
    Ok(check_type(value, descriptor))
}

pub fn is_type(value: &Value, descriptor: &Descriptor) -> bool {
    check_type(value, descriptor).is_ok()
}

/// `(ok, message)` form of [`check_type`], for callers that surface the
/// message directly as user feedback.
pub fn check_type_pair(value: &Value, descriptor: &Descriptor) -> (bool, Option<String>) {
    match check_type(value, descriptor) {
        Ok(()) => (true, None),
        Err(mismatch) => (false, Some(mismatch.to_string())),
    }
}

#[cfg(test)]
#[path = "../tests/queries_tests.rs"]
mod tests;
