//! Structural subtype checking between descriptors.
//!
//! `first <: second` holds when every value described by `first` is also
//! described by `second`. The decision procedure runs in a fixed priority
//! order:
//!
//! 1. bare absence is rewritten to `NoneType` on both sides;
//! 2. a typed record compared with a non-record becomes `Dict[str, Union[...]]`;
//! 3. two primitives compare by subclassing;
//! 4. if either side is `Any`, the result is whether `second` is `Any`;
//! 5. type variables only match type variables of the same name;
//! 6. a bare nominal type and a parametrized one compare by their origins;
//! 7. a union on the left requires every member to be a subtype;
//! 8. two records compare field by field;
//! 9. otherwise the shape of `second` picks the rule (see `subtype_rules`).
//!
//! Recursion is bounded by a [`DepthCounter`]; hitting the limit fails closed.

use crate::diagnostics::{FastTracer, SubtypeFailureReason, SubtypeTracer};
use crate::normalize::{align_records, normalize_absence};
use crate::options::CheckOptions;
use crate::recursion::{DepthCounter, RecursionProfile};
use crate::types::{Container, Descriptor};
use tracing::{debug, trace};

/// Decides structural subtyping between descriptors.
///
/// A checker holds only its depth counter, so one instance may be reused for
/// any number of checks; every top-level call starts from depth 0.
#[derive(Debug)]
pub struct SubtypeChecker {
    depth: DepthCounter,
}

impl Default for SubtypeChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl SubtypeChecker {
    pub fn new() -> Self {
        Self::with_profile(RecursionProfile::SubtypeCheck)
    }

    pub fn with_profile(profile: RecursionProfile) -> Self {
        Self {
            depth: DepthCounter::with_profile(profile),
        }
    }

    pub fn with_options(options: &CheckOptions) -> Self {
        Self::with_profile(options.subtype_profile)
    }

    /// Whether the depth limit tripped since the last top-level check.
    pub fn depth_exceeded(&self) -> bool {
        self.depth.is_exceeded()
    }

    /// Is `first` a subtype of `second`?
    pub fn is_subtype(&mut self, first: &Descriptor, second: &Descriptor) -> bool {
        if self.depth_is_idle() {
            self.reset_depth();
        }
        self.check(first, second, &mut FastTracer)
    }

    /// True outside of any relation step, i.e. at the start of a top-level call.
    pub(crate) fn depth_is_idle(&self) -> bool {
        self.depth.depth() == 0
    }

    pub(crate) fn reset_depth(&mut self) {
        self.depth.reset();
    }

    /// Run one relation step under the depth guard.
    pub(crate) fn check<T: SubtypeTracer>(
        &mut self,
        first: &Descriptor,
        second: &Descriptor,
        tracer: &mut T,
    ) -> bool {
        if !self.depth.enter() {
            let limit = self.depth.max_depth();
            debug!(limit, %first, %second, "subtype depth limit reached, failing closed");
            return tracer.on_mismatch(|| SubtypeFailureReason::RecursionLimitExceeded { limit });
        }
        let related = self.check_normalized(first, second, tracer);
        self.depth.leave();
        trace!(%first, %second, related, "subtype");
        related
    }

    fn check_normalized<T: SubtypeTracer>(
        &mut self,
        first: &Descriptor,
        second: &Descriptor,
        tracer: &mut T,
    ) -> bool {
        let (first, second) = align_records(normalize_absence(first), normalize_absence(second));
        let (first, second) = (first.as_ref(), second.as_ref());

        if let (Descriptor::Primitive(a), Descriptor::Primitive(b)) = (first, second) {
            return a.is_subclass_of(b)
                || tracer.on_mismatch(|| SubtypeFailureReason::NominalMismatch {
                    first: a.clone(),
                    second: b.clone(),
                });
        }

        if first.is_wildcard() || second.is_wildcard() {
            return second.is_wildcard()
                || tracer.on_mismatch(|| SubtypeFailureReason::WildcardSource {
                    second: second.clone(),
                });
        }

        if first.as_type_var().is_some() || second.as_type_var().is_some() {
            return match (first.as_type_var(), second.as_type_var()) {
                (Some(a), Some(b)) if a == b => true,
                _ => tracer.on_mismatch(|| SubtypeFailureReason::TypeVarMismatch {
                    first: first.clone(),
                    second: second.clone(),
                }),
            };
        }

        if let Some(related) = self.check_nominal_shortcut(first, second, tracer) {
            return related;
        }

        if let Descriptor::Union(members) = first {
            return self.check_union_source(members, second, tracer);
        }

        if let (Descriptor::Record(a), Descriptor::Record(b)) = (first, second) {
            return self.check_record_pair(a, b, tracer);
        }

        match second {
            Descriptor::Union(members) => self.check_union_target(first, members, tracer),
            Descriptor::Parametric { origin, args } => match origin {
                Container::List | Container::Set => {
                    self.check_sequence(first, second, *origin, args, tracer)
                }
                Container::Tuple => self.check_tuple(first, second, args, tracer),
                Container::Dict => self.check_mapping(first, second, args, tracer),
            },
            Descriptor::Callable(signature) => {
                self.check_callable(first, second, signature.as_ref(), tracer)
            }
            Descriptor::Protocol { capability, args } => {
                if capability.effect_params().is_some() {
                    self.check_effect(first, second, *capability, args, tracer)
                } else {
                    self.check_protocol(first, second, *capability, args, tracer)
                }
            }
            Descriptor::Generic { origin, args } => {
                self.check_generic(first, second, origin, args, tracer)
            }
            _ => {
                first == second
                    || tracer.on_mismatch(|| SubtypeFailureReason::TypeMismatch {
                        first: first.clone(),
                        second: second.clone(),
                    })
            }
        }
    }

    /// Step 6: a bare nominal type against a rooted shape, in either direction.
    ///
    /// Returns `None` when the pair is not of that form.
    fn check_nominal_shortcut<T: SubtypeTracer>(
        &mut self,
        first: &Descriptor,
        second: &Descriptor,
        tracer: &mut T,
    ) -> Option<bool> {
        let related = match (first, second) {
            (_, Descriptor::Primitive(target)) => match first {
                Descriptor::Parametric { .. } | Descriptor::Generic { .. } => {
                    let origin = first.nominal_origin()?;
                    origin.is_subclass_of(target)
                }
                // Protocols and callables only fit under `object` nominally.
                Descriptor::Protocol { .. } | Descriptor::Callable(_) => target.is_object(),
                _ => return None,
            },
            (Descriptor::Primitive(source), _) => {
                let origin = second.nominal_origin()?;
                source.is_subclass_of(&origin)
            }
            _ => return None,
        };
        Some(
            related
                || tracer.on_mismatch(|| SubtypeFailureReason::OriginMismatch {
                    first: first.clone(),
                    second: second.clone(),
                }),
        )
    }

    /// Explanation of a nested failure, built only on the slow path.
    pub(crate) fn nested_reason(
        &mut self,
        first: &Descriptor,
        second: &Descriptor,
    ) -> Option<Box<SubtypeFailureReason>> {
        self.explain_failure(first, second).map(Box::new)
    }
}

#[cfg(test)]
#[path = "../tests/subtype_tests.rs"]
mod tests;
