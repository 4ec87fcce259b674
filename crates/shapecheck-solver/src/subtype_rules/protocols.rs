//! Capability-marker targets.
//!
//! Plain markers (`Sized`, `Hashable`, `Iterable`, `Reversible`,
//! `Container`) are decided by the capabilities of the source's nominal
//! root, then by its element arguments. Parametric effects (`Coroutine`,
//! `Generator`, `AsyncGenerator`) only relate to the same effect.

use crate::diagnostics::{SubtypeFailureReason, SubtypeTracer};
use crate::subtype::SubtypeChecker;
use crate::types::{Capability, Container, Descriptor};

impl SubtypeChecker {
    pub(crate) fn check_protocol<T: SubtypeTracer>(
        &mut self,
        first: &Descriptor,
        second: &Descriptor,
        capability: Capability,
        args: &[Descriptor],
        tracer: &mut T,
    ) -> bool {
        let supported = match first {
            // A bare nominal type only needs the capability.
            Descriptor::Primitive(nominal) => {
                return nominal.supports(capability.required())
                    || tracer.on_mismatch(|| SubtypeFailureReason::CapabilityMissing {
                        first: first.clone(),
                        capability,
                    });
            }
            Descriptor::Parametric { .. } | Descriptor::Generic { .. } => first
                .nominal_origin()
                .is_some_and(|origin| origin.supports(capability.required())),
            Descriptor::Protocol {
                capability: source, ..
            } => source.implies(capability),
            _ => false,
        };
        if !supported {
            return tracer.on_mismatch(|| SubtypeFailureReason::CapabilityMissing {
                first: first.clone(),
                capability,
            });
        }

        let Some(target) = args.first() else {
            return true;
        };
        if target.as_type_var().is_some() {
            return true;
        }
        for element in element_args(first) {
            if !self.is_subtype(element, target) {
                return tracer.on_mismatch(|| SubtypeFailureReason::ElementMismatch {
                    element: element.clone(),
                    second: second.clone(),
                    nested: self.nested_reason(element, target),
                });
            }
        }
        true
    }

    pub(crate) fn check_effect<T: SubtypeTracer>(
        &mut self,
        first: &Descriptor,
        second: &Descriptor,
        capability: Capability,
        args: &[Descriptor],
        tracer: &mut T,
    ) -> bool {
        let source_args = match first {
            Descriptor::Primitive(nominal) => {
                return nominal.supports(capability.required())
                    || tracer.on_mismatch(|| SubtypeFailureReason::CapabilityMissing {
                        first: first.clone(),
                        capability,
                    });
            }
            Descriptor::Protocol {
                capability: source,
                args: source_args,
            } if *source == capability => source_args,
            _ => {
                return tracer.on_mismatch(|| SubtypeFailureReason::TypeMismatch {
                    first: first.clone(),
                    second: second.clone(),
                });
            }
        };

        let params = capability.effect_params().unwrap_or(&[]);
        if args.is_empty() || is_canonical(args, params) {
            return true;
        }
        for (index, target) in args.iter().take(params.len()).enumerate() {
            let Some(element) = source_args.get(index) else {
                return tracer.on_mismatch(|| SubtypeFailureReason::TypeArgumentCountMismatch {
                    first: first.clone(),
                    second: second.clone(),
                    first_count: source_args.len(),
                    second_count: args.len(),
                });
            };
            if !self.is_subtype(element, target) {
                return tracer.on_mismatch(|| SubtypeFailureReason::TypeArgumentMismatch {
                    index,
                    first_arg: element.clone(),
                    second_arg: target.clone(),
                    nested: self.nested_reason(element, target),
                });
            }
        }
        true
    }
}

/// Whether every argument is the reserved type variable for its position.
fn is_canonical(args: &[Descriptor], params: &[&str]) -> bool {
    args.len() == params.len()
        && args
            .iter()
            .zip(params)
            .all(|(arg, param)| arg.as_type_var() == Some(*param))
}

/// Element types produced when iterating a descriptor.
fn element_args(descriptor: &Descriptor) -> &[Descriptor] {
    match descriptor {
        Descriptor::Parametric {
            origin: Container::Dict,
            args,
        } => args.get(..1).unwrap_or(&[]),
        Descriptor::Parametric { args, .. } | Descriptor::Generic { args, .. } => args,
        Descriptor::Protocol { args, .. } => args.get(..1).unwrap_or(&[]),
        _ => &[],
    }
}
