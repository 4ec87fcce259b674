//! `Callable` targets.
//!
//! Parameters are compared position by position in the same direction as
//! the overall check, not contravariantly. This is structural descriptor
//! compatibility, not textbook function subtyping.

use crate::diagnostics::{SubtypeFailureReason, SubtypeTracer};
use crate::nominal::Capabilities;
use crate::subtype::SubtypeChecker;
use crate::types::{Descriptor, Signature};

impl SubtypeChecker {
    pub(crate) fn check_callable<T: SubtypeTracer>(
        &mut self,
        first: &Descriptor,
        second: &Descriptor,
        signature: Option<&Signature>,
        tracer: &mut T,
    ) -> bool {
        match first {
            Descriptor::Primitive(nominal) => {
                nominal.supports(Capabilities::CALLABLE)
                    || tracer.on_mismatch(|| SubtypeFailureReason::TypeMismatch {
                        first: first.clone(),
                        second: second.clone(),
                    })
            }
            Descriptor::Callable(source) => match (source, signature) {
                (_, None) => true,
                (None, Some(_)) => {
                    tracer.on_mismatch(|| SubtypeFailureReason::UnconstrainedCallable {
                        second: second.clone(),
                    })
                }
                (Some(source), Some(target)) => self.check_signature(source, target, tracer),
            },
            Descriptor::Generic { origin, .. }
                if signature.is_none() && origin.supports(Capabilities::CALLABLE) =>
            {
                true
            }
            _ => tracer.on_mismatch(|| SubtypeFailureReason::TypeMismatch {
                first: first.clone(),
                second: second.clone(),
            }),
        }
    }

    fn check_signature<T: SubtypeTracer>(
        &mut self,
        source: &Signature,
        target: &Signature,
        tracer: &mut T,
    ) -> bool {
        if source.params.len() != target.params.len() {
            return tracer.on_mismatch(|| SubtypeFailureReason::ParameterCountMismatch {
                first_count: source.params.len(),
                second_count: target.params.len(),
            });
        }
        for (index, (first_param, second_param)) in
            source.params.iter().zip(&target.params).enumerate()
        {
            if !self.is_subtype(first_param, second_param) {
                return tracer.on_mismatch(|| SubtypeFailureReason::ParameterMismatch {
                    index,
                    first_param: first_param.clone(),
                    second_param: second_param.clone(),
                    nested: self.nested_reason(first_param, second_param),
                });
            }
        }
        if !self.is_subtype(&source.ret, &target.ret) {
            return tracer.on_mismatch(|| SubtypeFailureReason::ReturnMismatch {
                first_return: (*source.ret).clone(),
                second_return: (*target.ret).clone(),
                nested: self.nested_reason(&source.ret, &target.ret),
            });
        }
        true
    }
}
