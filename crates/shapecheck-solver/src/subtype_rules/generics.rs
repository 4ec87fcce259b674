//! User-defined generic targets.

use crate::diagnostics::{SubtypeFailureReason, SubtypeTracer};
use crate::nominal::Nominal;
use crate::subtype::SubtypeChecker;
use crate::types::Descriptor;

impl SubtypeChecker {
    /// The source origin must subclass the target origin, and both must
    /// carry the same number of arguments, compared by position.
    pub(crate) fn check_generic<T: SubtypeTracer>(
        &mut self,
        first: &Descriptor,
        second: &Descriptor,
        origin: &Nominal,
        args: &[Descriptor],
        tracer: &mut T,
    ) -> bool {
        let rooted = first
            .nominal_origin()
            .is_some_and(|source| source.is_subclass_of(origin));
        if !rooted {
            return tracer.on_mismatch(|| SubtypeFailureReason::OriginMismatch {
                first: first.clone(),
                second: second.clone(),
            });
        }

        let source_args = first.type_args();
        if source_args.len() != args.len() {
            return tracer.on_mismatch(|| SubtypeFailureReason::TypeArgumentCountMismatch {
                first: first.clone(),
                second: second.clone(),
                first_count: source_args.len(),
                second_count: args.len(),
            });
        }
        for (index, (first_arg, second_arg)) in source_args.iter().zip(args).enumerate() {
            if !self.is_subtype(first_arg, second_arg) {
                return tracer.on_mismatch(|| SubtypeFailureReason::TypeArgumentMismatch {
                    index,
                    first_arg: first_arg.clone(),
                    second_arg: second_arg.clone(),
                    nested: self.nested_reason(first_arg, second_arg),
                });
            }
        }
        true
    }
}
