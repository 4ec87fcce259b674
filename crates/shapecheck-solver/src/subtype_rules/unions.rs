//! Union subtype checking.
//!
//! - union source: every member must be a subtype of the target
//! - union target: the source must be a subtype of at least one member
//!
//! With both sides unions the two rules compose: each source member must
//! land in some target member.

use crate::diagnostics::{SubtypeFailureReason, SubtypeTracer};
use crate::subtype::SubtypeChecker;
use crate::types::Descriptor;

impl SubtypeChecker {
    pub(crate) fn check_union_source<T: SubtypeTracer>(
        &mut self,
        members: &[Descriptor],
        second: &Descriptor,
        tracer: &mut T,
    ) -> bool {
        for member in members {
            if !self.is_subtype(member, second) {
                return tracer.on_mismatch(|| SubtypeFailureReason::UnionMemberMismatch {
                    member: member.clone(),
                    second: second.clone(),
                    nested: self.nested_reason(member, second),
                });
            }
        }
        true
    }

    pub(crate) fn check_union_target<T: SubtypeTracer>(
        &mut self,
        first: &Descriptor,
        members: &[Descriptor],
        tracer: &mut T,
    ) -> bool {
        if members.iter().any(|member| self.is_subtype(first, member)) {
            return true;
        }
        tracer.on_mismatch(|| SubtypeFailureReason::NoUnionMemberMatches {
            first: first.clone(),
            members: members.to_vec(),
        })
    }
}
