//! Record against record.
//!
//! Width subtyping: the source may declare more fields than the target, but
//! every field the target declares must exist in the source with a
//! compatible type.

use crate::diagnostics::{SubtypeFailureReason, SubtypeTracer};
use crate::subtype::SubtypeChecker;
use crate::types::RecordDef;

impl SubtypeChecker {
    pub(crate) fn check_record_pair<T: SubtypeTracer>(
        &mut self,
        first: &RecordDef,
        second: &RecordDef,
        tracer: &mut T,
    ) -> bool {
        // A partial source may omit any field a total target requires.
        if second.is_total() && !first.is_total() && !second.fields().is_empty() {
            return tracer.on_mismatch(|| SubtypeFailureReason::PartialRecord {
                first_record: first.name().to_owned(),
                second_record: second.name().to_owned(),
            });
        }

        for (field, expected) in second.fields() {
            let Some(declared) = first.field(field) else {
                return tracer.on_mismatch(|| SubtypeFailureReason::MissingField {
                    field: field.clone(),
                    record: second.name().to_owned(),
                });
            };
            if !self.is_subtype(declared, expected) {
                return tracer.on_mismatch(|| SubtypeFailureReason::FieldTypeMismatch {
                    field: field.clone(),
                    first_type: declared.clone(),
                    second_type: expected.clone(),
                    nested: self.nested_reason(declared, expected),
                });
            }
        }
        true
    }
}
