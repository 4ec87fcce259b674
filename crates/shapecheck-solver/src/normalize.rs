//! Descriptor normalization.
//!
//! Both helpers build fresh descriptors and never rewrite their input, so a
//! descriptor shared between threads is never observed half-normalized.

use crate::types::{Container, Descriptor, RecordDef};
use std::borrow::Cow;

/// Rewrite bare absence to the explicit `NoneType` member.
///
/// Applies to the descriptor itself and to the members of a union; an empty
/// union (which only admits absence) becomes `NoneType` too. Returns the
/// input unchanged when there is nothing to rewrite. Idempotent.
pub fn normalize_absence(descriptor: &Descriptor) -> Cow<'_, Descriptor> {
    match descriptor {
        Descriptor::Absent => Cow::Owned(Descriptor::none()),
        Descriptor::Union(members) if members.is_empty() => Cow::Owned(Descriptor::none()),
        Descriptor::Union(members) if members.iter().any(|m| matches!(m, Descriptor::Absent)) => {
            let rewritten = members
                .iter()
                .map(|m| match m {
                    Descriptor::Absent => Descriptor::none(),
                    other => other.clone(),
                })
                .collect();
            Cow::Owned(Descriptor::Union(rewritten))
        }
        _ => Cow::Borrowed(descriptor),
    }
}

/// Flatten a typed record into `Dict[str, Union[field types...]]`.
///
/// Field types are kept in declaration order and duplicates are not removed.
/// A field whose type is itself a union contributes its members, so the
/// result stays flat. A record with no fields yields an empty union, which
/// only admits absence.
pub fn record_to_mapping(record: &RecordDef) -> Descriptor {
    let mut members = Vec::with_capacity(record.fields().len());
    for field in record.fields().values() {
        match field {
            Descriptor::Union(inner) => members.extend(inner.iter().cloned()),
            Descriptor::Absent => members.push(Descriptor::none()),
            other => members.push(other.clone()),
        }
    }
    Descriptor::Parametric {
        origin: Container::Dict,
        args: vec![Descriptor::str(), Descriptor::Union(members)],
    }
}

/// Make records comparable with open mappings.
///
/// When exactly one side is a typed record it is replaced by its mapping
/// form; two records, or two non-records, are left alone. A pair with a
/// union on either side is also left alone: the union is split first, and
/// each member is aligned on its own.
pub(crate) fn align_records<'a>(
    first: Cow<'a, Descriptor>,
    second: Cow<'a, Descriptor>,
) -> (Cow<'a, Descriptor>, Cow<'a, Descriptor>) {
    let has_union =
        matches!(&*first, Descriptor::Union(_)) || matches!(&*second, Descriptor::Union(_));
    if has_union || first.is_record() == second.is_record() {
        return (first, second);
    }
    let first = match &*first {
        Descriptor::Record(def) => Cow::Owned(record_to_mapping(def)),
        _ => first,
    };
    let second = match &*second {
        Descriptor::Record(def) => Cow::Owned(record_to_mapping(def)),
        _ => second,
    };
    (first, second)
}

#[cfg(test)]
#[path = "../tests/normalize_tests.rs"]
mod tests;
