//! Built-in container targets: `List`, `Set`, `Tuple` and `Dict`.
//!
//! The source must be rooted at the container (or a subclass of it) before
//! its type arguments are looked at. Elements are covariant.

use crate::diagnostics::{SubtypeFailureReason, SubtypeTracer};
use crate::nominal::Nominal;
use crate::subtype::SubtypeChecker;
use crate::types::{Container, Descriptor};
use std::borrow::Cow;

/// Reserved names of unbound mapping parameters.
const KEY_PLACEHOLDER: &str = "KT";
const VALUE_PLACEHOLDER: &str = "VT";

impl SubtypeChecker {
    fn require_container_origin<T: SubtypeTracer>(
        &mut self,
        first: &Descriptor,
        second: &Descriptor,
        container: Container,
        tracer: &mut T,
    ) -> bool {
        let target = Nominal::Builtin(container.builtin());
        match first.nominal_origin() {
            Some(origin) if origin.is_subclass_of(&target) => true,
            _ => tracer.on_mismatch(|| SubtypeFailureReason::OriginMismatch {
                first: first.clone(),
                second: second.clone(),
            }),
        }
    }

    /// `List[...]` and `Set[...]` targets.
    ///
    /// Unconstrained arguments on either side match. Otherwise each source
    /// argument must fit some target argument; order is not significant.
    pub(crate) fn check_sequence<T: SubtypeTracer>(
        &mut self,
        first: &Descriptor,
        second: &Descriptor,
        container: Container,
        args: &[Descriptor],
        tracer: &mut T,
    ) -> bool {
        if !self.require_container_origin(first, second, container, tracer) {
            return false;
        }
        let source_args = first.type_args();
        if source_args.is_empty() || args.is_empty() || source_args == args {
            return true;
        }
        // `List[T]` passes any element type through.
        if matches!(args, [only] if only.as_type_var().is_some()) {
            return true;
        }
        for element in source_args {
            if !args.iter().any(|target| self.is_subtype(element, target)) {
                return tracer.on_mismatch(|| SubtypeFailureReason::ElementMismatch {
                    element: element.clone(),
                    second: second.clone(),
                    nested: match args {
                        [only] => self.nested_reason(element, only),
                        _ => None,
                    },
                });
            }
        }
        true
    }

    /// `Tuple[...]` targets.
    ///
    /// A single target argument describes a homogeneous tuple of any length;
    /// several arguments describe a fixed-length tuple compared by position.
    pub(crate) fn check_tuple<T: SubtypeTracer>(
        &mut self,
        first: &Descriptor,
        second: &Descriptor,
        args: &[Descriptor],
        tracer: &mut T,
    ) -> bool {
        if !self.require_container_origin(first, second, Container::Tuple, tracer) {
            return false;
        }
        let source_args = first.type_args();
        if source_args == args || args.is_empty() {
            return true;
        }
        if source_args.is_empty() || (args.len() > 1 && source_args.len() != args.len()) {
            return tracer.on_mismatch(|| SubtypeFailureReason::TupleLengthMismatch {
                first_len: source_args.len(),
                second_len: args.len(),
            });
        }
        for (index, element) in source_args.iter().enumerate() {
            let target = match args {
                [only] => only,
                _ => &args[index],
            };
            if !self.is_subtype(element, target) {
                return tracer.on_mismatch(|| SubtypeFailureReason::TupleElementMismatch {
                    index,
                    first_element: element.clone(),
                    second_element: target.clone(),
                    nested: self.nested_reason(element, target),
                });
            }
        }
        true
    }

    /// `Dict[K, V]` targets. Missing arguments and the `KT`/`VT`
    /// placeholders stand for `Any`.
    pub(crate) fn check_mapping<T: SubtypeTracer>(
        &mut self,
        first: &Descriptor,
        second: &Descriptor,
        args: &[Descriptor],
        tracer: &mut T,
    ) -> bool {
        if !self.require_container_origin(first, second, Container::Dict, tracer) {
            return false;
        }
        let (first_key, first_value) = mapping_parts(first.type_args());
        let (second_key, second_value) = mapping_parts(args);

        if !self.is_subtype(&first_key, &second_key) {
            return tracer.on_mismatch(|| SubtypeFailureReason::KeyMismatch {
                first_key: first_key.clone().into_owned(),
                second_key: second_key.clone().into_owned(),
                nested: self.nested_reason(&first_key, &second_key),
            });
        }
        if !self.is_subtype(&first_value, &second_value) {
            return tracer.on_mismatch(|| SubtypeFailureReason::ValueMismatch {
                first_value: first_value.clone().into_owned(),
                second_value: second_value.clone().into_owned(),
                nested: self.nested_reason(&first_value, &second_value),
            });
        }
        true
    }
}

fn mapping_parts(args: &[Descriptor]) -> (Cow<'_, Descriptor>, Cow<'_, Descriptor>) {
    match args {
        [key, value] => (
            unbind(key, KEY_PLACEHOLDER),
            unbind(value, VALUE_PLACEHOLDER),
        ),
        _ => (
            Cow::Owned(Descriptor::Wildcard),
            Cow::Owned(Descriptor::Wildcard),
        ),
    }
}

fn unbind<'a>(arg: &'a Descriptor, placeholder: &str) -> Cow<'a, Descriptor> {
    if arg.as_type_var() == Some(placeholder) {
        Cow::Owned(Descriptor::Wildcard)
    } else {
        Cow::Borrowed(arg)
    }
}
