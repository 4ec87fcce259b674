//! Value-vs-descriptor conformance.
//!
//! [`ValueChecker`] walks a runtime [`Value`] and a [`Descriptor`] together
//! and reports the first place they disagree as a [`Mismatch`]. Callable
//! signatures are compared with the subtype engine; everything else is
//! decided from the value's nominal type and its contents.

use crate::diagnostics::Mismatch;
use crate::nominal::{Builtin, Nominal};
use crate::normalize::normalize_absence;
use crate::options::{CheckOptions, RecordMode};
use crate::recursion::DepthCounter;
use crate::subtype::SubtypeChecker;
use crate::types::{Capability, Container, Descriptor, RecordDef, Signature};
use crate::value::Value;
use tracing::{debug, trace};

/// Outcome of a value check.
pub type CheckResult = Result<(), Mismatch>;

/// Checks runtime values against descriptors.
#[derive(Debug)]
pub struct ValueChecker {
    options: CheckOptions,
    depth: DepthCounter,
    subtype: SubtypeChecker,
}

impl Default for ValueChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueChecker {
    pub fn new() -> Self {
        Self::with_options(CheckOptions::default())
    }

    pub fn with_options(options: CheckOptions) -> Self {
        Self {
            options,
            depth: DepthCounter::with_profile(options.value_profile),
            subtype: SubtypeChecker::with_options(&options),
        }
    }

    pub fn options(&self) -> &CheckOptions {
        &self.options
    }

    /// Check `value` against `descriptor`.
    pub fn check(&mut self, value: &Value, descriptor: &Descriptor) -> CheckResult {
        if self.depth.depth() == 0 {
            self.depth.reset();
        }
        self.check_value(value, descriptor)
    }

    fn check_value(&mut self, value: &Value, descriptor: &Descriptor) -> CheckResult {
        if !self.depth.enter() {
            let limit = self.depth.max_depth();
            debug!(limit, %descriptor, "value depth limit reached, failing closed");
            return Err(Mismatch::DepthExceeded { limit });
        }
        let result = self.dispatch(value, descriptor);
        self.depth.leave();
        trace!(%value, %descriptor, ok = result.is_ok(), "check_type");
        result
    }

    fn dispatch(&mut self, value: &Value, descriptor: &Descriptor) -> CheckResult {
        let descriptor = normalize_absence(descriptor);
        let descriptor = descriptor.as_ref();
        match descriptor {
            Descriptor::Absent => check_nominal(value, descriptor, &Nominal::NONE),
            Descriptor::Primitive(nominal) => check_nominal(value, descriptor, nominal),
            Descriptor::Wildcard | Descriptor::TypeVar(_) => Ok(()),
            Descriptor::Union(members) => self.check_union(value, members),
            Descriptor::Parametric { origin, args } => {
                self.check_container(value, descriptor, *origin, args)
            }
            Descriptor::Callable(signature) => self.check_callable(value, signature.as_ref()),
            Descriptor::Protocol { capability, .. } => check_capability(value, *capability),
            Descriptor::Generic { origin, .. } => check_nominal(value, descriptor, origin),
            Descriptor::Record(def) => self.check_record(value, descriptor, def),
        }
    }

    /// First matching member wins.
    fn check_union(&mut self, value: &Value, members: &[Descriptor]) -> CheckResult {
        for member in members {
            if self.check_value(value, member).is_ok() {
                return Ok(());
            }
        }
        Err(Mismatch::NoUnionMember {
            value: value.to_label(),
            members: members.to_vec(),
        })
    }

    fn check_container(
        &mut self,
        value: &Value,
        descriptor: &Descriptor,
        origin: Container,
        args: &[Descriptor],
    ) -> CheckResult {
        check_nominal(value, descriptor, &Nominal::Builtin(origin.builtin()))?;
        if args.is_empty() {
            return Ok(());
        }
        // Instances of user subclasses keep their contents opaque.
        match (origin, value) {
            (Container::List, Value::List(items)) | (Container::Set, Value::Set(items)) => {
                self.check_elements(items, &args[0])
            }
            (Container::Tuple, Value::Tuple(items)) => {
                if let [only] = args {
                    return self.check_elements(items, only);
                }
                if args.len() != items.len() {
                    return Err(Mismatch::Length {
                        value: value.to_label(),
                        expected: descriptor.clone(),
                        expected_len: args.len(),
                        actual_len: items.len(),
                    });
                }
                for (item, expected) in items.iter().zip(args) {
                    self.check_value(item, expected)?;
                }
                Ok(())
            }
            (Container::Dict, Value::Dict(entries)) => {
                let wildcard = Descriptor::Wildcard;
                let (key_type, value_type) = match args {
                    [k, v] => (k, v),
                    _ => (&wildcard, &wildcard),
                };
                for (key, item) in entries {
                    self.check_value(key, key_type)
                        .map_err(|reason| Mismatch::Key {
                            key: key.to_label(),
                            reason: Box::new(reason),
                        })?;
                    self.check_value(item, value_type)
                        .map_err(|reason| Mismatch::KeyValue {
                            key: key.to_label(),
                            reason: Box::new(reason),
                        })?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn check_elements(&mut self, items: &[Value], element: &Descriptor) -> CheckResult {
        items
            .iter()
            .try_for_each(|item| self.check_value(item, element))
    }

    /// The value must be invocable. When both sides declare a signature,
    /// annotated parameters and the return are compared with the subtype
    /// engine; unannotated ones are not checked. Arity only matters once the
    /// function annotates at least one parameter.
    fn check_callable(&mut self, value: &Value, signature: Option<&Signature>) -> CheckResult {
        if !value.is_invocable() {
            return Err(Mismatch::NotCallable {
                value: value.to_label(),
            });
        }
        let (Some(signature), Some(function)) = (signature, value.as_invocable()) else {
            return Ok(());
        };

        let params = function.declared_params();
        let annotated = params.iter().any(|param| param.annotation.is_some());
        if annotated && params.len() != signature.params.len() {
            return Err(Mismatch::ArgumentCount {
                name: function.name().to_owned(),
                expected: signature.params.len(),
                actual: params.len(),
            });
        }
        for (param, expected) in params.iter().zip(&signature.params) {
            let Some(declared) = &param.annotation else {
                continue;
            };
            if !self.subtype.is_subtype(declared, expected) {
                return Err(Mismatch::Parameter {
                    param: param.name.clone(),
                    declared: declared.clone(),
                    expected: expected.clone(),
                });
            }
        }
        if let Some(declared) = function.declared_return() {
            if !self.subtype.is_subtype(declared, &signature.ret) {
                return Err(Mismatch::Return {
                    declared: declared.clone(),
                    expected: (*signature.ret).clone(),
                });
            }
        }
        Ok(())
    }

    fn check_record(
        &mut self,
        value: &Value,
        descriptor: &Descriptor,
        def: &RecordDef,
    ) -> CheckResult {
        check_nominal(value, descriptor, &Nominal::Builtin(Builtin::Dict))?;
        if self.options.record_mode == RecordMode::Nominal {
            return Ok(());
        }
        let Value::Dict(entries) = value else {
            return Ok(());
        };

        for (key, item) in entries {
            let Value::Str(name) = key else {
                return Err(Mismatch::Key {
                    key: key.to_label(),
                    reason: Box::new(Mismatch::Type {
                        value: key.to_label(),
                        expected: Descriptor::str(),
                        actual: key.nominal(),
                    }),
                });
            };
            match def.field(name) {
                Some(expected) => {
                    self.check_value(item, expected)
                        .map_err(|reason| Mismatch::KeyValue {
                            key: name.clone(),
                            reason: Box::new(reason),
                        })?;
                }
                None if self.options.allow_extra_keys => {}
                None => {
                    return Err(Mismatch::UnexpectedKey {
                        key: name.clone(),
                        record: def.name().to_owned(),
                    });
                }
            }
        }

        if def.is_total() {
            let missing = def.fields().keys().find(|field| {
                !entries
                    .iter()
                    .any(|(key, _)| matches!(key, Value::Str(name) if name == *field))
            });
            if let Some(field) = missing {
                return Err(Mismatch::MissingKey {
                    key: field.clone(),
                    record: def.name().to_owned(),
                });
            }
        }
        Ok(())
    }
}

fn check_nominal(value: &Value, descriptor: &Descriptor, expected: &Nominal) -> CheckResult {
    let actual = value.nominal();
    if actual.is_subclass_of(expected) {
        return Ok(());
    }
    Err(Mismatch::Type {
        value: value.to_label(),
        expected: descriptor.clone(),
        actual,
    })
}

fn check_capability(value: &Value, capability: Capability) -> CheckResult {
    if value.supports(capability) {
        return Ok(());
    }
    if capability == Capability::Coroutine {
        return Err(Mismatch::NotCoroutine {
            value: value.to_label(),
        });
    }
    Err(Mismatch::Capability {
        capability,
        method: capability.method(),
        value: value.to_label(),
    })
}

#[cfg(test)]
#[path = "../tests/checker_tests.rs"]
mod tests;
