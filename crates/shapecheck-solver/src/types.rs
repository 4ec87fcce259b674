//! The type descriptor algebra.
//!
//! A [`Descriptor`] is a recursive, tagged description of a type shape. The
//! set of shapes is closed: engines dispatch on the tag with `match` and
//! there is no registration of new shapes at runtime.

use crate::diagnostics::MalformedDescriptor;
use crate::nominal::{Builtin, Capabilities, ClassRef, Nominal};
use indexmap::IndexMap;
use smallvec::SmallVec;
use std::sync::Arc;

/// Built-in parametric containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Container {
    List,
    Tuple,
    Set,
    Dict,
}

impl Container {
    pub const fn builtin(self) -> Builtin {
        match self {
            Container::List => Builtin::List,
            Container::Tuple => Builtin::Tuple,
            Container::Set => Builtin::Set,
            Container::Dict => Builtin::Dict,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Container::List => "List",
            Container::Tuple => "Tuple",
            Container::Set => "Set",
            Container::Dict => "Dict",
        }
    }

    /// Number of type arguments when constrained; `None` for variadic tuples.
    pub const fn arity(self) -> Option<usize> {
        match self {
            Container::List | Container::Set => Some(1),
            Container::Dict => Some(2),
            Container::Tuple => None,
        }
    }
}

/// Structural capability markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Sized,
    Hashable,
    Iterable,
    Reversible,
    Container,
    Coroutine,
    Generator,
    AsyncGenerator,
}

/// Reserved type-variable names of the three-parameter effects.
const YIELD_SEND_RETURN: &[&str] = &["T_co", "T_contra", "V_co"];
/// Reserved type-variable names of async generators.
const YIELD_SEND: &[&str] = &["T_co", "T_contra"];

impl Capability {
    pub const fn name(self) -> &'static str {
        match self {
            Capability::Sized => "Sized",
            Capability::Hashable => "Hashable",
            Capability::Iterable => "Iterable",
            Capability::Reversible => "Reversible",
            Capability::Container => "Container",
            Capability::Coroutine => "Coroutine",
            Capability::Generator => "Generator",
            Capability::AsyncGenerator => "AsyncGenerator",
        }
    }

    /// Protocol method a value must expose, used in diagnostics.
    pub const fn method(self) -> &'static str {
        match self {
            Capability::Sized => "__len__",
            Capability::Hashable => "__hash__",
            Capability::Iterable => "__iter__",
            Capability::Reversible => "__reversed__",
            Capability::Container => "__contains__",
            Capability::Coroutine => "__await__",
            Capability::Generator => "__next__",
            Capability::AsyncGenerator => "__anext__",
        }
    }

    pub fn required(self) -> Capabilities {
        match self {
            Capability::Sized => Capabilities::SIZED,
            Capability::Hashable => Capabilities::HASHABLE,
            Capability::Iterable => Capabilities::ITERABLE,
            Capability::Reversible => Capabilities::REVERSIBLE,
            Capability::Container => Capabilities::CONTAINER,
            Capability::Coroutine => Capabilities::AWAITABLE,
            Capability::Generator => Capabilities::NEXT | Capabilities::SEND,
            Capability::AsyncGenerator => Capabilities::ASYNC_NEXT | Capabilities::ASYNC_SEND,
        }
    }

    /// Maximum number of type arguments the marker accepts.
    pub const fn max_args(self) -> usize {
        match self {
            Capability::Sized | Capability::Hashable => 0,
            Capability::Iterable | Capability::Reversible | Capability::Container => 1,
            Capability::Coroutine | Capability::Generator => YIELD_SEND_RETURN.len(),
            Capability::AsyncGenerator => YIELD_SEND.len(),
        }
    }

    /// Reserved parameter names for parametric effects, `None` otherwise.
    pub const fn effect_params(self) -> Option<&'static [&'static str]> {
        match self {
            Capability::Coroutine | Capability::Generator => Some(YIELD_SEND_RETURN),
            Capability::AsyncGenerator => Some(YIELD_SEND),
            _ => None,
        }
    }

    /// Whether every type supporting `self` also supports `other`.
    pub fn implies(self, other: Capability) -> bool {
        self == other
            || (other == Capability::Iterable
                && matches!(self, Capability::Reversible | Capability::Generator))
    }
}

/// Parameter and return types of a constrained callable descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub params: Vec<Descriptor>,
    pub ret: Box<Descriptor>,
}

/// Whether a typed record requires all of its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Totality {
    #[default]
    Total,
    Partial,
}

/// A fixed-shape mapping with a declared type per key.
#[derive(Debug, PartialEq, Eq)]
pub struct RecordDef {
    name: String,
    fields: IndexMap<String, Descriptor>,
    totality: Totality,
}

impl RecordDef {
    pub fn new(
        name: impl Into<String>,
        fields: impl IntoIterator<Item = (String, Descriptor)>,
        totality: Totality,
    ) -> Self {
        Self {
            name: name.into(),
            fields: fields.into_iter().collect(),
            totality,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &IndexMap<String, Descriptor> {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Descriptor> {
        self.fields.get(name)
    }

    pub fn totality(&self) -> Totality {
        self.totality
    }

    pub fn is_total(&self) -> bool {
        self.totality == Totality::Total
    }
}

/// A type shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Descriptor {
    /// A bare `None` as written in an annotation. Normalized to
    /// `Primitive(NoneType)` before any comparison.
    Absent,
    /// A concrete nominal type.
    Primitive(Nominal),
    /// A built-in container; empty `args` means unconstrained.
    Parametric {
        origin: Container,
        args: Vec<Descriptor>,
    },
    /// A flat disjunction.
    Union(Vec<Descriptor>),
    /// An invocable; `None` accepts any signature.
    Callable(Option<Signature>),
    /// "Supports capability X", optionally parametrized.
    Protocol {
        capability: Capability,
        args: Vec<Descriptor>,
    },
    /// A user-defined parametrized type.
    Generic {
        origin: Nominal,
        args: Vec<Descriptor>,
    },
    /// A typed record.
    Record(Arc<RecordDef>),
    /// The "any type" descriptor.
    Wildcard,
    /// An unbound type parameter.
    TypeVar(String),
}

impl Descriptor {
    pub fn builtin(kind: Builtin) -> Self {
        Descriptor::Primitive(Nominal::Builtin(kind))
    }

    pub fn class(class: &ClassRef) -> Self {
        Descriptor::Primitive(Nominal::Class(class.clone()))
    }

    pub fn none() -> Self {
        Self::builtin(Builtin::NoneType)
    }

    pub fn object() -> Self {
        Self::builtin(Builtin::Object)
    }

    pub fn bool() -> Self {
        Self::builtin(Builtin::Bool)
    }

    pub fn int() -> Self {
        Self::builtin(Builtin::Int)
    }

    pub fn float() -> Self {
        Self::builtin(Builtin::Float)
    }

    pub fn str() -> Self {
        Self::builtin(Builtin::Str)
    }

    pub fn bytes() -> Self {
        Self::builtin(Builtin::Bytes)
    }

    /// An unconstrained container (`List`, `Tuple`, `Set`, `Dict`).
    pub fn bare(origin: Container) -> Self {
        Descriptor::Parametric {
            origin,
            args: Vec::new(),
        }
    }

    pub fn list(element: Descriptor) -> Self {
        Descriptor::Parametric {
            origin: Container::List,
            args: vec![element],
        }
    }

    pub fn set(element: Descriptor) -> Self {
        Descriptor::Parametric {
            origin: Container::Set,
            args: vec![element],
        }
    }

    pub fn tuple(items: impl IntoIterator<Item = Descriptor>) -> Self {
        Descriptor::Parametric {
            origin: Container::Tuple,
            args: items.into_iter().collect(),
        }
    }

    pub fn dict(key: Descriptor, value: Descriptor) -> Self {
        Descriptor::Parametric {
            origin: Container::Dict,
            args: vec![key, value],
        }
    }

    /// Build a union: nested unions are flattened, `Absent` becomes
    /// `NoneType`, duplicates are dropped and a single member collapses to
    /// that member.
    pub fn union(members: impl IntoIterator<Item = Descriptor>) -> Self {
        let mut flat: SmallVec<[Descriptor; 4]> = SmallVec::new();
        for member in members {
            match member {
                Descriptor::Union(inner) => {
                    for nested in inner {
                        push_unique(&mut flat, nested.normalize_absent());
                    }
                }
                other => push_unique(&mut flat, other.normalize_absent()),
            }
        }
        if flat.len() == 1 {
            return flat.remove(0);
        }
        Descriptor::Union(flat.into_vec())
    }

    pub fn optional(inner: Descriptor) -> Self {
        Self::union([inner, Descriptor::none()])
    }

    pub fn callable(params: impl IntoIterator<Item = Descriptor>, ret: Descriptor) -> Self {
        Descriptor::Callable(Some(Signature {
            params: params.into_iter().collect(),
            ret: Box::new(ret),
        }))
    }

    pub fn any_callable() -> Self {
        Descriptor::Callable(None)
    }

    pub fn protocol(capability: Capability, args: impl IntoIterator<Item = Descriptor>) -> Self {
        Descriptor::Protocol {
            capability,
            args: args.into_iter().collect(),
        }
    }

    /// A capability marker with no type arguments.
    pub fn marker(capability: Capability) -> Self {
        Self::protocol(capability, [])
    }

    pub fn generic(origin: impl Into<Nominal>, args: impl IntoIterator<Item = Descriptor>) -> Self {
        Descriptor::Generic {
            origin: origin.into(),
            args: args.into_iter().collect(),
        }
    }

    pub fn record(def: RecordDef) -> Self {
        Descriptor::Record(Arc::new(def))
    }

    pub fn type_var(name: impl Into<String>) -> Self {
        Descriptor::TypeVar(name.into())
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Descriptor::Wildcard)
    }

    pub fn is_record(&self) -> bool {
        matches!(self, Descriptor::Record(_))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Descriptor::Absent)
            || matches!(self, Descriptor::Primitive(n) if *n == Nominal::NONE)
    }

    pub fn as_type_var(&self) -> Option<&str> {
        match self {
            Descriptor::TypeVar(name) => Some(name),
            _ => None,
        }
    }

    /// The nominal type a container-like descriptor is rooted at.
    pub fn nominal_origin(&self) -> Option<Nominal> {
        match self {
            Descriptor::Parametric { origin, .. } => Some(Nominal::Builtin(origin.builtin())),
            Descriptor::Generic { origin, .. } => Some(origin.clone()),
            _ => None,
        }
    }

    /// Type arguments of parametrized shapes; empty for everything else.
    pub fn type_args(&self) -> &[Descriptor] {
        match self {
            Descriptor::Parametric { args, .. }
            | Descriptor::Protocol { args, .. }
            | Descriptor::Generic { args, .. } => args,
            _ => &[],
        }
    }

    fn normalize_absent(self) -> Descriptor {
        match self {
            Descriptor::Absent => Descriptor::none(),
            other => other,
        }
    }

    /// Check the structural assumptions of the algebra, recursively.
    pub fn validate(&self) -> Result<(), MalformedDescriptor> {
        match self {
            Descriptor::Absent
            | Descriptor::Primitive(_)
            | Descriptor::Wildcard
            | Descriptor::TypeVar(_) => Ok(()),
            Descriptor::Parametric { origin, args } => {
                if let Some(arity) = origin.arity() {
                    if !args.is_empty() && args.len() != arity {
                        return Err(MalformedDescriptor::ContainerArity {
                            container: origin.name(),
                            expected: arity,
                            actual: args.len(),
                        });
                    }
                }
                args.iter().try_for_each(Descriptor::validate)
            }
            Descriptor::Union(members) => {
                for member in members {
                    if matches!(member, Descriptor::Union(_)) {
                        return Err(MalformedDescriptor::NestedUnion {
                            member: member.clone(),
                        });
                    }
                    member.validate()?;
                }
                Ok(())
            }
            Descriptor::Callable(None) => Ok(()),
            Descriptor::Callable(Some(sig)) => {
                sig.params.iter().try_for_each(Descriptor::validate)?;
                sig.ret.validate()
            }
            Descriptor::Protocol { capability, args } => {
                if args.len() > capability.max_args() {
                    return Err(MalformedDescriptor::ProtocolArity {
                        capability: capability.name(),
                        max: capability.max_args(),
                        actual: args.len(),
                    });
                }
                args.iter().try_for_each(Descriptor::validate)
            }
            Descriptor::Generic { origin, args } => {
                if let Nominal::Builtin(kind) = origin {
                    return Err(MalformedDescriptor::BuiltinGenericOrigin { origin: *kind });
                }
                args.iter().try_for_each(Descriptor::validate)
            }
            Descriptor::Record(def) => def.fields().values().try_for_each(Descriptor::validate),
        }
    }
}

fn push_unique(members: &mut SmallVec<[Descriptor; 4]>, candidate: Descriptor) {
    if !members.contains(&candidate) {
        members.push(candidate);
    }
}

impl From<Builtin> for Descriptor {
    fn from(kind: Builtin) -> Self {
        Descriptor::builtin(kind)
    }
}

impl From<Nominal> for Descriptor {
    fn from(nominal: Nominal) -> Self {
        Descriptor::Primitive(nominal)
    }
}

#[cfg(test)]
#[path = "../tests/types_tests.rs"]
mod tests;
