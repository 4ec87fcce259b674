//! Nominal class model.
//!
//! Every runtime value has exactly one nominal type: either a [`Builtin`]
//! kind or a user class ([`ClassRef`]). Nominal subtyping is plain subclass
//! testing through declared bases; every class derives from `object` and
//! `bool` derives from `int`.
//!
//! Structural capabilities ("has a length", "can be reversed", ...) are
//! attached to nominal types rather than probed on values. Builtin
//! capabilities live in a single read-only table built once per process;
//! user classes declare what they add or remove relative to their bases.

use bitflags::bitflags;
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

bitflags! {
    /// Behaviour a nominal type exposes, one flag per protocol method.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u16 {
        /// `__len__`
        const SIZED = 1 << 0;
        /// `__hash__`
        const HASHABLE = 1 << 1;
        /// `__iter__`
        const ITERABLE = 1 << 2;
        /// `__reversed__`
        const REVERSIBLE = 1 << 3;
        /// `__contains__`
        const CONTAINER = 1 << 4;
        /// `__call__`
        const CALLABLE = 1 << 5;
        /// `__next__`
        const NEXT = 1 << 6;
        /// `send`
        const SEND = 1 << 7;
        /// A suspended computation that can be awaited.
        const AWAITABLE = 1 << 8;
        /// `__anext__`
        const ASYNC_NEXT = 1 << 9;
        /// `asend`
        const ASYNC_SEND = 1 << 10;
    }
}

/// Built-in nominal kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Object,
    NoneType,
    Bool,
    Int,
    Float,
    Str,
    Bytes,
    List,
    Tuple,
    Set,
    Dict,
    Range,
    Ellipsis,
    Function,
    Coroutine,
    Generator,
    AsyncGenerator,
    Iterator,
}

static BUILTIN_CAPABILITIES: Lazy<FxHashMap<Builtin, Capabilities>> = Lazy::new(|| {
    use Capabilities as C;

    let scalar = C::HASHABLE;
    let text = C::SIZED | C::HASHABLE | C::ITERABLE | C::CONTAINER;

    let mut table = FxHashMap::default();
    table.insert(Builtin::Object, C::HASHABLE);
    table.insert(Builtin::NoneType, scalar);
    table.insert(Builtin::Bool, scalar);
    table.insert(Builtin::Int, scalar);
    table.insert(Builtin::Float, scalar);
    table.insert(Builtin::Ellipsis, scalar);
    table.insert(Builtin::Str, text);
    table.insert(Builtin::Bytes, text);
    table.insert(
        Builtin::List,
        C::SIZED | C::ITERABLE | C::REVERSIBLE | C::CONTAINER,
    );
    table.insert(
        Builtin::Tuple,
        C::SIZED | C::HASHABLE | C::ITERABLE | C::CONTAINER,
    );
    table.insert(Builtin::Set, C::SIZED | C::ITERABLE | C::CONTAINER);
    table.insert(
        Builtin::Dict,
        C::SIZED | C::ITERABLE | C::REVERSIBLE | C::CONTAINER,
    );
    table.insert(
        Builtin::Range,
        C::SIZED | C::HASHABLE | C::ITERABLE | C::REVERSIBLE | C::CONTAINER,
    );
    table.insert(Builtin::Function, C::CALLABLE | C::HASHABLE);
    table.insert(Builtin::Coroutine, C::AWAITABLE | C::SEND | C::HASHABLE);
    table.insert(
        Builtin::Generator,
        C::NEXT | C::SEND | C::ITERABLE | C::HASHABLE,
    );
    table.insert(
        Builtin::AsyncGenerator,
        C::ASYNC_NEXT | C::ASYNC_SEND | C::HASHABLE,
    );
    table.insert(Builtin::Iterator, C::NEXT | C::ITERABLE | C::HASHABLE);
    table
});

impl Builtin {
    /// The direct base of this builtin, `None` only for `object`.
    pub const fn base(self) -> Option<Builtin> {
        match self {
            Builtin::Object => None,
            Builtin::Bool => Some(Builtin::Int),
            _ => Some(Builtin::Object),
        }
    }

    /// Runtime name of the builtin, as a dynamic language would print it.
    pub const fn name(self) -> &'static str {
        match self {
            Builtin::Object => "object",
            Builtin::NoneType => "NoneType",
            Builtin::Bool => "bool",
            Builtin::Int => "int",
            Builtin::Float => "float",
            Builtin::Str => "str",
            Builtin::Bytes => "bytes",
            Builtin::List => "list",
            Builtin::Tuple => "tuple",
            Builtin::Set => "set",
            Builtin::Dict => "dict",
            Builtin::Range => "range",
            Builtin::Ellipsis => "ellipsis",
            Builtin::Function => "function",
            Builtin::Coroutine => "coroutine",
            Builtin::Generator => "generator",
            Builtin::AsyncGenerator => "async_generator",
            Builtin::Iterator => "iterator",
        }
    }

    pub fn capabilities(self) -> Capabilities {
        BUILTIN_CAPABILITIES
            .get(&self)
            .copied()
            .unwrap_or_default()
    }

    fn is_subclass_of(self, other: Builtin) -> bool {
        let mut current = Some(self);
        while let Some(kind) = current {
            if kind == other {
                return true;
            }
            current = kind.base();
        }
        false
    }
}

/// A user-declared class.
#[derive(Debug)]
pub struct ClassDef {
    name: String,
    bases: Vec<Nominal>,
    provides: Capabilities,
    withholds: Capabilities,
}

impl ClassDef {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bases(&self) -> &[Nominal] {
        &self.bases
    }
}

/// Shared handle to a [`ClassDef`].
///
/// Identity is by allocation: two classes declared separately are distinct
/// even when their names and bases agree.
#[derive(Debug, Clone)]
pub struct ClassRef(Arc<ClassDef>);

impl ClassRef {
    pub fn builder(name: impl Into<String>) -> ClassBuilder {
        ClassBuilder {
            name: name.into(),
            bases: Vec::new(),
            provides: Capabilities::empty(),
            withholds: Capabilities::empty(),
        }
    }

    /// Shorthand for a class with the given bases and no capability changes.
    pub fn new(name: impl Into<String>, bases: impl IntoIterator<Item = Nominal>) -> Self {
        let mut builder = Self::builder(name);
        for base in bases {
            builder = builder.base(base);
        }
        builder.build()
    }

    pub fn def(&self) -> &ClassDef {
        &self.0
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn bases(&self) -> &[Nominal] {
        &self.0.bases
    }

    fn capabilities(&self) -> Capabilities {
        let inherited = if self.0.bases.is_empty() {
            Builtin::Object.capabilities()
        } else {
            self.0
                .bases
                .iter()
                .fold(Capabilities::empty(), |acc, base| acc | base.capabilities())
        };
        (inherited | self.0.provides) - self.0.withholds
    }
}

impl PartialEq for ClassRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ClassRef {}

impl Hash for ClassRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).hash(state);
    }
}

/// Builder for [`ClassRef`].
#[derive(Debug)]
pub struct ClassBuilder {
    name: String,
    bases: Vec<Nominal>,
    provides: Capabilities,
    withholds: Capabilities,
}

impl ClassBuilder {
    pub fn base(mut self, base: impl Into<Nominal>) -> Self {
        self.bases.push(base.into());
        self
    }

    /// Capabilities the class defines on top of its bases.
    pub fn provides(mut self, capabilities: Capabilities) -> Self {
        self.provides |= capabilities;
        self
    }

    /// Capabilities the class explicitly disables (e.g. `__hash__ = None`).
    pub fn withholds(mut self, capabilities: Capabilities) -> Self {
        self.withholds |= capabilities;
        self
    }

    pub fn build(self) -> ClassRef {
        ClassRef(Arc::new(ClassDef {
            name: self.name,
            bases: self.bases,
            provides: self.provides,
            withholds: self.withholds,
        }))
    }
}

/// A nominal type: a builtin kind or a user class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Nominal {
    Builtin(Builtin),
    Class(ClassRef),
}

impl Nominal {
    pub const OBJECT: Nominal = Nominal::Builtin(Builtin::Object);
    pub const NONE: Nominal = Nominal::Builtin(Builtin::NoneType);

    pub fn name(&self) -> &str {
        match self {
            Nominal::Builtin(kind) => kind.name(),
            Nominal::Class(class) => class.name(),
        }
    }

    pub fn as_builtin(&self) -> Option<Builtin> {
        match self {
            Nominal::Builtin(kind) => Some(*kind),
            Nominal::Class(_) => None,
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Nominal::Builtin(Builtin::Object))
    }

    /// Reflexive, transitive subclass test.
    pub fn is_subclass_of(&self, other: &Nominal) -> bool {
        if self == other || other.is_object() {
            return true;
        }
        match (self, other) {
            (Nominal::Builtin(kind), Nominal::Builtin(target)) => kind.is_subclass_of(*target),
            // Builtins never derive from user classes.
            (Nominal::Builtin(_), Nominal::Class(_)) => false,
            (Nominal::Class(class), _) => class.bases().iter().any(|b| b.is_subclass_of(other)),
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        match self {
            Nominal::Builtin(kind) => kind.capabilities(),
            Nominal::Class(class) => class.capabilities(),
        }
    }

    pub fn supports(&self, required: Capabilities) -> bool {
        self.capabilities().contains(required)
    }
}

impl From<Builtin> for Nominal {
    fn from(kind: Builtin) -> Self {
        Nominal::Builtin(kind)
    }
}

impl From<ClassRef> for Nominal {
    fn from(class: ClassRef) -> Self {
        Nominal::Class(class)
    }
}

impl fmt::Display for Nominal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
#[path = "../tests/nominal_tests.rs"]
mod tests;
