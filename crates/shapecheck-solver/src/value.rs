//! Runtime values the checker inspects.
//!
//! [`Value`] stands in for the objects of a dynamic language. Each value has
//! one nominal type ([`Value::nominal`]) and derives its structural
//! capabilities from it, so capability checks never probe the value itself.
//!
//! Invocable values carry their declared signature explicitly through the
//! [`Invocable`] trait instead of relying on reflection.

use crate::nominal::{Builtin, Capabilities, ClassRef, Nominal};
use crate::types::{Capability, Descriptor};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// A declared parameter of an invocable value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamInfo {
    pub name: String,
    /// `None` when the parameter is unannotated.
    pub annotation: Option<Descriptor>,
}

/// Something that can be called and can report its declared signature.
pub trait Invocable: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    /// Positional parameters in declaration order.
    fn declared_params(&self) -> &[ParamInfo];

    /// Declared return descriptor, `None` when unannotated.
    fn declared_return(&self) -> Option<&Descriptor>;
}

/// A plain function value with an explicit signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionValue {
    name: String,
    params: Vec<ParamInfo>,
    ret: Option<Descriptor>,
}

impl FunctionValue {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            ret: None,
        }
    }

    pub fn param(mut self, name: impl Into<String>, annotation: Descriptor) -> Self {
        self.params.push(ParamInfo {
            name: name.into(),
            annotation: Some(annotation),
        });
        self
    }

    pub fn untyped_param(mut self, name: impl Into<String>) -> Self {
        self.params.push(ParamInfo {
            name: name.into(),
            annotation: None,
        });
        self
    }

    pub fn returns(mut self, ret: Descriptor) -> Self {
        self.ret = Some(ret);
        self
    }

    pub fn into_value(self) -> Value {
        Value::Function(Arc::new(self))
    }
}

impl Invocable for FunctionValue {
    fn name(&self) -> &str {
        &self.name
    }

    fn declared_params(&self) -> &[ParamInfo] {
        &self.params
    }

    fn declared_return(&self) -> Option<&Descriptor> {
        self.ret.as_ref()
    }
}

/// An instance of a user class.
#[derive(Debug, Clone)]
pub struct Instance {
    class: ClassRef,
    attrs: IndexMap<String, Value>,
}

impl Instance {
    pub fn new(class: ClassRef) -> Self {
        Self {
            class,
            attrs: IndexMap::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: Value) -> Self {
        self.attrs.insert(name.into(), value);
        self
    }

    pub fn class(&self) -> &ClassRef {
        &self.class
    }

    pub fn attr(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name)
    }

    pub fn attrs(&self) -> &IndexMap<String, Value> {
        &self.attrs
    }
}

/// A runtime value.
#[derive(Debug, Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    Ellipsis,
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Set(Vec<Value>),
    /// Key/value pairs in insertion order.
    Dict(Vec<(Value, Value)>),
    Range {
        start: i64,
        stop: i64,
        step: i64,
    },
    Function(Arc<dyn Invocable>),
    /// A suspended computation, named after the function that created it.
    Coroutine(String),
    Generator(String),
    AsyncGenerator(String),
    /// A next-only iterator such as a lazy map.
    Iterator(String),
    Object(Arc<Instance>),
}

impl Value {
    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(items.into_iter().collect())
    }

    pub fn tuple(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Tuple(items.into_iter().collect())
    }

    pub fn set(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Set(items.into_iter().collect())
    }

    pub fn dict(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        Value::Dict(entries.into_iter().collect())
    }

    pub fn range(start: i64, stop: i64) -> Self {
        Value::Range {
            start,
            stop,
            step: 1,
        }
    }

    /// A bare instance of `class` with no attributes.
    pub fn object(class: &ClassRef) -> Self {
        Value::Object(Arc::new(Instance::new(class.clone())))
    }

    /// Render the way diagnostics quote a value: strings bare, everything
    /// else in its `Display` form.
    pub fn to_label(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            other => other.to_string(),
        }
    }

    pub fn nominal(&self) -> Nominal {
        let kind = match self {
            Value::None => Builtin::NoneType,
            Value::Bool(_) => Builtin::Bool,
            Value::Int(_) => Builtin::Int,
            Value::Float(_) => Builtin::Float,
            Value::Str(_) => Builtin::Str,
            Value::Bytes(_) => Builtin::Bytes,
            Value::Ellipsis => Builtin::Ellipsis,
            Value::List(_) => Builtin::List,
            Value::Tuple(_) => Builtin::Tuple,
            Value::Set(_) => Builtin::Set,
            Value::Dict(_) => Builtin::Dict,
            Value::Range { .. } => Builtin::Range,
            Value::Function(_) => Builtin::Function,
            Value::Coroutine(_) => Builtin::Coroutine,
            Value::Generator(_) => Builtin::Generator,
            Value::AsyncGenerator(_) => Builtin::AsyncGenerator,
            Value::Iterator(_) => Builtin::Iterator,
            Value::Object(instance) => return Nominal::Class(instance.class.clone()),
        };
        Nominal::Builtin(kind)
    }

    pub fn capabilities(&self) -> Capabilities {
        self.nominal().capabilities()
    }

    pub fn supports(&self, capability: Capability) -> bool {
        self.capabilities().contains(capability.required())
    }

    pub fn is_invocable(&self) -> bool {
        self.capabilities().contains(Capabilities::CALLABLE)
    }

    /// The declared signature, for values that carry one.
    pub fn as_invocable(&self) -> Option<&dyn Invocable> {
        match self {
            Value::Function(function) => Some(function.as_ref()),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<FunctionValue> for Value {
    fn from(function: FunctionValue) -> Self {
        function.into_value()
    }
}

impl From<Instance> for Value {
    fn from(instance: Instance) -> Self {
        Value::Object(Arc::new(instance))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("None"),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Str(s) => write!(f, "'{}'", s.replace('\'', "\\'")),
            Value::Bytes(bytes) => {
                f.write_str("b'")?;
                for &b in bytes {
                    match b {
                        b'\'' => f.write_str("\\'")?,
                        b'\\' => f.write_str("\\\\")?,
                        0x20..=0x7e => write!(f, "{}", b as char)?,
                        _ => write!(f, "\\x{b:02x}")?,
                    }
                }
                f.write_str("'")
            }
            Value::Ellipsis => f.write_str("Ellipsis"),
            Value::List(items) => {
                f.write_str("[")?;
                write_items(f, items)?;
                f.write_str("]")
            }
            Value::Tuple(items) => {
                f.write_str("(")?;
                write_items(f, items)?;
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            Value::Set(items) if items.is_empty() => f.write_str("set()"),
            Value::Set(items) => {
                f.write_str("{")?;
                write_items(f, items)?;
                f.write_str("}")
            }
            Value::Dict(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
            Value::Range { start, stop, step } if *step == 1 => {
                write!(f, "range({start}, {stop})")
            }
            Value::Range { start, stop, step } => write!(f, "range({start}, {stop}, {step})"),
            Value::Function(function) => write!(f, "<function {}>", function.name()),
            Value::Coroutine(name) => write!(f, "<coroutine object {name}>"),
            Value::Generator(name) => write!(f, "<generator object {name}>"),
            Value::AsyncGenerator(name) => write!(f, "<async_generator object {name}>"),
            Value::Iterator(name) => write!(f, "<{name} object>"),
            Value::Object(instance) => write!(f, "<{} object>", instance.class.name()),
        }
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/value_tests.rs"]
mod tests;
