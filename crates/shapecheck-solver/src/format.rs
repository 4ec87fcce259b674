//! Human-readable rendering of descriptors.
//!
//! Output follows the familiar annotation syntax: `List[int]`,
//! `Dict[str, Union[int, str]]`, `Callable[[int], str]`, `Optional[str]`.

use crate::types::{Descriptor, Signature};
use std::fmt;

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Descriptor::Absent => f.write_str("None"),
            Descriptor::Primitive(_) if self.is_none() => f.write_str("None"),
            Descriptor::Primitive(nominal) => f.write_str(nominal.name()),
            Descriptor::Parametric { origin, args } => {
                f.write_str(origin.name())?;
                write_args(f, args)
            }
            Descriptor::Union(members) => {
                if let [a, b] = members.as_slice() {
                    if b.is_none() {
                        return write!(f, "Optional[{a}]");
                    }
                    if a.is_none() {
                        return write!(f, "Optional[{b}]");
                    }
                }
                f.write_str("Union[")?;
                write_list(f, members)?;
                f.write_str("]")
            }
            Descriptor::Callable(None) => f.write_str("Callable"),
            Descriptor::Callable(Some(Signature { params, ret })) => {
                f.write_str("Callable[[")?;
                write_list(f, params)?;
                write!(f, "], {ret}]")
            }
            Descriptor::Protocol { capability, args } => {
                f.write_str(capability.name())?;
                write_args(f, args)
            }
            Descriptor::Generic { origin, args } => {
                f.write_str(origin.name())?;
                write_args(f, args)
            }
            Descriptor::Record(def) => f.write_str(def.name()),
            Descriptor::Wildcard => f.write_str("Any"),
            Descriptor::TypeVar(name) => write!(f, "~{name}"),
        }
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[Descriptor]) -> fmt::Result {
    if args.is_empty() {
        return Ok(());
    }
    f.write_str("[")?;
    write_list(f, args)?;
    f.write_str("]")
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Descriptor]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/format_tests.rs"]
mod tests;
