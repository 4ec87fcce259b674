//! Shape-specific subtype rules.
//!
//! Each submodule adds methods to [`SubtypeChecker`](crate::subtype::SubtypeChecker)
//! for one family of target shapes:
//!
//! - `unions`: union sources and union targets
//! - `containers`: `List`, `Set`, `Tuple` and `Dict` targets
//! - `callables`: `Callable` targets
//! - `protocols`: capability markers and parametric effects
//! - `generics`: user-defined parametrized types
//! - `records`: record against record

mod callables;
mod containers;
mod generics;
mod protocols;
mod records;
mod unions;
