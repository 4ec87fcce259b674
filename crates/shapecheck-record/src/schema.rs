//! Record schemas and the checked constructor.

use crate::error::ConstructError;
use crate::instance::RecordInstance;
use indexmap::IndexMap;
use shapecheck_solver::{
    CheckOptions, ClassRef, Descriptor, MalformedDescriptor, Nominal, Value, ValueChecker,
};
use std::sync::Arc;
use tracing::debug;

/// A declared record type.
///
/// Each schema owns a generated class, so constructed instances can be
/// checked against `Descriptor::class(schema.class())` like any other object.
#[derive(Debug)]
pub struct RecordSchema {
    name: String,
    fields: IndexMap<String, Descriptor>,
    strict: bool,
    ignore_unexpected: bool,
    options: CheckOptions,
    class: ClassRef,
}

impl RecordSchema {
    pub fn builder(name: impl Into<String>) -> RecordSchemaBuilder {
        RecordSchemaBuilder {
            name: name.into(),
            fields: IndexMap::new(),
            bases: Vec::new(),
            strict: true,
            ignore_unexpected: false,
            options: CheckOptions::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All fields, inherited ones first.
    pub fn fields(&self) -> &IndexMap<String, Descriptor> {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Descriptor> {
        self.fields.get(name)
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn ignores_unexpected(&self) -> bool {
        self.ignore_unexpected
    }

    pub fn options(&self) -> &CheckOptions {
        &self.options
    }

    pub fn class(&self) -> &ClassRef {
        &self.class
    }

    /// Build an instance from keyword arguments.
    ///
    /// Declared fields are visited in order: a supplied value must conform
    /// to the field's descriptor, and an omitted one is an error for strict
    /// schemas. Arguments the schema does not declare are rejected after
    /// every declared field passed, or dropped when the schema ignores them.
    pub fn construct<K, V>(
        self: &Arc<Self>,
        args: impl IntoIterator<Item = (K, V)>,
    ) -> Result<RecordInstance, ConstructError>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let mut supplied: IndexMap<String, Value> = args
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        let mut checker = ValueChecker::with_options(self.options);
        let mut bound = IndexMap::with_capacity(self.fields.len());

        for (field, descriptor) in &self.fields {
            match supplied.shift_remove(field) {
                Some(value) => {
                    if let Err(mismatch) = checker.check(&value, descriptor) {
                        debug!(record = %self.name, %field, %mismatch, "record construction rejected");
                        return Err(ConstructError::TypeMismatch {
                            field: field.clone(),
                            source: mismatch,
                        });
                    }
                    bound.insert(field.clone(), value);
                }
                None if self.strict => {
                    debug!(record = %self.name, %field, "record construction missing argument");
                    return Err(ConstructError::MissingArgument {
                        field: field.clone(),
                    });
                }
                None => {}
            }
        }

        if self.ignore_unexpected {
            if !supplied.is_empty() {
                debug!(
                    record = %self.name,
                    dropped = supplied.len(),
                    "record construction ignored undeclared arguments"
                );
            }
        } else if let Some(name) = supplied.into_keys().next() {
            debug!(record = %self.name, %name, "record construction got unexpected argument");
            return Err(ConstructError::UnexpectedArgument {
                name,
                record: self.name.clone(),
            });
        }
        Ok(RecordInstance::new(Arc::clone(self), bound))
    }
}

/// Builder for [`RecordSchema`].
#[derive(Debug)]
pub struct RecordSchemaBuilder {
    name: String,
    fields: IndexMap<String, Descriptor>,
    bases: Vec<Arc<RecordSchema>>,
    strict: bool,
    ignore_unexpected: bool,
    options: CheckOptions,
}

impl RecordSchemaBuilder {
    pub fn field(mut self, name: impl Into<String>, descriptor: Descriptor) -> Self {
        self.fields.insert(name.into(), descriptor);
        self
    }

    /// Inherit the fields of `base`. Later bases and the schema's own fields
    /// override earlier declarations of the same name.
    pub fn extends(mut self, base: &Arc<RecordSchema>) -> Self {
        self.bases.push(Arc::clone(base));
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Drop undeclared arguments instead of rejecting them.
    pub fn ignore_unexpected(mut self, ignore: bool) -> Self {
        self.ignore_unexpected = ignore;
        self
    }

    pub fn options(mut self, options: CheckOptions) -> Self {
        self.options = options;
        self
    }

    /// Validate every field descriptor and assemble the schema.
    pub fn build(self) -> Result<Arc<RecordSchema>, MalformedDescriptor> {
        let mut fields = IndexMap::new();
        for base in &self.bases {
            for (name, descriptor) in base.fields() {
                fields.insert(name.clone(), descriptor.clone());
            }
        }
        for (name, descriptor) in self.fields {
            fields.insert(name, descriptor);
        }
        fields.values().try_for_each(Descriptor::validate)?;

        let class = self
            .bases
            .iter()
            .fold(ClassRef::builder(self.name.as_str()), |class, base| {
                class.base(Nominal::Class(base.class().clone()))
            })
            .build();

        Ok(Arc::new(RecordSchema {
            name: self.name,
            fields,
            strict: self.strict,
            ignore_unexpected: self.ignore_unexpected,
            options: self.options,
            class,
        }))
    }
}

#[cfg(test)]
#[path = "../tests/schema_tests.rs"]
mod tests;
