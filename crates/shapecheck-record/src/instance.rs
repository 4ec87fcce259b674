use crate::schema::RecordSchema;
use indexmap::IndexMap;
use shapecheck_solver::{Instance, Value};
use std::sync::Arc;

/// A successfully constructed record.
#[derive(Debug, Clone)]
pub struct RecordInstance {
    schema: Arc<RecordSchema>,
    values: IndexMap<String, Value>,
}

impl RecordInstance {
    pub(crate) fn new(schema: Arc<RecordSchema>, values: IndexMap<String, Value>) -> Self {
        Self { schema, values }
    }

    pub fn schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }

    /// The bound value of `name`; `None` when the field was omitted or is
    /// not declared.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn is_bound(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Bound fields in declaration order.
    pub fn bound(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// An object value of the schema's class carrying the bound fields.
    pub fn into_value(self) -> Value {
        let instance = self
            .values
            .into_iter()
            .fold(Instance::new(self.schema.class().clone()), |instance, (name, value)| {
                instance.with_attr(name, value)
            });
        Value::from(instance)
    }
}
