use std::fmt;

use crate::foundation::Value;

/// One declared property assignment.
///
/// Equality is by name and value; bean values compare by identity.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyValue {
    name: String,
    value: Value,
}

impl PropertyValue {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    /// Same name with a different value
    pub fn with_value(&self, value: impl Into<Value>) -> Self {
        Self::new(self.name.clone(), value)
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PropertyValue: name='{}'; value=[{}]", self.name, self.value)
    }
}
