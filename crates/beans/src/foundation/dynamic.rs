use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::errors::BoxError;
use crate::foundation::class::BeanClass;
use crate::foundation::traits::{Bean, BeanRef, PropertyDescriptor};
use crate::foundation::type_info::TypeInfo;
use crate::foundation::value::Value;

/// Map-backed bean whose properties are described by a static descriptor table.
///
/// Useful for configuration holders and for wiring types that have no
/// behaviour of their own.
pub struct DynamicBean {
    type_info: &'static TypeInfo,
    properties: &'static [PropertyDescriptor],
    values: RwLock<HashMap<&'static str, Value>>,
}

impl DynamicBean {
    pub fn new(type_info: &'static TypeInfo, properties: &'static [PropertyDescriptor]) -> Self {
        Self {
            type_info,
            properties,
            values: RwLock::new(HashMap::new()),
        }
    }

    /// Class with a default constructor producing empty `DynamicBean`s
    pub fn class(type_info: &'static TypeInfo, properties: &'static [PropertyDescriptor]) -> BeanClass {
        BeanClass::of(type_info, move || Arc::new(DynamicBean::new(type_info, properties)) as BeanRef)
    }

    /// Current value of a property, `Null` when unset
    pub fn value(&self, name: &str) -> Value {
        self.values.read().get(name).cloned().unwrap_or(Value::Null)
    }

    fn descriptor(&self, name: &str) -> Option<&'static PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }
}

impl Bean for DynamicBean {
    fn type_info(&self) -> &'static TypeInfo {
        self.type_info
    }

    fn properties(&self) -> &'static [PropertyDescriptor] {
        self.properties
    }

    fn get_property(&self, name: &str) -> Result<Value, BoxError> {
        match self.descriptor(name) {
            Some(_) => Ok(self.value(name)),
            None => Err(format!("{} has no property '{}'", self.type_info, name).into()),
        }
    }

    fn set_property(&self, name: &str, value: Value) -> Result<(), BoxError> {
        let descriptor = self
            .descriptor(name)
            .ok_or_else(|| format!("{} has no property '{}'", self.type_info, name))?;
        self.values.write().insert(descriptor.name, value);
        Ok(())
    }
}
