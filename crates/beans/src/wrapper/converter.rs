use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::errors::BoxError;
use crate::foundation::{builtin, TypeInfo, Value};

/// Custom conversion of a raw value into a declared property or argument type.
///
/// Converters are shared between threads. Conversions run under the
/// container's conversion lock, so an implementation does not have to be
/// reentrant.
pub trait ValueConverter: Send + Sync {
    fn convert(&self, value: &Value, target: &'static TypeInfo) -> Result<Value, BoxError>;
}

impl<F> ValueConverter for F
where
    F: Fn(&Value, &'static TypeInfo) -> Result<Value, BoxError> + Send + Sync,
{
    fn convert(&self, value: &Value, target: &'static TypeInfo) -> Result<Value, BoxError> {
        self(value, target)
    }
}

/// Converters keyed by target type, optionally narrowed to one property path
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    by_type: HashMap<&'static TypeInfo, Arc<dyn ValueConverter>>,
    by_path: HashMap<(&'static TypeInfo, String), Arc<dyn ValueConverter>>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, target: &'static TypeInfo, converter: Arc<dyn ValueConverter>) {
        self.by_type.insert(target, converter);
    }

    pub fn register_for_path(
        &mut self,
        target: &'static TypeInfo,
        path: impl Into<String>,
        converter: Arc<dyn ValueConverter>,
    ) {
        self.by_path.insert((target, path.into()), converter);
    }

    /// Path-specific converter first, then the type-wide one
    pub fn find(&self, target: &'static TypeInfo, path: Option<&str>) -> Option<Arc<dyn ValueConverter>> {
        path.and_then(|p| self.by_path.get(&(target, p.to_string())))
            .or_else(|| self.by_type.get(target))
            .cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty() && self.by_path.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_type.len() + self.by_path.len()
    }

    /// Copy every converter of `other` into `self`, replacing duplicates
    pub fn extend_from(&mut self, other: &ConverterRegistry) {
        for (target, converter) in &other.by_type {
            self.by_type.insert(*target, converter.clone());
        }
        for (key, converter) in &other.by_path {
            self.by_path.insert(key.clone(), converter.clone());
        }
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("types", &self.by_type.keys().map(|t| t.name()).collect::<Vec<_>>())
            .field(
                "paths",
                &self
                    .by_path
                    .keys()
                    .map(|(t, p)| format!("{}@{}", t.name(), p))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Best-effort conversion used when no custom converter is registered.
///
/// Values already assignable are returned unchanged.
pub fn default_convert(value: &Value, target: &'static TypeInfo) -> Result<Value, String> {
    if value.is_assignable_to(target) {
        return Ok(value.clone());
    }

    let converted = match value {
        Value::Str(s) if *target == builtin::INT => s
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|e| format!("cannot parse '{}' as int: {}", s, e))?,
        Value::Str(s) if *target == builtin::FLOAT => s
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|e| format!("cannot parse '{}' as float: {}", s, e))?,
        Value::Str(s) if *target == builtin::BOOL => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Value::Bool(true),
            "false" | "no" | "off" | "0" => Value::Bool(false),
            _ => return Err(format!("cannot parse '{}' as bool", s)),
        },
        Value::Str(s) if *target == builtin::LIST => Value::List(
            s.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(Value::from)
                .collect(),
        ),
        Value::Int(i) if *target == builtin::FLOAT => Value::Float(*i as f64),
        Value::Bool(_) | Value::Int(_) | Value::Float(_) if *target == builtin::STRING => {
            Value::Str(value.to_string())
        }
        _ => {
            return Err(format!(
                "cannot convert {} value [{}] to required type [{}]",
                value.kind(),
                value,
                target
            ))
        }
    };
    Ok(converted)
}
