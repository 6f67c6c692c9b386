use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::errors::{BeansError, PropertyAccessKind};
use crate::foundation::{BeanRef, PropertyDescriptor, TypeInfo, Value};
use crate::values::{PropertyValue, PropertyValues};
use crate::wrapper::converter::{default_convert, ConverterRegistry, ValueConverter};
use crate::wrapper::weight::TypeDifferenceCache;

/// Separator between the segments of a nested property path
pub const NESTED_PROPERTY_SEPARATOR: char = '.';

/// Uniform property access over a live bean.
///
/// A wrapper is created per construction attempt and is not shared between
/// threads. Paths such as `address.city` are resolved by reading each
/// intermediate bean in turn.
pub struct BeanWrapper {
    instance: Option<BeanRef>,
    converters: ConverterRegistry,
    conversion_lock: Option<Arc<Mutex<()>>>,
    weights: RefCell<TypeDifferenceCache>,
}

impl BeanWrapper {
    pub fn new(instance: BeanRef) -> Self {
        Self {
            instance: Some(instance),
            ..Self::unbound()
        }
    }

    /// Wrapper without a target, used for conversions before instantiation
    pub fn unbound() -> Self {
        Self {
            instance: None,
            converters: ConverterRegistry::new(),
            conversion_lock: None,
            weights: RefCell::new(TypeDifferenceCache::new()),
        }
    }

    /// Use a copy of the given converters
    pub fn with_converters(mut self, converters: &ConverterRegistry) -> Self {
        self.converters.extend_from(converters);
        self
    }

    /// Serialize custom conversions through `lock`
    pub fn with_conversion_lock(mut self, lock: Arc<Mutex<()>>) -> Self {
        self.conversion_lock = Some(lock);
        self
    }

    pub fn wrapped_instance(&self) -> Option<&BeanRef> {
        self.instance.as_ref()
    }

    pub fn wrapped_type(&self) -> Option<&'static TypeInfo> {
        self.instance.as_ref().map(|bean| bean.type_info())
    }

    pub fn set_wrapped_instance(&mut self, instance: BeanRef) {
        self.instance = Some(instance);
    }

    pub fn register_converter<C>(&mut self, target: &'static TypeInfo, converter: C)
    where
        C: ValueConverter + 'static,
    {
        self.converters.register(target, Arc::new(converter));
    }

    pub fn register_converter_for_path<C>(&mut self, target: &'static TypeInfo, path: &str, converter: C)
    where
        C: ValueConverter + 'static,
    {
        self.converters.register_for_path(target, path, Arc::new(converter));
    }

    pub fn find_converter(&self, target: &'static TypeInfo, path: Option<&str>) -> Option<Arc<dyn ValueConverter>> {
        self.converters.find(target, path)
    }

    pub fn property_descriptors(&self) -> Result<&'static [PropertyDescriptor], BeansError> {
        Ok(self.target()?.properties())
    }

    pub fn property_descriptor(&self, path: &str) -> Result<&'static PropertyDescriptor, BeansError> {
        let (owner, property) = self.resolve_owner(path)?;
        owner.property(property).ok_or_else(|| {
            BeansError::property_access(
                path,
                PropertyAccessKind::InvalidPath,
                format!("no property '{}' on [{}]", property, owner.type_info()),
            )
        })
    }

    pub fn is_readable_property(&self, path: &str) -> bool {
        self.property_descriptor(path).is_ok_and(|d| d.readable)
    }

    pub fn is_writable_property(&self, path: &str) -> bool {
        self.property_descriptor(path).is_ok_and(|d| d.writable)
    }

    pub fn get_property_value(&self, path: &str) -> Result<Value, BeansError> {
        let (owner, property) = self.resolve_owner(path)?;
        self.read(&owner, property, path)
    }

    /// Convert `value` to the property's declared type and assign it
    pub fn set_property_value(&self, path: &str, value: Value) -> Result<(), BeansError> {
        let (owner, property) = self.resolve_owner(path)?;
        let descriptor = owner.property(property).ok_or_else(|| {
            BeansError::property_access(
                path,
                PropertyAccessKind::NotWritable,
                format!("no property '{}' on [{}]", property, owner.type_info()),
            )
        })?;
        if !descriptor.writable {
            return Err(BeansError::property_access(
                path,
                PropertyAccessKind::NotWritable,
                format!("property '{}' of [{}] is read-only", property, owner.type_info()),
            ));
        }

        let converted = self.convert_if_necessary(value, descriptor.property_type, Some(path))?;
        owner.set_property(property, converted).map_err(|e| {
            BeansError::property_access(path, PropertyAccessKind::InvocationFailed, "setter failed").with_source(e)
        })
    }

    pub fn set_property(&self, pv: &PropertyValue) -> Result<(), BeansError> {
        self.set_property_value(pv.name(), pv.value().clone())
    }

    /// Apply a batch of values.
    ///
    /// Unknown or read-only names fail the whole batch up front unless
    /// `ignore_unknown` is set, in which case they are skipped. Failures of
    /// individual known properties do not stop the others; they are reported
    /// together once every property has been attempted.
    pub fn set_property_values(&self, pvs: &PropertyValues, ignore_unknown: bool) -> Result<(), BeansError> {
        let mut applicable = Vec::with_capacity(pvs.len());
        for pv in pvs {
            if self.is_writable_property(pv.name()) {
                applicable.push(pv);
            } else if !ignore_unknown {
                return Err(BeansError::property_access(
                    pv.name(),
                    PropertyAccessKind::NotWritable,
                    format!(
                        "not a writable property of [{}]",
                        self.wrapped_type().map_or("<unbound>", |t| t.name())
                    ),
                ));
            }
        }

        let errors: Vec<BeansError> = applicable
            .into_iter()
            .filter_map(|pv| self.set_property(pv).err())
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(BeansError::PropertyBatchUpdate { errors })
        }
    }

    /// Coerce `value` to `required`, preferring a registered converter.
    ///
    /// While custom converters are registered every conversion holds the
    /// conversion lock, when one is configured.
    pub fn convert_if_necessary(
        &self,
        value: Value,
        required: &'static TypeInfo,
        path: Option<&str>,
    ) -> Result<Value, BeansError> {
        let property = path.unwrap_or("<argument>");
        let _guard = if self.converters.is_empty() {
            None
        } else {
            self.conversion_lock.as_ref().map(|lock| lock.lock())
        };

        if let Some(converter) = self.find_converter(required, path) {
            return converter.convert(&value, required).map_err(|e| {
                BeansError::property_access(
                    property,
                    PropertyAccessKind::TypeMismatch,
                    format!("custom conversion to [{}] failed", required),
                )
                .with_source(e)
            });
        }

        default_convert(&value, required)
            .map_err(|message| BeansError::property_access(property, PropertyAccessKind::TypeMismatch, message))
    }

    /// Type-difference weight of `args` against `parameter_types`, cached per
    /// type pair for the lifetime of this wrapper
    pub fn type_difference_weight(&self, parameter_types: &[&'static TypeInfo], args: &[Value]) -> Option<u32> {
        self.weights.borrow_mut().weight(parameter_types, args)
    }

    fn target(&self) -> Result<&BeanRef, BeansError> {
        self.instance.as_ref().ok_or_else(|| BeansError::InvalidArgument {
            message: "bean wrapper has no wrapped instance".to_string(),
        })
    }

    /// Walk all but the last path segment and return the bean owning the final property
    fn resolve_owner<'p>(&self, path: &'p str) -> Result<(BeanRef, &'p str), BeansError> {
        let mut owner = self.target()?.clone();
        let mut segments = path.split(NESTED_PROPERTY_SEPARATOR).peekable();

        while let Some(segment) = segments.next() {
            if segment.is_empty() {
                return Err(BeansError::property_access(
                    path,
                    PropertyAccessKind::InvalidPath,
                    "empty path segment",
                ));
            }
            if segments.peek().is_none() {
                return Ok((owner, segment));
            }

            owner = match self.read(&owner, segment, path)? {
                Value::Bean(nested) => nested,
                Value::Null => {
                    return Err(BeansError::property_access(
                        path,
                        PropertyAccessKind::InvalidPath,
                        format!("nested property '{}' is null", segment),
                    ))
                }
                other => {
                    return Err(BeansError::property_access(
                        path,
                        PropertyAccessKind::InvalidPath,
                        format!("nested property '{}' holds a {} value, not a bean", segment, other.kind()),
                    ))
                }
            };
        }

        Err(BeansError::property_access(path, PropertyAccessKind::InvalidPath, "empty property path"))
    }

    fn read(&self, owner: &BeanRef, property: &str, path: &str) -> Result<Value, BeansError> {
        let descriptor = owner.property(property).ok_or_else(|| {
            BeansError::property_access(
                path,
                PropertyAccessKind::InvalidPath,
                format!("no property '{}' on [{}]", property, owner.type_info()),
            )
        })?;
        if !descriptor.readable {
            return Err(BeansError::property_access(
                path,
                PropertyAccessKind::NotReadable,
                format!("property '{}' of [{}] is write-only", property, owner.type_info()),
            ));
        }
        owner.get_property(property).map_err(|e| {
            BeansError::property_access(path, PropertyAccessKind::InvocationFailed, "getter failed").with_source(e)
        })
    }
}

impl fmt::Debug for BeanWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanWrapper")
            .field("wrapped_type", &self.wrapped_type().map(|t| t.name()))
            .field("converters", &self.converters)
            .field("serialized", &self.conversion_lock.is_some())
            .finish()
    }
}
