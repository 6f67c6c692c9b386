use std::fmt;
use thiserror::Error;

use crate::config::ConfigError;

/// Cause type returned by user callbacks (constructors, converters, lifecycle hooks)
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// What went wrong while accessing a property through a bean wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyAccessKind {
    NotReadable,
    NotWritable,
    TypeMismatch,
    InvalidPath,
    InvocationFailed,
}

impl PropertyAccessKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyAccessKind::NotReadable => "not readable",
            PropertyAccessKind::NotWritable => "not writable",
            PropertyAccessKind::TypeMismatch => "type mismatch",
            PropertyAccessKind::InvalidPath => "invalid path",
            PropertyAccessKind::InvocationFailed => "invocation failed",
        }
    }
}

impl fmt::Display for PropertyAccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for bean definition, creation and wiring
#[derive(Debug, Error)]
pub enum BeansError {
    #[error("Error creating bean '{bean_name}' defined in {resource_description}: {message}")]
    BeanCreation {
        bean_name: String,
        resource_description: String,
        message: String,
        source: Option<BoxError>,
    },

    #[error("Unsatisfied dependency of bean '{bean_name}' through {injection_point} of type [{required_type}]: {message}")]
    UnsatisfiedDependency {
        bean_name: String,
        injection_point: String,
        required_type: String,
        message: String,
    },

    #[error("Circular depends-on relationship for bean '{bean_name}': {chain}")]
    CircularDependsOn { bean_name: String, chain: String },

    #[error("Requested bean '{bean_name}' is currently in creation: unresolvable circular reference")]
    BeanCurrentlyInCreation { bean_name: String },

    #[error("Property '{property}' {kind}: {message}")]
    PropertyAccess {
        property: String,
        kind: PropertyAccessKind,
        message: String,
        source: Option<BoxError>,
    },

    #[error("Failed to apply {} property value(s): {}", .errors.len(), summarize(.errors))]
    PropertyBatchUpdate { errors: Vec<BeansError> },

    #[error("No bean named '{name}' is defined")]
    NoSuchBeanDefinition { name: String },

    #[error("Bean named '{name}' must be of type [{required_type}], but was actually of type [{actual_type}]")]
    BeanNotOfRequiredType {
        name: String,
        required_type: String,
        actual_type: String,
    },

    #[error("Invalid bean definition '{name}': {message}")]
    BeanDefinitionStore { name: String, message: String },

    #[error("Invalid value '{value}' for {attribute}. Expected: {expected}")]
    InvalidAttribute {
        attribute: String,
        value: String,
        expected: String,
    },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

fn summarize(errors: &[BeansError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl BeansError {
    /// Create a bean creation error without a cause
    pub fn bean_creation(
        bean_name: impl Into<String>,
        resource_description: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::BeanCreation {
            bean_name: bean_name.into(),
            resource_description: resource_description.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create an unsatisfied dependency error
    pub fn unsatisfied_dependency(
        bean_name: impl Into<String>,
        injection_point: impl Into<String>,
        required_type: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::UnsatisfiedDependency {
            bean_name: bean_name.into(),
            injection_point: injection_point.into(),
            required_type: required_type.into(),
            message: message.into(),
        }
    }

    /// Create a property access error without a cause
    pub fn property_access(
        property: impl Into<String>,
        kind: PropertyAccessKind,
        message: impl Into<String>,
    ) -> Self {
        Self::PropertyAccess {
            property: property.into(),
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a no-such-definition error
    pub fn no_such_bean(name: impl Into<String>) -> Self {
        Self::NoSuchBeanDefinition { name: name.into() }
    }

    /// Create a definition store error
    pub fn definition_store(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BeanDefinitionStore {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Attach a cause to a creation or property access error.
    ///
    /// Other variants are returned unchanged.
    pub fn with_source(mut self, cause: impl Into<BoxError>) -> Self {
        match &mut self {
            Self::BeanCreation { source, .. } | Self::PropertyAccess { source, .. } => {
                *source = Some(cause.into());
            }
            _ => {}
        }
        self
    }

    pub fn is_bean_creation(&self) -> bool {
        matches!(self, Self::BeanCreation { .. })
    }

    pub fn is_unsatisfied_dependency(&self) -> bool {
        matches!(self, Self::UnsatisfiedDependency { .. })
    }

    pub fn is_circular_depends_on(&self) -> bool {
        matches!(self, Self::CircularDependsOn { .. })
    }

    pub fn is_property_access(&self) -> bool {
        matches!(self, Self::PropertyAccess { .. } | Self::PropertyBatchUpdate { .. })
    }

    pub fn is_no_such_bean(&self) -> bool {
        matches!(self, Self::NoSuchBeanDefinition { .. })
    }

    /// Bean name carried by creation-related variants
    pub fn bean_name(&self) -> Option<&str> {
        match self {
            Self::BeanCreation { bean_name, .. }
            | Self::UnsatisfiedDependency { bean_name, .. }
            | Self::CircularDependsOn { bean_name, .. }
            | Self::BeanCurrentlyInCreation { bean_name } => Some(bean_name),
            Self::NoSuchBeanDefinition { name } | Self::BeanNotOfRequiredType { name, .. } => {
                Some(name)
            }
            _ => None,
        }
    }

    /// Walk the cause chain and return the first `BeansError` matching `predicate`,
    /// starting with `self`.
    pub fn find_cause<F>(&self, predicate: F) -> Option<&BeansError>
    where
        F: Fn(&BeansError) -> bool,
    {
        let mut current: Option<&(dyn std::error::Error + 'static)> = Some(self);
        while let Some(err) = current {
            if let Some(beans_err) = err.downcast_ref::<BeansError>() {
                if predicate(beans_err) {
                    return Some(beans_err);
                }
            }
            current = err.source();
        }
        None
    }

    /// Innermost `BeansError` of the cause chain
    pub fn root_cause(&self) -> &BeansError {
        let mut root = self;
        let mut current: Option<&(dyn std::error::Error + 'static)> = Some(self);
        while let Some(err) = current {
            if let Some(beans_err) = err.downcast_ref::<BeansError>() {
                root = beans_err;
            }
            current = err.source();
        }
        root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_cause_walks_nested_creation_errors() {
        let inner = BeansError::unsatisfied_dependency("b", "property 'a'", "A", "none found");
        let middle = BeansError::bean_creation("b", "test", "wiring failed").with_source(inner);
        let outer = BeansError::bean_creation("a", "test", "wiring failed").with_source(middle);

        assert!(outer.is_bean_creation());
        assert!(outer.root_cause().is_unsatisfied_dependency());
        assert_eq!(outer.root_cause().bean_name(), Some("b"));

        let creation_b = outer
            .find_cause(|e| e.is_bean_creation() && e.bean_name() == Some("b"))
            .expect("nested creation error");
        assert!(creation_b.to_string().contains("Error creating bean 'b'"));
    }

    #[test]
    fn test_with_source_ignores_variants_without_cause() {
        let err = BeansError::no_such_bean("x").with_source(BeansError::no_such_bean("y"));
        assert!(err.is_no_such_bean());
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn test_batch_update_message_lists_every_failure() {
        let err = BeansError::PropertyBatchUpdate {
            errors: vec![
                BeansError::property_access("age", PropertyAccessKind::TypeMismatch, "not a number"),
                BeansError::property_access("name", PropertyAccessKind::NotWritable, "read-only"),
            ],
        };
        let message = err.to_string();
        assert!(message.starts_with("Failed to apply 2 property value(s)"));
        assert!(message.contains("Property 'age' type mismatch"));
        assert!(message.contains("Property 'name' not writable"));
    }
}
