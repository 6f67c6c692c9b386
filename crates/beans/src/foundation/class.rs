use std::fmt;
use std::sync::Arc;

use crate::errors::BoxError;
use crate::foundation::traits::BeanRef;
use crate::foundation::type_info::TypeInfo;
use crate::foundation::value::Value;

/// Instantiation callback for one constructor signature
pub type ConstructorFn = Arc<dyn Fn(&[Value]) -> Result<BeanRef, BoxError> + Send + Sync>;

/// A constructor: declared parameter types plus the function that builds the bean
#[derive(Clone)]
pub struct ConstructorDescriptor {
    parameter_types: Vec<&'static TypeInfo>,
    factory: ConstructorFn,
}

impl ConstructorDescriptor {
    pub fn new<F>(parameter_types: Vec<&'static TypeInfo>, factory: F) -> Self
    where
        F: Fn(&[Value]) -> Result<BeanRef, BoxError> + Send + Sync + 'static,
    {
        Self {
            parameter_types,
            factory: Arc::new(factory),
        }
    }

    pub fn parameter_types(&self) -> &[&'static TypeInfo] {
        &self.parameter_types
    }

    pub fn parameter_count(&self) -> usize {
        self.parameter_types.len()
    }

    /// Invoke the constructor. The caller guarantees `args.len() == parameter_count()`.
    pub fn instantiate(&self, args: &[Value]) -> Result<BeanRef, BoxError> {
        (self.factory)(args)
    }

    /// Human readable signature such as `Service(Repository, int)`
    pub fn signature(&self, owner: &TypeInfo) -> String {
        let params: Vec<&str> = self.parameter_types.iter().map(|t| t.name()).collect();
        format!("{}({})", owner.name(), params.join(", "))
    }
}

impl fmt::Debug for ConstructorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorDescriptor")
            .field(
                "parameter_types",
                &self.parameter_types.iter().map(|t| t.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Everything the container needs to instantiate a bean type
#[derive(Clone)]
pub struct BeanClass {
    type_info: &'static TypeInfo,
    constructors: Vec<ConstructorDescriptor>,
}

impl BeanClass {
    pub fn new(type_info: &'static TypeInfo) -> Self {
        Self {
            type_info,
            constructors: Vec::new(),
        }
    }

    /// Class with a single no-argument constructor
    pub fn of<F>(type_info: &'static TypeInfo, factory: F) -> Self
    where
        F: Fn() -> BeanRef + Send + Sync + 'static,
    {
        Self::new(type_info).with_default_constructor(factory)
    }

    pub fn with_constructor<F>(mut self, parameter_types: Vec<&'static TypeInfo>, factory: F) -> Self
    where
        F: Fn(&[Value]) -> Result<BeanRef, BoxError> + Send + Sync + 'static,
    {
        self.constructors
            .push(ConstructorDescriptor::new(parameter_types, factory));
        self
    }

    pub fn with_default_constructor<F>(self, factory: F) -> Self
    where
        F: Fn() -> BeanRef + Send + Sync + 'static,
    {
        self.with_constructor(Vec::new(), move |_| Ok(factory()))
    }

    pub fn type_info(&self) -> &'static TypeInfo {
        self.type_info
    }

    pub fn name(&self) -> &'static str {
        self.type_info.name()
    }

    /// Constructors in declaration order
    pub fn constructors(&self) -> &[ConstructorDescriptor] {
        &self.constructors
    }

    pub fn default_constructor(&self) -> Option<&ConstructorDescriptor> {
        self.constructors.iter().find(|c| c.parameter_count() == 0)
    }

    /// Whether any constructor takes arguments
    pub fn has_parameterized_constructor(&self) -> bool {
        self.constructors.iter().any(|c| c.parameter_count() > 0)
    }
}

impl fmt::Debug for BeanClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanClass")
            .field("type", &self.type_info.name())
            .field("constructors", &self.constructors)
            .finish()
    }
}

impl PartialEq for BeanClass {
    fn eq(&self, other: &Self) -> bool {
        self.type_info == other.type_info
    }
}
