use std::sync::Weak;

use crate::container::factory::BeanFactory;
use crate::errors::BoxError;

/// Receives the name the bean was registered under, before property-based
/// initialization callbacks run
pub trait BeanNameAware {
    fn set_bean_name(&self, name: &str);
}

/// Receives a handle to the owning factory.
///
/// The handle is weak: beans must not keep the container alive.
pub trait BeanFactoryAware {
    fn set_bean_factory(&self, factory: Weak<dyn BeanFactory>) -> Result<(), BoxError>;
}

/// Callback invoked after all properties have been set
pub trait InitializingBean {
    fn after_properties_set(&self) -> Result<(), BoxError>;
}

/// Callback invoked when the container destroys its singletons
pub trait DisposableBean {
    fn destroy(&self) -> Result<(), BoxError>;
}

