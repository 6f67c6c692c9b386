pub mod foundation;
pub mod errors;
pub mod config;
pub mod values;
pub mod wrapper;
pub mod definition;
pub mod container;

// Re-export key types for convenience
pub use foundation::{
    builtin, downcast_bean, Bean, BeanClass, BeanFactoryAware, BeanNameAware, BeanRef, ConstructorDescriptor,
    DisposableBean, DynamicBean, InitializingBean, PropertyDescriptor, TypeInfo, Value,
};
pub use errors::{BeansError, BoxError, PropertyAccessKind};
pub use config::{ConfigError, ConfigSource, ContainerConfig};
pub use values::{ConstructorArgumentValues, PropertyValue, PropertyValues, ValueHolder};
pub use wrapper::{BeanWrapper, ConverterRegistry, ValueConverter};
pub use definition::{
    AutowireMode, BeanDefinition, BeanDefinitionRegistry, DefaultDefinitionRegistry, DependencyCheck,
    MergedBeanDefinition, Scope,
};
pub use container::{
    AutowireCandidateResolver, BeanContainer, BeanContainerBuilder, BeanFactory, BeanPostProcessor,
    DestructionReport, HierarchicalBeanFactory, ListableBeanFactory,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get crate version
pub fn version() -> &'static str {
    VERSION
}
