pub mod bean_definition;
pub mod registry;
pub mod scope;

pub use bean_definition::{BeanDefinition, MergedBeanDefinition};
pub use registry::{BeanDefinitionRegistry, DefaultDefinitionRegistry};
pub use scope::{AutowireMode, DependencyCheck, Scope};
