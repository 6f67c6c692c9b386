pub mod class;
pub mod dynamic;
pub mod lifecycle;
pub mod traits;
pub mod type_info;
pub mod value;

pub use class::{BeanClass, ConstructorDescriptor, ConstructorFn};
pub use dynamic::DynamicBean;
pub use lifecycle::{BeanFactoryAware, BeanNameAware, DisposableBean, InitializingBean};
pub use traits::{downcast_bean, AsAny, Bean, BeanRef, PropertyDescriptor};
pub use type_info::{builtin, Ancestors, TypeInfo};
pub use value::Value;
