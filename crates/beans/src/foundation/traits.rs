use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::errors::BoxError;
use crate::foundation::lifecycle::{BeanFactoryAware, BeanNameAware, DisposableBean, InitializingBean};
use crate::foundation::type_info::TypeInfo;
use crate::foundation::value::Value;

/// Shared handle to a managed bean
pub type BeanRef = Arc<dyn Bean>;

/// Upcasting support for downcasting trait objects back to their concrete type
pub trait AsAny: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// Metadata for one bean property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub name: &'static str,
    pub property_type: &'static TypeInfo,
    pub readable: bool,
    pub writable: bool,
}

impl PropertyDescriptor {
    /// Readable and writable property
    pub const fn new(name: &'static str, property_type: &'static TypeInfo) -> Self {
        Self {
            name,
            property_type,
            readable: true,
            writable: true,
        }
    }

    pub const fn read_only(name: &'static str, property_type: &'static TypeInfo) -> Self {
        Self {
            name,
            property_type,
            readable: true,
            writable: false,
        }
    }

    pub const fn write_only(name: &'static str, property_type: &'static TypeInfo) -> Self {
        Self {
            name,
            property_type,
            readable: false,
            writable: true,
        }
    }
}

/// An object managed by the container.
///
/// Properties are read and written through `&self` because a singleton may be
/// shared (as an early reference) before its own injection has finished, so
/// implementors keep mutable state behind interior mutability.
///
/// ```rust
/// use std::sync::Arc;
/// use parking_lot::RwLock;
/// use elif_beans::{Bean, BoxError, PropertyDescriptor, TypeInfo, Value, builtin};
///
/// static GREETER: TypeInfo = TypeInfo::new("Greeter");
/// static GREETER_PROPERTIES: [PropertyDescriptor; 1] =
///     [PropertyDescriptor::new("greeting", &builtin::STRING)];
///
/// #[derive(Default)]
/// struct Greeter {
///     greeting: RwLock<String>,
/// }
///
/// impl Bean for Greeter {
///     fn type_info(&self) -> &'static TypeInfo {
///         &GREETER
///     }
///
///     fn properties(&self) -> &'static [PropertyDescriptor] {
///         &GREETER_PROPERTIES
///     }
///
///     fn get_property(&self, name: &str) -> Result<Value, BoxError> {
///         match name {
///             "greeting" => Ok(Value::from(self.greeting.read().clone())),
///             _ => Err(format!("unknown property '{}'", name).into()),
///         }
///     }
///
///     fn set_property(&self, name: &str, value: Value) -> Result<(), BoxError> {
///         match (name, value) {
///             ("greeting", Value::Str(s)) => {
///                 *self.greeting.write() = s;
///                 Ok(())
///             }
///             (name, value) => Err(format!("cannot set '{}' to {}", name, value).into()),
///         }
///     }
/// }
///
/// let greeter = Greeter::default();
/// greeter.set_property("greeting", Value::from("hello")).unwrap();
/// assert_eq!(greeter.get_property("greeting").unwrap(), Value::from("hello"));
/// ```
pub trait Bean: AsAny {
    fn type_info(&self) -> &'static TypeInfo;

    fn properties(&self) -> &'static [PropertyDescriptor] {
        &[]
    }

    fn get_property(&self, name: &str) -> Result<Value, BoxError> {
        Err(format!("{} has no readable property '{}'", self.type_info(), name).into())
    }

    fn set_property(&self, name: &str, value: Value) -> Result<(), BoxError> {
        let _ = value;
        Err(format!("{} has no writable property '{}'", self.type_info(), name).into())
    }

    fn as_name_aware(&self) -> Option<&dyn BeanNameAware> {
        None
    }

    fn as_factory_aware(&self) -> Option<&dyn BeanFactoryAware> {
        None
    }

    fn as_initializing(&self) -> Option<&dyn InitializingBean> {
        None
    }

    fn as_disposable(&self) -> Option<&dyn DisposableBean> {
        None
    }
}

impl dyn Bean {
    /// Look up a property descriptor by name
    pub fn property(&self, name: &str) -> Option<&'static PropertyDescriptor> {
        self.properties().iter().find(|p| p.name == name)
    }

    pub fn is<T: Bean>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Bean>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

impl fmt::Debug for dyn Bean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bean")
            .field("type", &self.type_info().name())
            .field(
                "properties",
                &self.properties().iter().map(|p| p.name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Downcast a shared bean handle to its concrete type
pub fn downcast_bean<T: Bean>(bean: &BeanRef) -> Option<Arc<T>> {
    bean.clone().into_any_arc().downcast::<T>().ok()
}
