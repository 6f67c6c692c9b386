use std::fmt;
use std::sync::Arc;

use crate::foundation::traits::{Bean, BeanRef};
use crate::foundation::type_info::{builtin, TypeInfo};

/// Dynamically typed property or constructor argument value
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    /// Reference to another bean by name, resolved by the container
    Ref(String),
    /// A live bean instance
    Bean(BeanRef),
}

impl Value {
    /// Reference to the bean registered under `name`
    pub fn reference(name: impl Into<String>) -> Self {
        Value::Ref(name.into())
    }

    /// Runtime type of the value. `Null` and unresolved references have none.
    pub fn type_info(&self) -> Option<&'static TypeInfo> {
        match self {
            Value::Null | Value::Ref(_) => None,
            Value::Bool(_) => Some(&builtin::BOOL),
            Value::Int(_) => Some(&builtin::INT),
            Value::Float(_) => Some(&builtin::FLOAT),
            Value::Str(_) => Some(&builtin::STRING),
            Value::List(_) => Some(&builtin::LIST),
            Value::Bean(bean) => Some(bean.type_info()),
        }
    }

    /// Whether the value can be passed where `target` is declared without conversion
    pub fn is_assignable_to(&self, target: &TypeInfo) -> bool {
        match self {
            Value::Null => !target.is_simple(),
            Value::Ref(_) => false,
            _ => self
                .type_info()
                .is_some_and(|actual| target.is_assignable_from(actual)),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_bean(&self) -> Option<&BeanRef> {
        match self {
            Value::Bean(bean) => Some(bean),
            _ => None,
        }
    }

    /// Downcast a bean value to its concrete type
    pub fn downcast_bean<T: Bean>(&self) -> Option<Arc<T>> {
        self.as_bean().and_then(crate::foundation::traits::downcast_bean::<T>)
    }

    /// Short name of the variant for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Ref(_) => "reference",
            Value::Bean(_) => "bean",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Ref(a), Value::Ref(b)) => a == b,
            (Value::Bean(a), Value::Bean(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Int(i) => f.debug_tuple("Int").field(i).finish(),
            Value::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Value::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Ref(name) => f.debug_tuple("Ref").field(name).finish(),
            Value::Bean(bean) => write!(f, "Bean({}@{:p})", bean.type_info(), Arc::as_ptr(bean)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => f.write_str(s),
            Value::List(items) => {
                let rendered: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
            Value::Ref(name) => write!(f, "<ref {}>", name),
            Value::Bean(bean) => write!(f, "<bean {}>", bean.type_info()),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<BeanRef> for Value {
    fn from(value: BeanRef) -> Self {
        Value::Bean(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
