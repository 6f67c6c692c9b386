pub mod constructor_args;
pub mod property_value;
pub mod property_values;

pub use constructor_args::{ArgumentSlot, ConstructorArgumentValues, ValueHolder};
pub use property_value::PropertyValue;
pub use property_values::PropertyValues;
