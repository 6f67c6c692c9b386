pub mod bean_wrapper;
pub mod converter;
pub mod weight;

pub use bean_wrapper::{BeanWrapper, NESTED_PROPERTY_SEPARATOR};
pub use converter::{default_convert, ConverterRegistry, ValueConverter};
pub use weight::{type_difference_weight, TypeDifferenceCache};
