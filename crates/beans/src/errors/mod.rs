pub mod core;

pub use self::core::{BeansError, BoxError, PropertyAccessKind};
