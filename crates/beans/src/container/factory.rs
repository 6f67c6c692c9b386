use std::collections::BTreeMap;
use std::sync::Arc;

use crate::errors::BeansError;
use crate::foundation::{BeanRef, TypeInfo};

/// Read access to managed beans
pub trait BeanFactory: Send + Sync {
    /// Return the bean registered under `name` (or one of its aliases),
    /// creating it first when necessary
    fn get_bean(&self, name: &str) -> Result<BeanRef, BeansError>;

    /// Like [`get_bean`](Self::get_bean), failing when the bean is not assignable to `required_type`
    fn get_bean_of_type(&self, name: &str, required_type: &'static TypeInfo) -> Result<BeanRef, BeansError> {
        let bean = self.get_bean(name)?;
        if !required_type.is_assignable_from(bean.type_info()) {
            return Err(BeansError::BeanNotOfRequiredType {
                name: name.to_string(),
                required_type: required_type.name().to_string(),
                actual_type: bean.type_info().name().to_string(),
            });
        }
        Ok(bean)
    }

    fn contains_bean(&self, name: &str) -> bool;

    fn is_singleton(&self, name: &str) -> Result<bool, BeansError>;

    fn aliases(&self, name: &str) -> Result<Vec<String>, BeansError>;
}

/// Factory with a parent consulted for names not defined locally
pub trait HierarchicalBeanFactory: BeanFactory {
    fn parent_bean_factory(&self) -> Option<Arc<dyn BeanFactory>>;
}

/// Factory that can enumerate its definitions
pub trait ListableBeanFactory: BeanFactory {
    fn bean_definition_count(&self) -> usize;

    fn bean_definition_names(&self) -> Vec<String>;

    fn bean_names_for_type(&self, type_info: &TypeInfo) -> Vec<String>;

    fn contains_bean_definition(&self, name: &str) -> bool;

    /// Instances of every local bean assignable to `type_info`, keyed by name.
    /// Prototypes are created (and included) only when `include_prototypes` is set.
    fn beans_of_type(
        &self,
        type_info: &'static TypeInfo,
        include_prototypes: bool,
    ) -> Result<BTreeMap<String, BeanRef>, BeansError>;
}

/// Candidate lookup used by autowiring and destruction ordering
pub trait AutowireCandidateResolver {
    /// Every bean assignable to `required_type`. An empty map means no candidates.
    fn find_matching_beans(&self, required_type: &'static TypeInfo) -> Result<BTreeMap<String, BeanRef>, BeansError>;

    /// Names of beans that depend on `name`
    fn depending_bean_names(&self, name: &str) -> Vec<String>;
}
