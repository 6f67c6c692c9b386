use std::fmt;

use crate::definition::scope::{AutowireMode, DependencyCheck, Scope};
use crate::errors::BeansError;
use crate::foundation::{BeanClass, Value};
use crate::values::{ConstructorArgumentValues, PropertyValues, ValueHolder};

const DEFAULT_RESOURCE_DESCRIPTION: &str = "programmatic registration";

/// Declarative recipe for one bean.
///
/// Attributes left unset are inherited from the parent definition when
/// `parent_name` is given, otherwise they take their defaults when merged.
#[derive(Debug, Clone, Default)]
pub struct BeanDefinition {
    bean_class: Option<BeanClass>,
    parent_name: Option<String>,
    scope: Option<Scope>,
    autowire_mode: Option<AutowireMode>,
    dependency_check: Option<DependencyCheck>,
    lazy_init: Option<bool>,
    is_abstract: bool,
    depends_on: Vec<String>,
    constructor_args: ConstructorArgumentValues,
    property_values: PropertyValues,
    resource_description: Option<String>,
}

impl BeanDefinition {
    pub fn new(bean_class: BeanClass) -> Self {
        Self {
            bean_class: Some(bean_class),
            ..Self::default()
        }
    }

    /// Definition inheriting everything it does not set from `parent_name`
    pub fn child(parent_name: impl Into<String>) -> Self {
        Self {
            parent_name: Some(parent_name.into()),
            ..Self::default()
        }
    }

    pub fn with_class(mut self, bean_class: BeanClass) -> Self {
        self.bean_class = Some(bean_class);
        self
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn prototype(self) -> Self {
        self.with_scope(Scope::Prototype)
    }

    pub fn with_autowire(mut self, mode: AutowireMode) -> Self {
        self.autowire_mode = Some(mode);
        self
    }

    pub fn with_dependency_check(mut self, check: DependencyCheck) -> Self {
        self.dependency_check = Some(check);
        self
    }

    pub fn lazy(mut self, lazy_init: bool) -> Self {
        self.lazy_init = Some(lazy_init);
        self
    }

    /// Template definition; never instantiated itself
    pub fn abstract_definition(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn depends_on(mut self, name: impl Into<String>) -> Self {
        self.depends_on.push(name.into());
        self
    }

    pub fn with_constructor_arg(mut self, index: usize, value: impl Into<Value>) -> Self {
        self.constructor_args.add_indexed(index, ValueHolder::new(value));
        self
    }

    pub fn with_typed_constructor_arg(
        mut self,
        index: usize,
        value: impl Into<Value>,
        type_hint: impl Into<String>,
    ) -> Self {
        self.constructor_args
            .add_indexed(index, ValueHolder::typed(value, type_hint));
        self
    }

    pub fn with_generic_arg(mut self, value: impl Into<Value>) -> Self {
        self.constructor_args.add_generic(ValueHolder::new(value));
        self
    }

    pub fn with_constructor_args(mut self, args: ConstructorArgumentValues) -> Self {
        self.constructor_args = args;
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.property_values.add_value(name, value);
        self
    }

    pub fn with_property_values(mut self, values: PropertyValues) -> Self {
        self.property_values = values;
        self
    }

    pub fn with_resource_description(mut self, description: impl Into<String>) -> Self {
        self.resource_description = Some(description.into());
        self
    }

    pub fn bean_class(&self) -> Option<&BeanClass> {
        self.bean_class.as_ref()
    }

    pub fn parent_name(&self) -> Option<&str> {
        self.parent_name.as_deref()
    }

    pub fn scope(&self) -> Option<Scope> {
        self.scope
    }

    pub fn autowire_mode(&self) -> Option<AutowireMode> {
        self.autowire_mode
    }

    pub fn dependency_check(&self) -> Option<DependencyCheck> {
        self.dependency_check
    }

    pub fn lazy_init(&self) -> Option<bool> {
        self.lazy_init
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    pub fn depends_on_names(&self) -> &[String] {
        &self.depends_on
    }

    pub fn constructor_args(&self) -> &ConstructorArgumentValues {
        &self.constructor_args
    }

    pub fn property_values(&self) -> &PropertyValues {
        &self.property_values
    }

    pub fn resource_description(&self) -> &str {
        self.resource_description
            .as_deref()
            .unwrap_or(DEFAULT_RESOURCE_DESCRIPTION)
    }

    /// Structural checks performed on registration
    pub fn validate(&self, name: &str) -> Result<(), BeansError> {
        if self.bean_class.is_none() && self.parent_name.is_none() && !self.is_abstract {
            return Err(BeansError::definition_store(
                name,
                "either a bean class or a parent definition is required",
            ));
        }
        if self.depends_on.iter().any(|d| d == name) {
            return Err(BeansError::CircularDependsOn {
                bean_name: name.to_string(),
                chain: format!("{} -> {}", name, name),
            });
        }
        Ok(())
    }
}

/// A definition with its parent chain resolved and defaults applied
#[derive(Debug, Clone)]
pub struct MergedBeanDefinition {
    bean_class: Option<BeanClass>,
    scope: Scope,
    autowire_mode: AutowireMode,
    dependency_check: DependencyCheck,
    lazy_init: Option<bool>,
    is_abstract: bool,
    depends_on: Vec<String>,
    constructor_args: ConstructorArgumentValues,
    property_values: PropertyValues,
    resource_description: String,
}

impl MergedBeanDefinition {
    /// Resolve a definition that has no parent
    pub fn root(definition: &BeanDefinition) -> Self {
        Self {
            bean_class: definition.bean_class.clone(),
            scope: definition.scope.unwrap_or_default(),
            autowire_mode: definition.autowire_mode.unwrap_or_default(),
            dependency_check: definition.dependency_check.unwrap_or_default(),
            lazy_init: definition.lazy_init,
            is_abstract: definition.is_abstract,
            depends_on: definition.depends_on.clone(),
            constructor_args: definition.constructor_args.clone(),
            property_values: definition.property_values.clone(),
            resource_description: definition.resource_description().to_string(),
        }
    }

    /// Overlay `child` on this (already merged) parent
    pub fn overlay(&self, child: &BeanDefinition) -> Self {
        let mut depends_on = self.depends_on.clone();
        for name in &child.depends_on {
            if !depends_on.contains(name) {
                depends_on.push(name.clone());
            }
        }

        Self {
            bean_class: child.bean_class.clone().or_else(|| self.bean_class.clone()),
            scope: child.scope.unwrap_or(self.scope),
            autowire_mode: child.autowire_mode.unwrap_or(self.autowire_mode),
            dependency_check: child.dependency_check.unwrap_or(self.dependency_check),
            lazy_init: child.lazy_init.or(self.lazy_init),
            is_abstract: child.is_abstract,
            depends_on,
            constructor_args: self.constructor_args.merged_with(&child.constructor_args),
            property_values: self.property_values.merged_with(&child.property_values),
            resource_description: child.resource_description().to_string(),
        }
    }

    /// Definition used for autowiring an existing object or class outside the registry
    pub fn for_autowiring(bean_class: BeanClass, mode: AutowireMode, check: DependencyCheck) -> Self {
        Self::root(
            &BeanDefinition::new(bean_class)
                .with_autowire(mode)
                .with_dependency_check(check)
                .with_scope(Scope::Prototype),
        )
    }

    pub fn bean_class(&self) -> Option<&BeanClass> {
        self.bean_class.as_ref()
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn is_singleton(&self) -> bool {
        self.scope.is_singleton()
    }

    pub fn autowire_mode(&self) -> AutowireMode {
        self.autowire_mode
    }

    pub fn dependency_check(&self) -> DependencyCheck {
        self.dependency_check
    }

    /// Lazy-init flag, `default` when no definition in the chain set one
    pub fn is_lazy_init(&self, default: bool) -> bool {
        self.lazy_init.unwrap_or(default)
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    pub fn depends_on(&self) -> &[String] {
        &self.depends_on
    }

    pub fn constructor_args(&self) -> &ConstructorArgumentValues {
        &self.constructor_args
    }

    pub fn has_constructor_argument_values(&self) -> bool {
        !self.constructor_args.is_empty()
    }

    pub fn property_values(&self) -> &PropertyValues {
        &self.property_values
    }

    pub fn resource_description(&self) -> &str {
        &self.resource_description
    }
}

impl fmt::Display for MergedBeanDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "class [{}]; scope={}; abstract={}; autowire={}; dependencyCheck={}; defined in {}",
            self.bean_class.as_ref().map_or("<none>", |c| c.name()),
            self.scope,
            self.is_abstract,
            self.autowire_mode,
            self.dependency_check,
            self.resource_description
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::{DynamicBean, TypeInfo};

    static BASE: TypeInfo = TypeInfo::new("Base");
    static DERIVED: TypeInfo = TypeInfo::new("Derived").extends(&BASE);

    #[test]
    fn test_root_defaults() {
        let merged = MergedBeanDefinition::root(&BeanDefinition::new(DynamicBean::class(&BASE, &[])));
        assert_eq!(merged.scope(), Scope::Singleton);
        assert_eq!(merged.autowire_mode(), AutowireMode::No);
        assert_eq!(merged.dependency_check(), DependencyCheck::None);
        assert!(!merged.is_lazy_init(false));
        assert!(merged.is_lazy_init(true));
        assert_eq!(merged.resource_description(), DEFAULT_RESOURCE_DESCRIPTION);
    }

    #[test]
    fn test_overlay_rules() {
        let parent = BeanDefinition::new(DynamicBean::class(&BASE, &[]))
            .prototype()
            .with_autowire(AutowireMode::ByType)
            .lazy(true)
            .abstract_definition()
            .depends_on("a")
            .depends_on("b")
            .with_property("x", 1)
            .with_property("y", 2)
            .with_constructor_arg(0, "p0")
            .with_generic_arg("pg")
            .with_resource_description("parent.rs");
        let child = BeanDefinition::child("parent")
            .with_class(DynamicBean::class(&DERIVED, &[]))
            .with_dependency_check(DependencyCheck::Objects)
            .depends_on("b")
            .depends_on("c")
            .with_property("y", 20)
            .with_constructor_arg(0, "c0")
            .with_generic_arg("cg");

        let merged = MergedBeanDefinition::root(&parent).overlay(&child);
        assert_eq!(merged.bean_class().map(|c| c.name()), Some("Derived"));
        assert_eq!(merged.scope(), Scope::Prototype);
        assert_eq!(merged.autowire_mode(), AutowireMode::ByType);
        assert_eq!(merged.dependency_check(), DependencyCheck::Objects);
        assert!(merged.is_lazy_init(false));
        assert!(!merged.is_abstract());
        assert_eq!(merged.depends_on(), ["a", "b", "c"]);
        assert_eq!(merged.property_values().get("x").unwrap().value(), &Value::Int(1));
        assert_eq!(merged.property_values().get("y").unwrap().value(), &Value::Int(20));
        assert_eq!(merged.constructor_args().indexed_value(0).unwrap().value(), &Value::from("c0"));
        assert_eq!(merged.constructor_args().generic().len(), 2);
        assert_eq!(merged.resource_description(), DEFAULT_RESOURCE_DESCRIPTION);
    }

    #[test]
    fn test_validate() {
        assert!(BeanDefinition::default().validate("x").is_err());
        assert!(BeanDefinition::default().abstract_definition().validate("x").is_ok());
        assert!(BeanDefinition::child("p").validate("x").is_ok());

        let err = BeanDefinition::new(DynamicBean::class(&BASE, &[]))
            .depends_on("self")
            .validate("self")
            .unwrap_err();
        assert!(err.is_circular_depends_on());
    }
}
