use crate::container::bean_container::BeanContainer;
use crate::container::factory::{AutowireCandidateResolver, BeanFactory};
use crate::definition::{AutowireMode, DependencyCheck, MergedBeanDefinition};
use crate::errors::BeansError;
use crate::foundation::{PropertyDescriptor, Value};
use crate::values::PropertyValues;
use crate::wrapper::BeanWrapper;

impl BeanContainer {
    /// Inject declared and autowired property values into the wrapped bean
    pub(super) fn populate_bean(
        &self,
        name: &str,
        merged: &MergedBeanDefinition,
        wrapper: &BeanWrapper,
    ) -> Result<(), BeansError> {
        let mut pvs = PropertyValues::new();
        for pv in merged.property_values() {
            let context = format!("bean property '{}'", pv.name());
            let resolved = self.resolve_value(name, merged, &context, pv.value())?;
            pvs.add(pv.with_value(resolved));
        }

        match merged.autowire_mode() {
            AutowireMode::ByName => self.autowire_by_name(name, wrapper, &mut pvs)?,
            AutowireMode::ByType => self.autowire_by_type(name, wrapper, &mut pvs)?,
            AutowireMode::No | AutowireMode::Constructor => {}
        }

        self.check_dependencies(name, merged.dependency_check(), wrapper, &pvs)?;
        wrapper.set_property_values(&pvs, false)
    }

    /// Replace bean references with the beans they name; lists are resolved element-wise
    pub(super) fn resolve_value(
        &self,
        name: &str,
        merged: &MergedBeanDefinition,
        context: &str,
        value: &Value,
    ) -> Result<Value, BeansError> {
        match value {
            Value::Ref(target) => {
                let bean = self.get_bean(target).map_err(|e| {
                    BeansError::bean_creation(
                        name,
                        merged.resource_description(),
                        format!("Can't resolve reference to bean '{}' while setting {}", target, context),
                    )
                    .with_source(e)
                })?;
                self.singletons
                    .register_dependent(&self.registry.canonical_name(target), name);
                Ok(Value::Bean(bean))
            }
            Value::List(items) => items
                .iter()
                .map(|item| self.resolve_value(name, merged, context, item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            other => Ok(other.clone()),
        }
    }

    fn autowire_by_name(&self, name: &str, wrapper: &BeanWrapper, pvs: &mut PropertyValues) -> Result<(), BeansError> {
        for descriptor in unsatisfied_object_properties(wrapper, pvs)? {
            let property = descriptor.name;
            if !self.contains_bean(property) {
                tracing::debug!(
                    "Not autowiring property '{}' of bean '{}' by name: no matching bean found",
                    property,
                    name
                );
                continue;
            }
            let bean = self.get_bean(property)?;
            pvs.add_value(property, Value::Bean(bean));
            self.singletons
                .register_dependent(&self.registry.canonical_name(property), name);
            tracing::info!(
                "Added autowiring by name from bean name '{}' via property '{}' to bean named '{}'",
                name,
                property,
                property
            );
        }
        Ok(())
    }

    fn autowire_by_type(&self, name: &str, wrapper: &BeanWrapper, pvs: &mut PropertyValues) -> Result<(), BeansError> {
        for descriptor in unsatisfied_object_properties(wrapper, pvs)? {
            let required = descriptor.property_type;
            let matching = self.find_matching_beans(required)?;
            if matching.len() != 1 {
                return Err(BeansError::unsatisfied_dependency(
                    name,
                    format!("bean property '{}'", descriptor.name),
                    required.name(),
                    format!(
                        "There are {} beans of type [{}] for autowire by type. There should have been 1 to be able to autowire property '{}' of bean '{}'.",
                        matching.len(),
                        required,
                        descriptor.name,
                        name
                    ),
                ));
            }

            if let Some((candidate, bean)) = matching.into_iter().next() {
                pvs.add_value(descriptor.name, Value::Bean(bean));
                self.singletons.register_dependent(&candidate, name);
                tracing::info!(
                    "Autowiring by type from bean name '{}' via property '{}' to bean named '{}'",
                    name,
                    descriptor.name,
                    candidate
                );
            }
        }
        Ok(())
    }

    /// Every writable property in the checked category must have a value
    fn check_dependencies(
        &self,
        name: &str,
        check: DependencyCheck,
        wrapper: &BeanWrapper,
        pvs: &PropertyValues,
    ) -> Result<(), BeansError> {
        if check == DependencyCheck::None {
            return Ok(());
        }

        for descriptor in wrapper.property_descriptors()? {
            if descriptor.writable && !pvs.contains(descriptor.name) && check.covers(descriptor.property_type.is_simple()) {
                return Err(BeansError::unsatisfied_dependency(
                    name,
                    format!("bean property '{}'", descriptor.name),
                    descriptor.property_type.name(),
                    format!(
                        "Set this property value or disable dependency checking for this bean (dependency check '{}')",
                        check
                    ),
                ));
            }
        }
        Ok(())
    }
}

/// Writable, object-typed properties without a declared value
fn unsatisfied_object_properties(
    wrapper: &BeanWrapper,
    pvs: &PropertyValues,
) -> Result<Vec<&'static PropertyDescriptor>, BeansError> {
    Ok(wrapper
        .property_descriptors()?
        .iter()
        .filter(|d| d.writable && !d.property_type.is_simple() && !pvs.contains(d.name))
        .collect())
}
