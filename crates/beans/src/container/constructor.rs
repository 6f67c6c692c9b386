use std::collections::HashSet;

use crate::container::bean_container::BeanContainer;
use crate::container::factory::AutowireCandidateResolver;
use crate::definition::{AutowireMode, MergedBeanDefinition};
use crate::errors::BeansError;
use crate::foundation::{BeanClass, BeanRef, ConstructorDescriptor, Value};
use crate::values::ConstructorArgumentValues;
use crate::wrapper::BeanWrapper;

/// A constructor whose every parameter could be satisfied
struct Candidate<'c> {
    constructor: &'c ConstructorDescriptor,
    args: Vec<Value>,
    /// Beans obtained by constructor autowiring, for the dependency graph
    autowired: Vec<String>,
    weight: u32,
}

impl BeanContainer {
    /// Select a constructor for `bean_class` and instantiate it.
    ///
    /// Candidates are tried from the most parameters to the fewest. A
    /// candidate that cannot be satisfied is skipped, unless it is the last
    /// one and none was chosen, in which case its error is returned. Among
    /// satisfiable candidates the lowest type-difference weight wins; ties
    /// keep the earlier candidate.
    pub(super) fn autowire_constructor(
        &self,
        name: &str,
        merged: &MergedBeanDefinition,
        bean_class: &BeanClass,
    ) -> Result<BeanRef, BeansError> {
        let declared = merged.constructor_args();
        let resolved = self.resolve_constructor_arguments(name, merged, declared)?;
        let min_args = declared.min_argument_count();

        let mut constructors: Vec<&ConstructorDescriptor> = bean_class.constructors().iter().collect();
        constructors.sort_by(|a, b| b.parameter_count().cmp(&a.parameter_count()));

        let wrapper = self.prepare_wrapper(BeanWrapper::unbound());
        let mut chosen: Option<Candidate<'_>> = None;
        let last = constructors.len().saturating_sub(1);

        for (i, constructor) in constructors.into_iter().enumerate() {
            match self.try_candidate(name, merged, constructor, &resolved, min_args, &wrapper) {
                Ok(Some(candidate)) => {
                    if chosen.as_ref().map_or(true, |best| candidate.weight < best.weight) {
                        chosen = Some(candidate);
                    }
                }
                Ok(None) => {
                    tracing::debug!(
                        "Ignoring constructor [{}] of bean '{}': arguments not assignable to parameter types",
                        constructor.signature(bean_class.type_info()),
                        name
                    );
                }
                Err(e) => {
                    tracing::debug!(
                        "Ignoring constructor [{}] of bean '{}': could not satisfy dependencies. Detail: {}",
                        constructor.signature(bean_class.type_info()),
                        name,
                        e
                    );
                    if i == last && chosen.is_none() {
                        return Err(e);
                    }
                }
            }
        }

        let Some(candidate) = chosen else {
            return Err(BeansError::bean_creation(
                name,
                merged.resource_description(),
                "Could not resolve matching constructor",
            ));
        };

        let bean = candidate.constructor.instantiate(&candidate.args).map_err(|e| {
            BeansError::bean_creation(name, merged.resource_description(), "Instantiation of bean failed").with_source(e)
        })?;
        for dependency in &candidate.autowired {
            self.singletons.register_dependent(dependency, name);
        }
        tracing::info!(
            "Bean '{}' instantiated via constructor [{}]",
            name,
            candidate.constructor.signature(bean_class.type_info())
        );
        Ok(bean)
    }

    /// Resolve bean references in the declared arguments, keeping indices and type hints
    fn resolve_constructor_arguments(
        &self,
        name: &str,
        merged: &MergedBeanDefinition,
        declared: &ConstructorArgumentValues,
    ) -> Result<ConstructorArgumentValues, BeansError> {
        let mut resolved = ConstructorArgumentValues::new();
        for (index, holder) in declared.indexed() {
            let context = format!("constructor argument with index {}", index);
            let value = self.resolve_value(name, merged, &context, holder.value())?;
            resolved.add_indexed(*index, holder.with_value(value));
        }
        for holder in declared.generic() {
            let value = self.resolve_value(name, merged, "constructor argument", holder.value())?;
            resolved.add_generic(holder.with_value(value));
        }
        Ok(resolved)
    }

    /// Build the argument list for one constructor.
    ///
    /// `Ok(None)` means every parameter was satisfied but some argument is not
    /// assignable, so the candidate has no finite weight.
    fn try_candidate<'c>(
        &self,
        name: &str,
        merged: &MergedBeanDefinition,
        constructor: &'c ConstructorDescriptor,
        resolved: &ConstructorArgumentValues,
        min_args: usize,
        wrapper: &BeanWrapper,
    ) -> Result<Option<Candidate<'c>>, BeansError> {
        if constructor.parameter_count() < min_args {
            return Err(BeansError::bean_creation(
                name,
                merged.resource_description(),
                format!(
                    "{} constructor arguments specified but no matching constructor found in bean '{}' (hint: specify index arguments for simple parameters to avoid type ambiguities)",
                    min_args, name
                ),
            ));
        }

        let mut used = HashSet::new();
        let mut args = Vec::with_capacity(constructor.parameter_count());
        let mut autowired = Vec::new();

        for (index, &parameter_type) in constructor.parameter_types().iter().enumerate() {
            if let Some((slot, holder)) = resolved.argument_value(index, parameter_type, &used) {
                used.insert(slot);
                args.push(wrapper.convert_if_necessary(holder.value().clone(), parameter_type, None)?);
                continue;
            }

            let injection_point = format!("constructor argument with index {}", index);
            if merged.autowire_mode() != AutowireMode::Constructor {
                return Err(BeansError::unsatisfied_dependency(
                    name,
                    injection_point,
                    parameter_type.name(),
                    "Did you specify the correct bean references as generic constructor arguments?",
                ));
            }

            let matching = self.find_matching_beans(parameter_type)?;
            if matching.len() != 1 {
                return Err(BeansError::unsatisfied_dependency(
                    name,
                    injection_point,
                    parameter_type.name(),
                    format!(
                        "There are {} beans of type [{}] for autowiring constructor. There should have been 1 to be able to autowire constructor of bean '{}'.",
                        matching.len(),
                        parameter_type,
                        name
                    ),
                ));
            }
            if let Some((candidate, bean)) = matching.into_iter().next() {
                tracing::info!(
                    "Autowiring by type from bean name '{}' via constructor to bean named '{}'",
                    name,
                    candidate
                );
                autowired.push(candidate);
                args.push(Value::Bean(bean));
            }
        }

        Ok(wrapper
            .type_difference_weight(constructor.parameter_types(), &args)
            .map(|weight| Candidate {
                constructor,
                args,
                autowired,
                weight,
            }))
    }
}
