use std::sync::Arc;

use crate::config::ContainerConfig;
use crate::container::bean_container::BeanContainer;
use crate::container::lifecycle::BeanPostProcessor;
use crate::definition::{BeanDefinition, BeanDefinitionRegistry, DefaultDefinitionRegistry};
use crate::errors::BeansError;
use crate::foundation::{BeanRef, TypeInfo};
use crate::wrapper::{ConverterRegistry, ValueConverter};

/// Builder for [`BeanContainer`] with fluent API
pub struct BeanContainerBuilder {
    config: ContainerConfig,
    definitions: Vec<(String, BeanDefinition)>,
    aliases: Vec<(String, String)>,
    singletons: Vec<(String, BeanRef)>,
    post_processors: Vec<Arc<dyn BeanPostProcessor>>,
    converters: ConverterRegistry,
    parent: Option<Arc<BeanContainer>>,
    pre_instantiate: bool,
}

impl BeanContainerBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: ContainerConfig::default(),
            definitions: Vec::new(),
            aliases: Vec::new(),
            singletons: Vec::new(),
            post_processors: Vec::new(),
            converters: ConverterRegistry::new(),
            parent: None,
            pre_instantiate: false,
        }
    }

    pub fn config(&mut self, config: ContainerConfig) -> &mut Self {
        self.config = config;
        self
    }

    /// Add a bean definition; registration order is preserved
    pub fn definition(&mut self, name: impl Into<String>, definition: BeanDefinition) -> &mut Self {
        self.definitions.push((name.into(), definition));
        self
    }

    pub fn alias(&mut self, name: impl Into<String>, alias: impl Into<String>) -> &mut Self {
        self.aliases.push((name.into(), alias.into()));
        self
    }

    /// Add a ready-made singleton
    pub fn singleton(&mut self, name: impl Into<String>, bean: BeanRef) -> &mut Self {
        self.singletons.push((name.into(), bean));
        self
    }

    pub fn post_processor(&mut self, processor: Arc<dyn BeanPostProcessor>) -> &mut Self {
        self.post_processors.push(processor);
        self
    }

    pub fn converter<C>(&mut self, target: &'static TypeInfo, converter: C) -> &mut Self
    where
        C: ValueConverter + 'static,
    {
        self.converters.register(target, Arc::new(converter));
        self
    }

    pub fn converter_for_path<C>(&mut self, target: &'static TypeInfo, path: &str, converter: C) -> &mut Self
    where
        C: ValueConverter + 'static,
    {
        self.converters.register_for_path(target, path, Arc::new(converter));
        self
    }

    /// Parent container consulted for names without a local definition.
    /// Its definitions also serve as parents for child definitions.
    pub fn parent(&mut self, parent: Arc<BeanContainer>) -> &mut Self {
        self.parent = Some(parent);
        self
    }

    /// Create eager singletons as part of `build`
    pub fn pre_instantiate_singletons(&mut self, enabled: bool) -> &mut Self {
        self.pre_instantiate = enabled;
        self
    }

    /// Build the container
    pub fn build(self) -> Result<Arc<BeanContainer>, BeansError> {
        self.config.validate()?;

        let registry = match &self.parent {
            Some(parent) => DefaultDefinitionRegistry::with_parent(parent.registry().clone()),
            None => DefaultDefinitionRegistry::new(),
        }
        .allow_overriding(self.config.allow_bean_definition_overriding);

        for (name, definition) in self.definitions {
            registry.register_bean_definition(&name, definition)?;
        }
        for (name, alias) in &self.aliases {
            registry.register_alias(name, alias)?;
        }

        let container = BeanContainer::with_registry(self.config, Arc::new(registry), self.parent);
        *container.converters.write() = self.converters;
        for processor in self.post_processors {
            container.add_bean_post_processor(processor);
        }
        for (name, bean) in self.singletons {
            container.register_singleton(&name, bean)?;
        }

        tracing::debug!(
            "Built container '{}' with {} bean definition(s)",
            container.config().name,
            container.registry().bean_definition_count()
        );

        if self.pre_instantiate {
            container.pre_instantiate_singletons()?;
        }
        Ok(container)
    }
}

impl Default for BeanContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BeanContainerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeanContainerBuilder")
            .field("config", &self.config)
            .field("definitions", &self.definitions.iter().map(|(n, _)| n).collect::<Vec<_>>())
            .field("singletons", &self.singletons.len())
            .field("post_processors", &self.post_processors.len())
            .field("converters", &self.converters.len())
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}
