use std::collections::BTreeMap;
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use uuid::Uuid;

use crate::config::ContainerConfig;
use crate::container::creation::{detect_depends_on_cycle, CreationGuard};
use crate::container::factory::{
    AutowireCandidateResolver, BeanFactory, HierarchicalBeanFactory, ListableBeanFactory,
};
use crate::container::lifecycle::{BeanPostProcessor, PostProcessorChain, ProcessingPhase};
use crate::container::singletons::{DestructionReport, SingletonRegistry};
use crate::definition::{
    AutowireMode, BeanDefinition, BeanDefinitionRegistry, DefaultDefinitionRegistry, DependencyCheck,
    MergedBeanDefinition,
};
use crate::errors::BeansError;
use crate::foundation::{downcast_bean, Bean, BeanClass, BeanRef, TypeInfo};
use crate::wrapper::{BeanWrapper, ConverterRegistry, ValueConverter};

const EXISTING_BEAN_DESCRIPTION: &str = "existing bean instance";

/// Bean factory with autowiring, singleton caching and lifecycle management.
///
/// Always handled through `Arc<BeanContainer>`; factory-aware beans receive a
/// weak handle to it.
pub struct BeanContainer {
    /// Identifies this container in the per-thread in-creation set
    pub(super) id: Uuid,
    pub(super) config: ContainerConfig,
    /// Definition storage
    pub(super) registry: Arc<dyn BeanDefinitionRegistry>,
    /// Consulted for names without a local definition
    pub(super) parent: Option<Arc<BeanContainer>>,
    /// Singleton cache and destruction graph
    pub(super) singletons: SingletonRegistry,
    pub(super) post_processors: PostProcessorChain,
    /// Container-wide custom converters copied into every wrapper
    pub(super) converters: RwLock<ConverterRegistry>,
    /// Serializes conversions while custom converters are registered
    pub(super) conversion_lock: Arc<Mutex<()>>,
    pub(super) self_ref: Weak<BeanContainer>,
}

impl BeanContainer {
    /// Create an empty container with its own definition registry
    pub fn new(config: ContainerConfig) -> Arc<Self> {
        let registry = DefaultDefinitionRegistry::new().allow_overriding(config.allow_bean_definition_overriding);
        Self::with_registry(config, Arc::new(registry), None)
    }

    /// Create a container over an existing registry, optionally below a parent container
    pub fn with_registry(
        config: ContainerConfig,
        registry: Arc<dyn BeanDefinitionRegistry>,
        parent: Option<Arc<BeanContainer>>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|self_ref| Self {
            id: Uuid::new_v4(),
            config,
            registry,
            parent,
            singletons: SingletonRegistry::new(),
            post_processors: PostProcessorChain::new(),
            converters: RwLock::new(ConverterRegistry::new()),
            conversion_lock: Arc::new(Mutex::new(())),
            self_ref: self_ref.clone(),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<dyn BeanDefinitionRegistry> {
        &self.registry
    }

    pub fn parent(&self) -> Option<&Arc<BeanContainer>> {
        self.parent.as_ref()
    }

    pub fn register_bean_definition(&self, name: &str, definition: BeanDefinition) -> Result<(), BeansError> {
        self.registry.register_bean_definition(name, definition)
    }

    pub fn register_alias(&self, name: &str, alias: &str) -> Result<(), BeansError> {
        self.registry.register_alias(name, alias)
    }

    /// Register an already initialized object as a singleton.
    ///
    /// No lifecycle callbacks or post-processors are applied to it.
    pub fn register_singleton(&self, name: &str, bean: BeanRef) -> Result<(), BeansError> {
        let _creation = self.singletons.lock_creation();
        if self.singletons.contains(name) {
            return Err(BeansError::definition_store(
                name,
                format!("could not register object [{}]: there is already a singleton bound", bean.type_info()),
            ));
        }
        self.singletons.add_ready(name, bean);
        tracing::debug!("Registered singleton '{}'", name);
        Ok(())
    }

    pub fn add_bean_post_processor(&self, processor: Arc<dyn BeanPostProcessor>) {
        self.post_processors.add(processor);
    }

    pub fn bean_post_processor_count(&self) -> usize {
        self.post_processors.len()
    }

    /// Register a converter used for every property and argument of type `target`
    pub fn register_converter<C>(&self, target: &'static TypeInfo, converter: C)
    where
        C: ValueConverter + 'static,
    {
        self.converters.write().register(target, Arc::new(converter));
    }

    /// Register a converter used only for the property at `path`
    pub fn register_converter_for_path<C>(&self, target: &'static TypeInfo, path: &str, converter: C)
    where
        C: ValueConverter + 'static,
    {
        self.converters
            .write()
            .register_for_path(target, path, Arc::new(converter));
    }

    /// Typed lookup of a bean by name
    pub fn get_bean_as<T: Bean>(&self, name: &str) -> Result<Arc<T>, BeansError> {
        let bean = self.get_bean(name)?;
        let actual = bean.type_info().name().to_string();
        downcast_bean::<T>(&bean).ok_or_else(|| BeansError::BeanNotOfRequiredType {
            name: name.to_string(),
            required_type: std::any::type_name::<T>().to_string(),
            actual_type: actual,
        })
    }

    /// Build a new instance of `bean_class` outside the registry.
    ///
    /// Constructor mode resolves a constructor; other modes use the default
    /// constructor and then inject properties. Lifecycle callbacks and
    /// post-processors are not applied.
    pub fn autowire(
        &self,
        bean_class: BeanClass,
        mode: AutowireMode,
        dependency_check: DependencyCheck,
    ) -> Result<BeanRef, BeansError> {
        let name = bean_class.name();
        let merged = MergedBeanDefinition::for_autowiring(bean_class.clone(), mode, dependency_check);
        if mode == AutowireMode::Constructor {
            return self.autowire_constructor(name, &merged, &bean_class);
        }
        let bean = self.instantiate_default(name, &merged, &bean_class)?;
        self.populate_bean(name, &merged, &self.new_wrapper(bean.clone()))?;
        Ok(bean)
    }

    /// Inject the properties of an object the container did not create
    pub fn autowire_bean_properties(
        &self,
        existing: &BeanRef,
        mode: AutowireMode,
        dependency_check: DependencyCheck,
    ) -> Result<(), BeansError> {
        if !matches!(mode, AutowireMode::ByName | AutowireMode::ByType) {
            return Err(BeansError::InvalidArgument {
                message: format!("only by-name and by-type autowiring apply to existing beans, got '{}'", mode),
            });
        }
        let type_info = existing.type_info();
        let merged = MergedBeanDefinition::for_autowiring(BeanClass::new(type_info), mode, dependency_check);
        self.populate_bean(type_info.name(), &merged, &self.new_wrapper(existing.clone()))
    }

    pub fn apply_bean_post_processors_before_initialization(
        &self,
        bean: BeanRef,
        name: &str,
    ) -> Result<BeanRef, BeansError> {
        self.post_processors
            .apply(ProcessingPhase::BeforeInitialization, bean, name, EXISTING_BEAN_DESCRIPTION)
    }

    pub fn apply_bean_post_processors_after_initialization(
        &self,
        bean: BeanRef,
        name: &str,
    ) -> Result<BeanRef, BeansError> {
        self.post_processors
            .apply(ProcessingPhase::AfterInitialization, bean, name, EXISTING_BEAN_DESCRIPTION)
    }

    /// Create every non-abstract, non-lazy singleton in registration order
    pub fn pre_instantiate_singletons(&self) -> Result<(), BeansError> {
        tracing::debug!("Pre-instantiating singletons in container '{}'", self.config.name);
        for name in self.registry.bean_definition_names() {
            let merged = self.registry.merged_bean_definition(&name)?;
            if !merged.is_abstract() && merged.is_singleton() && !merged.is_lazy_init(self.config.default_lazy_init) {
                self.get_bean(&name)?;
            }
        }
        Ok(())
    }

    /// Destroy all cached singletons, dependents first. Never fails fast;
    /// failed destroy callbacks are listed in the report.
    pub fn destroy_singletons(&self) -> DestructionReport {
        tracing::info!("Destroying singletons in container '{}'", self.config.name);
        self.singletons.destroy_singletons()
    }

    pub fn singleton_count(&self) -> usize {
        self.singletons.len()
    }

    fn do_get_bean(&self, name: &str) -> Result<BeanRef, BeansError> {
        let bean_name = self.registry.canonical_name(name);
        if let Some(bean) = self.singletons.get_ready(&bean_name) {
            return Ok(bean);
        }

        if !self.registry.contains_bean_definition(&bean_name) {
            return match &self.parent {
                Some(parent) => parent.get_bean(name),
                None => Err(BeansError::no_such_bean(name)),
            };
        }

        let merged = self.registry.merged_bean_definition(&bean_name)?;
        if merged.is_abstract() {
            return Err(BeansError::bean_creation(
                &bean_name,
                merged.resource_description(),
                "Bean definition is abstract",
            ));
        }

        if !merged.is_singleton() {
            return self.create_bean(&bean_name, &merged);
        }

        let _creation = self.singletons.lock_creation();
        if let Some(entry) = self.singletons.get(&bean_name) {
            if !entry.is_ready() {
                tracing::debug!(
                    "Returning eagerly cached instance of singleton bean '{}' that is not fully initialized yet",
                    bean_name
                );
            }
            return Ok(entry.bean().clone());
        }
        self.create_bean(&bean_name, &merged)
    }

    /// Build one bean: depends-on gating, instantiation, injection and initialization
    fn create_bean(&self, name: &str, merged: &MergedBeanDefinition) -> Result<BeanRef, BeansError> {
        tracing::debug!("Creating instance of bean '{}' with merged definition [{}]", name, merged);

        detect_depends_on_cycle(name, |bean| {
            self.registry
                .merged_bean_definition(bean)
                .map(|m| m.depends_on().iter().map(|d| self.registry.canonical_name(d)).collect())
                .unwrap_or_default()
        })?;

        let _guard = CreationGuard::enter(self.id, name).map_err(|e| self.creation_failure(name, merged, e))?;

        for dependency in merged.depends_on() {
            self.get_bean(dependency)?;
            self.singletons
                .register_dependent(&self.registry.canonical_name(dependency), name);
        }

        match self.build_bean(name, merged) {
            Ok(bean) => {
                if merged.is_singleton() {
                    self.singletons.add_ready(name, bean.clone());
                }
                Ok(bean)
            }
            Err(e) => {
                if merged.is_singleton() && self.singletons.evict(name).is_some() {
                    tracing::debug!("Evicted partially created singleton '{}'", name);
                }
                Err(self.creation_failure(name, merged, e))
            }
        }
    }

    fn build_bean(&self, name: &str, merged: &MergedBeanDefinition) -> Result<BeanRef, BeansError> {
        let bean_class = merged.bean_class().ok_or_else(|| {
            BeansError::bean_creation(name, merged.resource_description(), "Bean definition has no bean class")
        })?;

        let bean = if merged.autowire_mode() == AutowireMode::Constructor || merged.has_constructor_argument_values() {
            self.autowire_constructor(name, merged, bean_class)?
        } else {
            self.instantiate_default(name, merged, bean_class)?
        };

        if merged.is_singleton() && self.config.allow_circular_references {
            tracing::debug!("Eagerly caching bean '{}' to allow for resolving potential circular references", name);
            self.singletons.add_raw(name, bean.clone());
        }

        self.populate_bean(name, merged, &self.new_wrapper(bean.clone()))?;
        self.initialize_bean(name, merged, bean)
    }

    pub(super) fn instantiate_default(
        &self,
        name: &str,
        merged: &MergedBeanDefinition,
        bean_class: &BeanClass,
    ) -> Result<BeanRef, BeansError> {
        let constructor = bean_class.default_constructor().ok_or_else(|| {
            BeansError::bean_creation(
                name,
                merged.resource_description(),
                format!("No default constructor found for [{}]", bean_class.name()),
            )
        })?;
        constructor.instantiate(&[]).map_err(|e| {
            BeansError::bean_creation(name, merged.resource_description(), "Instantiation of bean failed").with_source(e)
        })
    }

    /// Awareness callbacks, then before-init processors, the init hook and after-init processors
    fn initialize_bean(&self, name: &str, merged: &MergedBeanDefinition, bean: BeanRef) -> Result<BeanRef, BeansError> {
        let resource = merged.resource_description();

        if let Some(aware) = bean.as_name_aware() {
            tracing::debug!("Invoking set_bean_name() on bean '{}'", name);
            aware.set_bean_name(name);
        }

        if let Some(aware) = bean.as_factory_aware() {
            tracing::debug!("Invoking set_bean_factory() on bean '{}'", name);
            let factory: Weak<dyn BeanFactory> = self.self_ref.clone();
            aware.set_bean_factory(factory).map_err(|e| {
                BeansError::bean_creation(name, resource, "Initialization of bean failed").with_source(e)
            })?;
        }

        let bean = self
            .post_processors
            .apply(ProcessingPhase::BeforeInitialization, bean, name, resource)?;

        if let Some(initializing) = bean.as_initializing() {
            tracing::debug!("Invoking after_properties_set() on bean '{}'", name);
            initializing.after_properties_set().map_err(|e| {
                BeansError::bean_creation(name, resource, "Initialization of bean failed").with_source(e)
            })?;
        }

        self.post_processors
            .apply(ProcessingPhase::AfterInitialization, bean, name, resource)
    }

    /// Wrapper for one construction attempt, sharing the container's converters
    pub(super) fn new_wrapper(&self, bean: BeanRef) -> BeanWrapper {
        self.prepare_wrapper(BeanWrapper::new(bean))
    }

    pub(super) fn prepare_wrapper(&self, wrapper: BeanWrapper) -> BeanWrapper {
        let converters = self.converters.read();
        if converters.is_empty() {
            return wrapper;
        }
        wrapper
            .with_converters(&converters)
            .with_conversion_lock(self.conversion_lock.clone())
    }

    /// Wrap `error` into one creation error for `name`, unless it already is one
    fn creation_failure(&self, name: &str, merged: &MergedBeanDefinition, error: BeansError) -> BeansError {
        if let BeansError::BeanCreation { bean_name, .. } = &error {
            if bean_name == name {
                return error;
            }
        }
        let message = match &error {
            BeansError::UnsatisfiedDependency { .. } => "Unsatisfied dependency",
            BeansError::PropertyAccess { .. } | BeansError::PropertyBatchUpdate { .. } => {
                "Error setting property values"
            }
            BeansError::BeanCurrentlyInCreation { .. } => "Requested bean is currently in creation",
            _ => "Initialization of bean failed",
        };
        BeansError::bean_creation(name, merged.resource_description(), message).with_source(error)
    }
}

impl BeanFactory for BeanContainer {
    fn get_bean(&self, name: &str) -> Result<BeanRef, BeansError> {
        self.do_get_bean(name)
    }

    fn contains_bean(&self, name: &str) -> bool {
        let bean_name = self.registry.canonical_name(name);
        self.singletons.contains(&bean_name)
            || self.registry.contains_bean_definition(&bean_name)
            || self.parent.as_ref().is_some_and(|parent| parent.contains_bean(name))
    }

    fn is_singleton(&self, name: &str) -> Result<bool, BeansError> {
        let bean_name = self.registry.canonical_name(name);
        if self.registry.contains_bean_definition(&bean_name) {
            return Ok(self.registry.merged_bean_definition(&bean_name)?.is_singleton());
        }
        if self.singletons.contains(&bean_name) {
            return Ok(true);
        }
        match &self.parent {
            Some(parent) => parent.is_singleton(name),
            None => Err(BeansError::no_such_bean(name)),
        }
    }

    fn aliases(&self, name: &str) -> Result<Vec<String>, BeansError> {
        let bean_name = self.registry.canonical_name(name);
        if self.registry.contains_bean_definition(&bean_name) || self.singletons.contains(&bean_name) {
            let mut aliases = self.registry.aliases(&bean_name);
            if bean_name != name {
                aliases.retain(|alias| alias != name);
                aliases.push(bean_name);
                aliases.sort();
            }
            return Ok(aliases);
        }
        match &self.parent {
            Some(parent) => parent.aliases(name),
            None => Err(BeansError::no_such_bean(name)),
        }
    }
}

impl HierarchicalBeanFactory for BeanContainer {
    fn parent_bean_factory(&self) -> Option<Arc<dyn BeanFactory>> {
        self.parent
            .as_ref()
            .map(|parent| parent.clone() as Arc<dyn BeanFactory>)
    }
}

impl ListableBeanFactory for BeanContainer {
    fn bean_definition_count(&self) -> usize {
        self.registry.bean_definition_count()
    }

    fn bean_definition_names(&self) -> Vec<String> {
        self.registry.bean_definition_names()
    }

    fn bean_names_for_type(&self, type_info: &TypeInfo) -> Vec<String> {
        self.registry.bean_names_for_type(type_info)
    }

    fn contains_bean_definition(&self, name: &str) -> bool {
        self.registry.contains_bean_definition(name)
    }

    fn beans_of_type(
        &self,
        type_info: &'static TypeInfo,
        include_prototypes: bool,
    ) -> Result<BTreeMap<String, BeanRef>, BeansError> {
        let mut result = BTreeMap::new();

        for name in self.registry.bean_names_for_type(type_info) {
            let merged = self.registry.merged_bean_definition(&name)?;
            if !include_prototypes && !merged.is_singleton() {
                continue;
            }
            let bean = self.get_bean(&name)?;
            result.insert(name, bean);
        }

        // manually registered singletons have no definition
        for name in self.singletons.names() {
            if result.contains_key(&name) || self.registry.contains_bean_definition(&name) {
                continue;
            }
            if let Some(entry) = self.singletons.get(&name) {
                if type_info.is_assignable_from(entry.bean().type_info()) {
                    result.insert(name, entry.bean().clone());
                }
            }
        }

        Ok(result)
    }
}

impl AutowireCandidateResolver for BeanContainer {
    fn find_matching_beans(&self, required_type: &'static TypeInfo) -> Result<BTreeMap<String, BeanRef>, BeansError> {
        self.beans_of_type(required_type, true)
    }

    fn depending_bean_names(&self, name: &str) -> Vec<String> {
        self.singletons.dependents_of(&self.registry.canonical_name(name))
    }
}

impl std::fmt::Debug for BeanContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeanContainer")
            .field("id", &self.id)
            .field("name", &self.config.name)
            .field("definitions", &self.registry.bean_definition_count())
            .field("singletons", &self.singletons.len())
            .field("post_processors", &self.post_processors.len())
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}
