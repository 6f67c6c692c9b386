//! Integration tests for bean creation, autowiring and lifecycle
//!
//! Exercises the container end to end through its public API: circular
//! references, depends-on gating, by-name/by-type/constructor autowiring,
//! post-processing and ordered destruction.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use elif_beans::{
    builtin, AutowireCandidateResolver, AutowireMode, Bean, BeanClass, BeanContainer,
    BeanContainerBuilder, BeanDefinition, BeanFactory, BeanFactoryAware, BeanNameAware, BeanPostProcessor,
    BeanRef, BeansError, BoxError, ContainerConfig, DependencyCheck, DisposableBean, DynamicBean,
    HierarchicalBeanFactory, InitializingBean, ListableBeanFactory, PropertyDescriptor, TypeInfo, Value,
};
use parking_lot::Mutex;

static ALPHA: TypeInfo = TypeInfo::new("Alpha");
static BETA: TypeInfo = TypeInfo::new("Beta");
static ALPHA_PROPERTIES: [PropertyDescriptor; 1] = [PropertyDescriptor::new("beta", &BETA)];
static BETA_PROPERTIES: [PropertyDescriptor; 1] = [PropertyDescriptor::new("alpha", &ALPHA)];

static REPOSITORY: TypeInfo = TypeInfo::new("Repository");
static CONSUMER: TypeInfo = TypeInfo::new("Consumer");
static CONSUMER_PROPERTIES: [PropertyDescriptor; 3] = [
    PropertyDescriptor::new("repository", &REPOSITORY),
    PropertyDescriptor::new("audit", &AUDIT),
    PropertyDescriptor::new("retries", &builtin::INT),
];
static AUDIT: TypeInfo = TypeInfo::new("Audit");

static LINK: TypeInfo = TypeInfo::new("Link");
static LINK_PROPERTIES: [PropertyDescriptor; 2] = [
    PropertyDescriptor::new("next", &LINK),
    PropertyDescriptor::new("label", &builtin::STRING),
];

fn dynamic(type_info: &'static TypeInfo, properties: &'static [PropertyDescriptor]) -> BeanDefinition {
    BeanDefinition::new(DynamicBean::class(type_info, properties))
}

fn property(bean: &BeanRef, name: &str) -> Value {
    bean.downcast_ref::<DynamicBean>()
        .expect("dynamic bean")
        .value(name)
}

fn container() -> Arc<BeanContainer> {
    BeanContainer::new(ContainerConfig::default())
}

#[test]
fn test_circular_singletons_by_type_reference_each_other() {
    let container = container();
    container
        .register_bean_definition("alpha", dynamic(&ALPHA, &ALPHA_PROPERTIES).with_autowire(AutowireMode::ByType))
        .unwrap();
    container
        .register_bean_definition("beta", dynamic(&BETA, &BETA_PROPERTIES).with_autowire(AutowireMode::ByType))
        .unwrap();

    let alpha = container.get_bean("alpha").unwrap();
    let beta = container.get_bean("beta").unwrap();

    let alpha_beta = property(&alpha, "beta");
    let beta_alpha = property(&beta, "alpha");
    assert!(Arc::ptr_eq(alpha_beta.as_bean().unwrap(), &beta));
    assert!(Arc::ptr_eq(beta_alpha.as_bean().unwrap(), &alpha));
    assert_eq!(container.singleton_count(), 2);
}

#[test]
fn test_circular_singletons_fail_when_circular_references_are_disabled() {
    let container = BeanContainer::new(ContainerConfig::strict());
    container
        .register_bean_definition("alpha", dynamic(&ALPHA, &ALPHA_PROPERTIES).with_property("beta", Value::reference("beta")))
        .unwrap();
    container
        .register_bean_definition("beta", dynamic(&BETA, &BETA_PROPERTIES).with_property("alpha", Value::reference("alpha")))
        .unwrap();

    let err = container.get_bean("alpha").unwrap_err();
    assert!(err.is_bean_creation());
    assert!(matches!(err.root_cause(), BeansError::BeanCurrentlyInCreation { bean_name } if bean_name == "alpha"));
    assert_eq!(container.singleton_count(), 0);
}

#[test]
fn test_circular_depends_on_is_reported() {
    let container = container();
    container
        .register_bean_definition("a", dynamic(&ALPHA, &[]).depends_on("b"))
        .unwrap();
    container
        .register_bean_definition("b", dynamic(&BETA, &[]).depends_on("a"))
        .unwrap();

    match container.get_bean("a").unwrap_err() {
        BeansError::CircularDependsOn { bean_name, chain } => {
            assert_eq!(bean_name, "a");
            assert_eq!(chain, "a -> b -> a");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_prototype_cycle_fails_with_currently_in_creation() {
    let container = container();
    container
        .register_bean_definition(
            "first",
            dynamic(&LINK, &LINK_PROPERTIES)
                .prototype()
                .with_property("next", Value::reference("second")),
        )
        .unwrap();
    container
        .register_bean_definition(
            "second",
            dynamic(&LINK, &LINK_PROPERTIES)
                .prototype()
                .with_property("next", Value::reference("first")),
        )
        .unwrap();

    let err = container.get_bean("first").unwrap_err();
    assert!(err.is_bean_creation());
    assert_eq!(err.bean_name(), Some("first"));
    assert!(matches!(err.root_cause(), BeansError::BeanCurrentlyInCreation { .. }));
}

#[test]
fn test_autowire_by_type_with_single_candidate() {
    let container = container();
    container
        .register_bean_definition("repository", dynamic(&REPOSITORY, &[]))
        .unwrap();
    container.register_singleton("audit", Arc::new(DynamicBean::new(&AUDIT, &[]))).unwrap();
    container
        .register_bean_definition(
            "consumer",
            dynamic(&CONSUMER, &CONSUMER_PROPERTIES)
                .with_autowire(AutowireMode::ByType)
                .with_property("retries", "3"),
        )
        .unwrap();

    let consumer = container.get_bean("consumer").unwrap();
    let repository = container.get_bean("repository").unwrap();
    let audit = container.get_bean("audit").unwrap();

    assert!(Arc::ptr_eq(property(&consumer, "repository").as_bean().unwrap(), &repository));
    assert!(Arc::ptr_eq(property(&consumer, "audit").as_bean().unwrap(), &audit));
    assert_eq!(property(&consumer, "retries"), Value::Int(3));
    assert_eq!(container.depending_bean_names("repository"), vec!["consumer"]);
}

#[test]
fn test_autowire_by_type_without_candidates_fails() {
    let container = container();
    container
        .register_bean_definition("repository", dynamic(&REPOSITORY, &[]))
        .unwrap();
    container
        .register_bean_definition("consumer", dynamic(&CONSUMER, &CONSUMER_PROPERTIES).with_autowire(AutowireMode::ByType))
        .unwrap();

    let err = container.get_bean("consumer").unwrap_err();
    let cause = err.find_cause(BeansError::is_unsatisfied_dependency).unwrap();
    assert!(cause.to_string().contains("There are 0 beans of type [Audit]"));
}

#[test]
fn test_autowire_by_type_with_ambiguous_candidates_fails() {
    let container = container();
    container.register_bean_definition("primary", dynamic(&REPOSITORY, &[])).unwrap();
    container.register_bean_definition("replica", dynamic(&REPOSITORY, &[])).unwrap();
    container.register_bean_definition("audit", dynamic(&AUDIT, &[])).unwrap();
    container
        .register_bean_definition("consumer", dynamic(&CONSUMER, &CONSUMER_PROPERTIES).with_autowire(AutowireMode::ByType))
        .unwrap();

    let err = container.get_bean("consumer").unwrap_err();
    assert!(err.is_bean_creation());
    let cause = err.find_cause(BeansError::is_unsatisfied_dependency).unwrap();
    assert!(cause.to_string().contains("There are 2 beans of type [Repository]"));
}

#[test]
fn test_autowire_by_name_injects_matching_names_only() {
    let container = container();
    container.register_bean_definition("repository", dynamic(&REPOSITORY, &[])).unwrap();
    container.register_bean_definition("journal", dynamic(&AUDIT, &[])).unwrap();
    container
        .register_bean_definition("consumer", dynamic(&CONSUMER, &CONSUMER_PROPERTIES).with_autowire(AutowireMode::ByName))
        .unwrap();

    let consumer = container.get_bean("consumer").unwrap();
    assert!(property(&consumer, "repository").as_bean().is_some());
    assert!(property(&consumer, "audit").is_null());
}

#[test]
fn test_dependency_check_reports_missing_values() {
    let container = container();
    container.register_bean_definition("repository", dynamic(&REPOSITORY, &[])).unwrap();
    container.register_bean_definition("audit", dynamic(&AUDIT, &[])).unwrap();
    container
        .register_bean_definition(
            "checked",
            dynamic(&CONSUMER, &CONSUMER_PROPERTIES)
                .with_autowire(AutowireMode::ByType)
                .with_dependency_check(DependencyCheck::Simple),
        )
        .unwrap();
    container
        .register_bean_definition(
            "complete",
            dynamic(&CONSUMER, &CONSUMER_PROPERTIES)
                .with_autowire(AutowireMode::ByType)
                .with_dependency_check(DependencyCheck::All)
                .with_property("retries", 1),
        )
        .unwrap();

    let err = container.get_bean("checked").unwrap_err();
    let cause = err.find_cause(BeansError::is_unsatisfied_dependency).unwrap();
    assert!(cause.to_string().contains("retries"));

    assert!(container.get_bean("complete").is_ok());
}

#[test]
fn test_unresolvable_reference_keeps_root_cause() {
    let container = container();
    container
        .register_bean_definition("link", dynamic(&LINK, &LINK_PROPERTIES).with_property("next", Value::reference("ghost")))
        .unwrap();

    let err = container.get_bean("link").unwrap_err();
    assert!(err.to_string().contains("Can't resolve reference to bean 'ghost'"));
    assert!(err.root_cause().is_no_such_bean());
}

// ---------------------------------------------------------------------------
// lifecycle

static LIFECYCLE: TypeInfo = TypeInfo::new("LifecycleBean");

struct LifecycleBean {
    events: Arc<Mutex<Vec<String>>>,
    factory: Mutex<Option<Weak<dyn BeanFactory>>>,
}

impl Bean for LifecycleBean {
    fn type_info(&self) -> &'static TypeInfo {
        &LIFECYCLE
    }

    fn as_name_aware(&self) -> Option<&dyn BeanNameAware> {
        Some(self)
    }

    fn as_factory_aware(&self) -> Option<&dyn BeanFactoryAware> {
        Some(self)
    }

    fn as_initializing(&self) -> Option<&dyn InitializingBean> {
        Some(self)
    }
}

impl BeanNameAware for LifecycleBean {
    fn set_bean_name(&self, name: &str) {
        self.events.lock().push(format!("name:{}", name));
    }
}

impl BeanFactoryAware for LifecycleBean {
    fn set_bean_factory(&self, factory: Weak<dyn BeanFactory>) -> Result<(), BoxError> {
        self.events.lock().push("factory".to_string());
        *self.factory.lock() = Some(factory);
        Ok(())
    }
}

impl InitializingBean for LifecycleBean {
    fn after_properties_set(&self) -> Result<(), BoxError> {
        self.events.lock().push("init".to_string());
        Ok(())
    }
}

struct RecordingProcessor {
    events: Arc<Mutex<Vec<String>>>,
}

impl BeanPostProcessor for RecordingProcessor {
    fn before_initialization(&self, bean: BeanRef, name: &str) -> Result<BeanRef, BoxError> {
        self.events.lock().push(format!("before:{}", name));
        Ok(bean)
    }

    fn after_initialization(&self, bean: BeanRef, name: &str) -> Result<BeanRef, BoxError> {
        self.events.lock().push(format!("after:{}", name));
        Ok(bean)
    }
}

#[test]
fn test_lifecycle_callbacks_run_in_order() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let log = events.clone();
    let class = BeanClass::of(&LIFECYCLE, move || {
        Arc::new(LifecycleBean {
            events: log.clone(),
            factory: Mutex::new(None),
        }) as BeanRef
    });

    let mut builder = BeanContainerBuilder::new();
    builder
        .definition("worker", BeanDefinition::new(class))
        .definition("repository", dynamic(&REPOSITORY, &[]))
        .post_processor(Arc::new(RecordingProcessor { events: events.clone() }));
    let container = builder.build().unwrap();

    let worker = container.get_bean_as::<LifecycleBean>("worker").unwrap();
    assert_eq!(
        *events.lock(),
        vec!["name:worker", "factory", "before:worker", "init", "after:worker"]
    );

    let factory = worker.factory.lock().as_ref().and_then(Weak::upgrade).unwrap();
    assert!(factory.get_bean("repository").is_ok());
    assert!(factory.is_singleton("worker").unwrap());
}

static PROXY: TypeInfo = TypeInfo::new("Proxy");

struct ProxyingProcessor;

impl BeanPostProcessor for ProxyingProcessor {
    fn after_initialization(&self, bean: BeanRef, _name: &str) -> Result<BeanRef, BoxError> {
        if bean.type_info() == &REPOSITORY {
            return Ok(Arc::new(DynamicBean::new(&PROXY, &[])));
        }
        Ok(bean)
    }
}

#[test]
fn test_post_processor_substitute_is_cached_and_injected() {
    let container = container();
    container.add_bean_post_processor(Arc::new(ProxyingProcessor));
    container.register_bean_definition("repository", dynamic(&REPOSITORY, &[])).unwrap();
    container.register_bean_definition("link", dynamic(&LINK, &LINK_PROPERTIES).with_property("label", "x")).unwrap();

    let first = container.get_bean("repository").unwrap();
    let second = container.get_bean("repository").unwrap();
    assert_eq!(first.type_info().name(), "Proxy");
    assert!(Arc::ptr_eq(&first, &second));

    let existing: BeanRef = Arc::new(DynamicBean::new(&REPOSITORY, &[]));
    let processed = container
        .apply_bean_post_processors_after_initialization(existing, "external")
        .unwrap();
    assert_eq!(processed.type_info().name(), "Proxy");
    assert_eq!(container.get_bean("link").unwrap().type_info().name(), "Link");
}

static FAILING: TypeInfo = TypeInfo::new("FailingInit");

struct FailingInit;

impl Bean for FailingInit {
    fn type_info(&self) -> &'static TypeInfo {
        &FAILING
    }

    fn as_initializing(&self) -> Option<&dyn InitializingBean> {
        Some(self)
    }
}

impl InitializingBean for FailingInit {
    fn after_properties_set(&self) -> Result<(), BoxError> {
        Err("connection refused".into())
    }
}

#[test]
fn test_failed_singleton_is_evicted_and_retried() {
    let created = Arc::new(AtomicUsize::new(0));
    let counter = created.clone();
    let container = container();
    container
        .register_bean_definition(
            "failing",
            BeanDefinition::new(BeanClass::of(&FAILING, move || {
                counter.fetch_add(1, Ordering::SeqCst);
                Arc::new(FailingInit) as BeanRef
            }))
            .depends_on("repository")
            .with_resource_description("tests/failing.yaml"),
        )
        .unwrap();
    container.register_bean_definition("repository", dynamic(&REPOSITORY, &[])).unwrap();

    let err = container.get_bean("failing").unwrap_err();
    assert!(err.to_string().contains("defined in tests/failing.yaml"));
    assert!(err.to_string().contains("Initialization of bean failed"));
    assert_eq!(container.singleton_count(), 1);
    assert!(container.depending_bean_names("repository").is_empty());

    assert!(container.get_bean("failing").is_err());
    assert_eq!(created.load(Ordering::SeqCst), 2);
}

// ---------------------------------------------------------------------------
// destruction

static RESOURCE: TypeInfo = TypeInfo::new("Resource");

struct Resource {
    name: &'static str,
    fail: bool,
    log: Arc<Mutex<Vec<&'static str>>>,
}

impl Bean for Resource {
    fn type_info(&self) -> &'static TypeInfo {
        &RESOURCE
    }

    fn as_disposable(&self) -> Option<&dyn DisposableBean> {
        Some(self)
    }
}

impl DisposableBean for Resource {
    fn destroy(&self) -> Result<(), BoxError> {
        self.log.lock().push(self.name);
        if self.fail {
            return Err(format!("{} failed to close", self.name).into());
        }
        Ok(())
    }
}

fn resource_class(name: &'static str, fail: bool, log: &Arc<Mutex<Vec<&'static str>>>) -> BeanClass {
    let log = log.clone();
    BeanClass::of(&RESOURCE, move || {
        Arc::new(Resource {
            name,
            fail,
            log: log.clone(),
        }) as BeanRef
    })
}

#[test]
fn test_destroy_chain_runs_dependents_first_and_survives_failures() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let container = container();
    container
        .register_bean_definition("a", BeanDefinition::new(resource_class("a", false, &log)).depends_on("b"))
        .unwrap();
    container
        .register_bean_definition("b", BeanDefinition::new(resource_class("b", true, &log)).depends_on("c"))
        .unwrap();
    container
        .register_bean_definition("c", BeanDefinition::new(resource_class("c", false, &log)))
        .unwrap();

    container.get_bean("a").unwrap();
    assert_eq!(container.depending_bean_names("b"), vec!["a"]);

    let report = container.destroy_singletons();
    assert_eq!(*log.lock(), vec!["a", "b", "c"]);
    assert_eq!(report.destroyed, vec!["a", "c"]);
    assert_eq!(report.failed_count(), 1);
    assert_eq!(report.failures[0].0, "b");
    assert_eq!(container.singleton_count(), 0);
}

#[test]
fn test_pre_instantiation_skips_lazy_abstract_and_prototypes() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let container = container();
    container.register_bean_definition("eager", BeanDefinition::new(resource_class("eager", false, &log))).unwrap();
    container
        .register_bean_definition("lazy", BeanDefinition::new(resource_class("lazy", false, &log)).lazy(true))
        .unwrap();
    container
        .register_bean_definition("template", BeanDefinition::new(resource_class("template", false, &log)).abstract_definition())
        .unwrap();
    container
        .register_bean_definition("proto", BeanDefinition::new(resource_class("proto", false, &log)).prototype())
        .unwrap();

    container.pre_instantiate_singletons().unwrap();
    assert_eq!(container.singleton_count(), 1);

    let err = container.get_bean("template").unwrap_err();
    assert!(err.to_string().contains("abstract"));
}

#[test]
fn test_default_lazy_init_from_config() {
    let config = ContainerConfig {
        default_lazy_init: true,
        ..ContainerConfig::default()
    };
    let container = BeanContainer::new(config);
    container.register_bean_definition("lazy", dynamic(&REPOSITORY, &[])).unwrap();
    container.register_bean_definition("eager", dynamic(&AUDIT, &[]).lazy(false)).unwrap();

    container.pre_instantiate_singletons().unwrap();
    assert_eq!(container.singleton_count(), 1);
}

// ---------------------------------------------------------------------------
// hierarchy and lookup

#[test]
fn test_parent_container_serves_beans_and_definitions() {
    let mut parent_builder = BeanContainerBuilder::new();
    parent_builder
        .definition("shared", dynamic(&REPOSITORY, &[]))
        .definition(
            "template",
            dynamic(&LINK, &LINK_PROPERTIES)
                .abstract_definition()
                .with_property("label", "inherited"),
        );
    let parent = parent_builder.build().unwrap();

    let mut child_builder = BeanContainerBuilder::new();
    child_builder
        .parent(parent.clone())
        .definition("child", BeanDefinition::child("template").prototype());
    let child = child_builder.build().unwrap();

    assert!(child.contains_bean("shared"));
    assert!(!child.contains_bean_definition("shared"));
    assert!(Arc::ptr_eq(&child.get_bean("shared").unwrap(), &parent.get_bean("shared").unwrap()));
    assert!(child.parent_bean_factory().is_some());

    let bean = child.get_bean("child").unwrap();
    assert_eq!(property(&bean, "label").as_str(), Some("inherited"));
    assert!(!child.is_singleton("child").unwrap());
    assert!(child.get_bean("nowhere").unwrap_err().is_no_such_bean());
}

#[test]
fn test_aliases_and_typed_lookup() {
    let container = container();
    container.register_bean_definition("repository", dynamic(&REPOSITORY, &[])).unwrap();
    container.register_alias("repository", "repo").unwrap();

    let by_alias = container.get_bean("repo").unwrap();
    assert!(Arc::ptr_eq(&by_alias, &container.get_bean("repository").unwrap()));
    assert_eq!(container.aliases("repository").unwrap(), vec!["repo"]);
    assert_eq!(container.aliases("repo").unwrap(), vec!["repository"]);

    assert!(container.get_bean_of_type("repo", &REPOSITORY).is_ok());
    assert!(matches!(
        container.get_bean_of_type("repo", &AUDIT),
        Err(BeansError::BeanNotOfRequiredType { .. })
    ));
    assert!(container.get_bean_as::<DynamicBean>("repo").is_ok());
    assert!(container.get_bean_as::<Resource>("repo").is_err());
}

#[test]
fn test_beans_of_type_respects_prototype_flag() {
    let container = container();
    container.register_bean_definition("single", dynamic(&REPOSITORY, &[])).unwrap();
    container.register_bean_definition("proto", dynamic(&REPOSITORY, &[]).prototype()).unwrap();
    container.register_singleton("manual", Arc::new(DynamicBean::new(&REPOSITORY, &[]))).unwrap();

    let singletons = container.beans_of_type(&REPOSITORY, false).unwrap();
    assert_eq!(singletons.keys().collect::<Vec<_>>(), vec!["manual", "single"]);

    let all = container.find_matching_beans(&REPOSITORY).unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(container.bean_names_for_type(&REPOSITORY), vec!["single", "proto"]);
}

#[test]
fn test_register_singleton_rejects_duplicates() {
    let container = container();
    container.register_singleton("clock", Arc::new(DynamicBean::new(&AUDIT, &[]))).unwrap();
    let err = container
        .register_singleton("clock", Arc::new(DynamicBean::new(&AUDIT, &[])))
        .unwrap_err();
    assert!(matches!(err, BeansError::BeanDefinitionStore { .. }));
}

// ---------------------------------------------------------------------------
// autowiring objects outside the registry

#[test]
fn test_autowire_class_and_existing_bean() {
    let container = container();
    container.register_bean_definition("repository", dynamic(&REPOSITORY, &[])).unwrap();
    container.register_bean_definition("audit", dynamic(&AUDIT, &[])).unwrap();

    let created = container
        .autowire(
            DynamicBean::class(&CONSUMER, &CONSUMER_PROPERTIES),
            AutowireMode::ByType,
            DependencyCheck::None,
        )
        .unwrap();
    assert!(property(&created, "repository").as_bean().is_some());

    let existing: BeanRef = Arc::new(DynamicBean::new(&CONSUMER, &CONSUMER_PROPERTIES));
    container
        .autowire_bean_properties(&existing, AutowireMode::ByName, DependencyCheck::None)
        .unwrap();
    assert!(property(&existing, "audit").as_bean().is_some());

    let err = container
        .autowire_bean_properties(&existing, AutowireMode::Constructor, DependencyCheck::None)
        .unwrap_err();
    assert!(matches!(err, BeansError::InvalidArgument { .. }));
}

// ---------------------------------------------------------------------------
// constructor resolution

static DEP_A: TypeInfo = TypeInfo::new("DepA");
static DEP_B: TypeInfo = TypeInfo::new("DepB");
static DEP_C: TypeInfo = TypeInfo::new("DepC");
static BUILT: TypeInfo = TypeInfo::new("Built");

static ANIMAL: TypeInfo = TypeInfo::new("Animal");
static DOG: TypeInfo = TypeInfo::new("Dog").extends(&ANIMAL);
static PUPPY: TypeInfo = TypeInfo::new("Puppy").extends(&DOG);

struct Built {
    label: &'static str,
    args: Vec<Value>,
}

impl Bean for Built {
    fn type_info(&self) -> &'static TypeInfo {
        &BUILT
    }
}

fn labelled(label: &'static str) -> impl Fn(&[Value]) -> Result<BeanRef, BoxError> + Send + Sync + 'static {
    move |args: &[Value]| -> Result<BeanRef, BoxError> {
        Ok(Arc::new(Built {
            label,
            args: args.to_vec(),
        }))
    }
}

fn label_of(container: &BeanContainer, name: &str) -> &'static str {
    container.get_bean_as::<Built>(name).unwrap().label
}

fn fallback_class() -> BeanClass {
    BeanClass::new(&BUILT)
        .with_constructor(vec![&DEP_A], labelled("a"))
        .with_constructor(vec![&DEP_A, &DEP_B, &DEP_C], labelled("abc"))
        .with_constructor(vec![&DEP_A, &DEP_B], labelled("ab"))
}

#[test]
fn test_constructor_fallback_swallows_more_specific_failures() {
    let container = container();
    container.register_bean_definition("a", dynamic(&DEP_A, &[])).unwrap();
    container.register_bean_definition("b1", dynamic(&DEP_B, &[])).unwrap();
    container.register_bean_definition("b2", dynamic(&DEP_B, &[])).unwrap();
    container
        .register_bean_definition(
            "built",
            BeanDefinition::new(fallback_class()).with_autowire(AutowireMode::Constructor),
        )
        .unwrap();

    // (A, B, C) and (A, B) are ambiguous on B; their errors are dropped
    assert_eq!(label_of(&container, "built"), "a");
    assert_eq!(container.depending_bean_names("a"), vec!["built"]);
}

#[test]
fn test_constructor_fallback_returns_error_of_last_candidate() {
    let container = container();
    container.register_bean_definition("b1", dynamic(&DEP_B, &[])).unwrap();
    container.register_bean_definition("b2", dynamic(&DEP_B, &[])).unwrap();
    container
        .register_bean_definition(
            "built",
            BeanDefinition::new(fallback_class()).with_autowire(AutowireMode::Constructor),
        )
        .unwrap();

    let err = container.get_bean("built").unwrap_err();
    let cause = err.find_cause(BeansError::is_unsatisfied_dependency).unwrap();
    match cause {
        BeansError::UnsatisfiedDependency { required_type, message, .. } => {
            assert_eq!(required_type, "DepA");
            assert!(message.contains("There are 0 beans of type [DepA]"));
        }
        other => panic!("unexpected cause: {other}"),
    }
}

#[test]
fn test_constructor_with_lowest_type_difference_weight_wins() {
    let container = container();
    container.register_bean_definition("puppy", dynamic(&PUPPY, &[])).unwrap();

    let class = BeanClass::new(&BUILT)
        .with_constructor(vec![&ANIMAL], labelled("animal"))
        .with_constructor(vec![&DOG], labelled("dog"));
    container
        .register_bean_definition(
            "kennel",
            BeanDefinition::new(class)
                .prototype()
                .with_generic_arg(Value::reference("puppy")),
        )
        .unwrap();

    for _ in 0..3 {
        assert_eq!(label_of(&container, "kennel"), "dog");
    }
}

#[test]
fn test_object_parameter_loses_to_exact_match() {
    let container = container();
    container.register_bean_definition("animal", dynamic(&ANIMAL, &[])).unwrap();

    let class = BeanClass::new(&BUILT)
        .with_constructor(vec![&builtin::OBJECT], labelled("object"))
        .with_constructor(vec![&ANIMAL], labelled("animal"));
    container
        .register_bean_definition(
            "shelter",
            BeanDefinition::new(class).with_constructor_arg(0, Value::reference("animal")),
        )
        .unwrap();

    assert_eq!(label_of(&container, "shelter"), "animal");
}

#[test]
fn test_type_hint_on_indexed_argument_selects_overload() {
    let container = container();
    let class = BeanClass::new(&BUILT)
        .with_constructor(vec![&builtin::INT], labelled("int"))
        .with_constructor(vec![&builtin::STRING], labelled("string"));
    container
        .register_bean_definition(
            "hinted",
            BeanDefinition::new(class.clone()).with_typed_constructor_arg(0, "5", "String"),
        )
        .unwrap();
    container
        .register_bean_definition(
            "unhinted",
            BeanDefinition::new(class).with_constructor_arg(0, "5"),
        )
        .unwrap();

    let hinted = container.get_bean_as::<Built>("hinted").unwrap();
    assert_eq!(hinted.label, "string");
    assert_eq!(hinted.args, vec![Value::from("5")]);

    // without a hint both overloads accept "5"; the first declared one wins the tie
    let unhinted = container.get_bean_as::<Built>("unhinted").unwrap();
    assert_eq!(unhinted.label, "int");
    assert_eq!(unhinted.args, vec![Value::Int(5)]);
}

#[test]
fn test_prototype_resolution_is_deterministic() {
    let container = container();
    container.register_bean_definition("dog", dynamic(&DOG, &[])).unwrap();
    container.register_bean_definition("a", dynamic(&DEP_A, &[])).unwrap();

    let class = BeanClass::new(&BUILT)
        .with_constructor(vec![&ANIMAL], labelled("animal"))
        .with_constructor(vec![&DOG], labelled("dog"))
        .with_constructor(vec![&DOG], labelled("dog-again"))
        .with_constructor(vec![&ANIMAL, &DEP_A], labelled("animal-a"))
        .with_constructor(vec![&DOG, &DEP_A], labelled("dog-a"));
    container
        .register_bean_definition(
            "kennel",
            BeanDefinition::new(class)
                .prototype()
                .with_autowire(AutowireMode::Constructor),
        )
        .unwrap();

    let labels: Vec<&'static str> = (0..10).map(|_| label_of(&container, "kennel")).collect();
    assert!(labels.iter().all(|label| *label == "dog-a"), "{labels:?}");
}

#[test]
fn test_equal_weights_keep_the_first_candidate() {
    let container = container();
    container.register_bean_definition("dog", dynamic(&DOG, &[])).unwrap();

    let class = BeanClass::new(&BUILT)
        .with_constructor(vec![&DOG], labelled("first"))
        .with_constructor(vec![&DOG], labelled("second"));
    container
        .register_bean_definition(
            "kennel",
            BeanDefinition::new(class).with_autowire(AutowireMode::Constructor),
        )
        .unwrap();

    assert_eq!(label_of(&container, "kennel"), "first");
}

#[test]
fn test_indexed_arguments_are_converted() {
    let container = container();
    let class = BeanClass::new(&BUILT).with_constructor(vec![&builtin::INT, &builtin::STRING], labelled("pool"));
    container
        .register_bean_definition(
            "pool",
            BeanDefinition::new(class)
                .with_constructor_arg(0, "16")
                .with_constructor_arg(1, "main"),
        )
        .unwrap();

    let pool = container.get_bean_as::<Built>("pool").unwrap();
    assert_eq!(pool.args, vec![Value::Int(16), Value::from("main")]);
}

#[test]
fn test_too_many_declared_arguments_is_reported() {
    let container = container();
    let class = BeanClass::new(&BUILT).with_constructor(vec![&builtin::INT], labelled("single"));
    container
        .register_bean_definition(
            "single",
            BeanDefinition::new(class)
                .with_constructor_arg(0, 1)
                .with_constructor_arg(1, 2),
        )
        .unwrap();

    let err = container.get_bean("single").unwrap_err();
    assert!(err
        .to_string()
        .contains("2 constructor arguments specified but no matching constructor found in bean 'single'"));
}

#[test]
fn test_missing_argument_without_constructor_autowiring() {
    let container = container();
    container.register_bean_definition("a", dynamic(&DEP_A, &[])).unwrap();
    let class = BeanClass::new(&BUILT).with_constructor(vec![&builtin::INT, &DEP_A], labelled("partial"));
    container
        .register_bean_definition("partial", BeanDefinition::new(class).with_constructor_arg(0, 5))
        .unwrap();

    let err = container.get_bean("partial").unwrap_err();
    let cause = err.find_cause(BeansError::is_unsatisfied_dependency).unwrap();
    assert!(cause
        .to_string()
        .contains("Did you specify the correct bean references as generic constructor arguments?"));
}
