//! Example: wiring a small service graph with the bean container
//!
//! Run with `RUST_LOG=debug cargo run --example wiring` to see the
//! container's creation and autowiring decisions.

use std::sync::Arc;

use elif_beans::{
    builtin, AutowireMode, Bean, BeanClass, BeanContainerBuilder, BeanDefinition, BeanNameAware,
    BeanPostProcessor, BeanRef, BoxError, ContainerConfig, DisposableBean, InitializingBean, PropertyDescriptor,
    TypeInfo, Value,
};
use parking_lot::RwLock;
use tracing_subscriber::EnvFilter;

static REPOSITORY: TypeInfo = TypeInfo::new("Repository");
static MEMORY_REPOSITORY: TypeInfo = TypeInfo::new("MemoryRepository").extends(&REPOSITORY);
static GREETING_SERVICE: TypeInfo = TypeInfo::new("GreetingService");
static CONTROLLER: TypeInfo = TypeInfo::new("Controller");

static CONTROLLER_PROPERTIES: [PropertyDescriptor; 2] = [
    PropertyDescriptor::new("service", &GREETING_SERVICE),
    PropertyDescriptor::new("route", &builtin::STRING),
];

struct MemoryRepository {
    names: RwLock<Vec<String>>,
}

impl Bean for MemoryRepository {
    fn type_info(&self) -> &'static TypeInfo {
        &MEMORY_REPOSITORY
    }

    fn as_disposable(&self) -> Option<&dyn DisposableBean> {
        Some(self)
    }
}

impl DisposableBean for MemoryRepository {
    fn destroy(&self) -> Result<(), BoxError> {
        println!("repository closed with {} name(s)", self.names.read().len());
        Ok(())
    }
}

struct GreetingService {
    repository: BeanRef,
    greeting: String,
}

impl GreetingService {
    fn greet(&self, name: &str) -> String {
        if let Some(repository) = self.repository.downcast_ref::<MemoryRepository>() {
            repository.names.write().push(name.to_string());
        }
        format!("{}, {}!", self.greeting, name)
    }
}

impl Bean for GreetingService {
    fn type_info(&self) -> &'static TypeInfo {
        &GREETING_SERVICE
    }
}

#[derive(Default)]
struct Controller {
    name: RwLock<String>,
    service: RwLock<Option<BeanRef>>,
    route: RwLock<String>,
}

impl Bean for Controller {
    fn type_info(&self) -> &'static TypeInfo {
        &CONTROLLER
    }

    fn properties(&self) -> &'static [PropertyDescriptor] {
        &CONTROLLER_PROPERTIES
    }

    fn set_property(&self, name: &str, value: Value) -> Result<(), BoxError> {
        match (name, value) {
            ("service", Value::Bean(bean)) => *self.service.write() = Some(bean),
            ("route", Value::Str(route)) => *self.route.write() = route,
            (name, value) => return Err(format!("cannot set '{}' to {}", name, value).into()),
        }
        Ok(())
    }

    fn as_name_aware(&self) -> Option<&dyn BeanNameAware> {
        Some(self)
    }

    fn as_initializing(&self) -> Option<&dyn InitializingBean> {
        Some(self)
    }
}

impl BeanNameAware for Controller {
    fn set_bean_name(&self, name: &str) {
        *self.name.write() = name.to_string();
    }
}

impl InitializingBean for Controller {
    fn after_properties_set(&self) -> Result<(), BoxError> {
        if self.route.read().is_empty() {
            return Err("controller needs a route".into());
        }
        Ok(())
    }
}

impl Controller {
    fn handle(&self, who: &str) -> String {
        let service = self.service.read();
        let greeting = service
            .as_ref()
            .and_then(|bean| bean.downcast_ref::<GreetingService>())
            .map(|service| service.greet(who))
            .unwrap_or_default();
        format!("[{} {}] {}", self.name.read(), self.route.read(), greeting)
    }
}

/// Logs every bean as it finishes initialization
struct AuditProcessor;

impl BeanPostProcessor for AuditProcessor {
    fn after_initialization(&self, bean: BeanRef, name: &str) -> Result<BeanRef, BoxError> {
        tracing::info!("bean '{}' ready as [{}]", name, bean.type_info());
        Ok(bean)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let repository = BeanClass::of(&MEMORY_REPOSITORY, || {
        Arc::new(MemoryRepository {
            names: RwLock::new(Vec::new()),
        }) as BeanRef
    });

    let service = BeanClass::new(&GREETING_SERVICE).with_constructor(
        vec![&REPOSITORY, &builtin::STRING],
        |args: &[Value]| -> Result<BeanRef, BoxError> {
            let repository = args[0].as_bean().cloned().ok_or("repository missing")?;
            let greeting = args[1].as_str().unwrap_or("Hello").to_string();
            Ok(Arc::new(GreetingService { repository, greeting }))
        },
    );

    let controller = BeanClass::of(&CONTROLLER, || Arc::new(Controller::default()) as BeanRef);

    let mut builder = BeanContainerBuilder::new();
    builder
        .config(ContainerConfig::from_env()?)
        .definition("repository", BeanDefinition::new(repository))
        .definition(
            "greetingService",
            BeanDefinition::new(service)
                .with_autowire(AutowireMode::Constructor)
                .with_typed_constructor_arg(1, "Welcome", "String"),
        )
        .definition(
            "homeController",
            BeanDefinition::new(controller)
                .prototype()
                .with_autowire(AutowireMode::ByType)
                .with_property("route", "/"),
        )
        .post_processor(Arc::new(AuditProcessor))
        .pre_instantiate_singletons(true);
    let container = builder.build()?;

    let controller = container.get_bean_as::<Controller>("homeController")?;
    println!("{}", controller.handle("Ada"));
    println!("{}", controller.handle("Grace"));

    let report = container.destroy_singletons();
    println!(
        "destroyed {} singleton(s), {} failure(s)",
        report.destroyed.len(),
        report.failed_count()
    );
    Ok(())
}
