use std::sync::Arc;

use parking_lot::RwLock;

use crate::errors::{BeansError, BoxError};
use crate::foundation::BeanRef;

/// Hook invoked around the initialization of every bean the container creates.
///
/// Either method may return a different object than it was given; that
/// object is what later processors see and what the container caches.
pub trait BeanPostProcessor: Send + Sync {
    fn before_initialization(&self, bean: BeanRef, name: &str) -> Result<BeanRef, BoxError> {
        let _ = name;
        Ok(bean)
    }

    fn after_initialization(&self, bean: BeanRef, name: &str) -> Result<BeanRef, BoxError> {
        let _ = name;
        Ok(bean)
    }
}

/// Initialization phase a post-processor runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingPhase {
    BeforeInitialization,
    AfterInitialization,
}

impl ProcessingPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingPhase::BeforeInitialization => "before initialization",
            ProcessingPhase::AfterInitialization => "after initialization",
        }
    }
}

/// Ordered list of post-processors.
///
/// The list is read-locked only long enough to take a snapshot, so a
/// processor may register further processors without deadlocking; those
/// apply from the next bean on.
#[derive(Default)]
pub struct PostProcessorChain {
    processors: RwLock<Vec<Arc<dyn BeanPostProcessor>>>,
}

impl PostProcessorChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, processor: Arc<dyn BeanPostProcessor>) {
        self.processors.write().push(processor);
    }

    pub fn len(&self) -> usize {
        self.processors.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.read().is_empty()
    }

    /// Thread `bean` through every processor for `phase`, in registration order
    pub fn apply(
        &self,
        phase: ProcessingPhase,
        bean: BeanRef,
        name: &str,
        resource_description: &str,
    ) -> Result<BeanRef, BeansError> {
        let processors = self.processors.read().clone();
        if !processors.is_empty() {
            tracing::debug!(
                "Invoking {} BeanPostProcessor(s) {} of bean '{}'",
                processors.len(),
                phase.as_str(),
                name
            );
        }

        let mut result = bean;
        for processor in processors {
            let outcome = match phase {
                ProcessingPhase::BeforeInitialization => processor.before_initialization(result, name),
                ProcessingPhase::AfterInitialization => processor.after_initialization(result, name),
            };
            result = outcome.map_err(|e| {
                BeansError::bean_creation(
                    name,
                    resource_description,
                    format!("BeanPostProcessor failed {}", phase.as_str()),
                )
                .with_source(e)
            })?;
        }
        Ok(result)
    }
}

impl std::fmt::Debug for PostProcessorChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostProcessorChain")
            .field("processors_count", &self.len())
            .finish()
    }
}
