pub mod autowire;
pub mod bean_container;
pub mod builder;
pub mod constructor;
pub mod creation;
pub mod factory;
pub mod lifecycle;
pub mod singletons;


pub use bean_container::BeanContainer;
pub use builder::BeanContainerBuilder;
pub use creation::{detect_depends_on_cycle, CreationGuard};
pub use factory::{AutowireCandidateResolver, BeanFactory, HierarchicalBeanFactory, ListableBeanFactory};
pub use lifecycle::{BeanPostProcessor, PostProcessorChain, ProcessingPhase};
pub use singletons::{DestructionReport, SingletonEntry, SingletonRegistry};
