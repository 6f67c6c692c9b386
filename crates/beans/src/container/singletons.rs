use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use parking_lot::{ReentrantMutex, ReentrantMutexGuard, RwLock};

use crate::errors::BoxError;
use crate::foundation::BeanRef;

/// Cached singleton in one of its two phases
#[derive(Clone)]
pub enum SingletonEntry {
    /// Instantiated but not yet injected or initialized. Only visible to the
    /// thread that holds the creation lock.
    Raw(BeanRef),
    /// Fully initialized; the object post-processors returned
    Ready(BeanRef),
}

impl SingletonEntry {
    pub fn bean(&self) -> &BeanRef {
        match self {
            SingletonEntry::Raw(bean) | SingletonEntry::Ready(bean) => bean,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, SingletonEntry::Ready(_))
    }
}

impl std::fmt::Debug for SingletonEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SingletonEntry::Raw(bean) => write!(f, "Raw({})", bean.type_info()),
            SingletonEntry::Ready(bean) => write!(f, "Ready({})", bean.type_info()),
        }
    }
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, SingletonEntry>,
    order: Vec<String>,
}

/// Outcome of [`SingletonRegistry::destroy_singletons`]
#[derive(Debug, Default)]
pub struct DestructionReport {
    /// Names in the order their destroy callbacks ran
    pub destroyed: Vec<String>,
    pub failures: Vec<(String, BoxError)>,
}

impl DestructionReport {
    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Singleton cache plus the dependency graph used to order shutdown.
///
/// Locking: `state` and `dependents` are short-lived `RwLock`s never held
/// across user code. First construction of any singleton runs under the
/// reentrant `creation_lock`, so recursive creation on one thread proceeds
/// while other threads wait and then find the finished entry.
pub struct SingletonRegistry {
    state: RwLock<CacheState>,
    /// bean name → names of the beans depending on it
    dependents: RwLock<BTreeMap<String, BTreeSet<String>>>,
    creation_lock: ReentrantMutex<()>,
}

impl SingletonRegistry {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(CacheState::default()),
            dependents: RwLock::new(BTreeMap::new()),
            creation_lock: ReentrantMutex::new(()),
        }
    }

    /// Acquire the singleton creation lock
    pub fn lock_creation(&self) -> ReentrantMutexGuard<'_, ()> {
        self.creation_lock.lock()
    }

    /// Fast path: a fully initialized instance
    pub fn get_ready(&self, name: &str) -> Option<BeanRef> {
        match self.state.read().entries.get(name) {
            Some(SingletonEntry::Ready(bean)) => Some(bean.clone()),
            _ => None,
        }
    }

    pub fn get(&self, name: &str) -> Option<SingletonEntry> {
        self.state.read().entries.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.state.read().entries.contains_key(name)
    }

    /// Publish a raw instance so circular lookups on this thread can see it
    pub fn add_raw(&self, name: &str, bean: BeanRef) {
        let mut state = self.state.write();
        state
            .entries
            .insert(name.to_string(), SingletonEntry::Raw(bean));
        if !state.order.iter().any(|n| n == name) {
            state.order.push(name.to_string());
        }
    }

    /// Store the final instance for `name`, replacing any raw entry
    pub fn add_ready(&self, name: &str, bean: BeanRef) {
        let mut state = self.state.write();
        state
            .entries
            .insert(name.to_string(), SingletonEntry::Ready(bean));
        if !state.order.iter().any(|n| n == name) {
            state.order.push(name.to_string());
        }
    }

    /// Drop the entry of a bean whose construction failed, together with its
    /// edges in the dependency graph
    pub fn evict(&self, name: &str) -> Option<SingletonEntry> {
        let evicted = {
            let mut state = self.state.write();
            state.order.retain(|n| n != name);
            state.entries.remove(name)
        };

        let mut dependents = self.dependents.write();
        dependents.remove(name);
        dependents.retain(|_, set| {
            set.remove(name);
            !set.is_empty()
        });
        evicted
    }

    /// Names in registration order
    pub fn names(&self) -> Vec<String> {
        self.state.read().order.clone()
    }

    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().entries.is_empty()
    }

    /// Record that `dependent` needs `bean`, so `dependent` is destroyed first
    pub fn register_dependent(&self, bean: &str, dependent: &str) {
        if bean == dependent {
            return;
        }
        self.dependents
            .write()
            .entry(bean.to_string())
            .or_default()
            .insert(dependent.to_string());
    }

    pub fn dependents_of(&self, bean: &str) -> Vec<String> {
        self.dependents
            .read()
            .get(bean)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Destroy every singleton, dependents before their dependencies and
    /// otherwise in reverse registration order.
    ///
    /// A failing destroy callback is logged and recorded; the remaining beans
    /// are still destroyed.
    pub fn destroy_singletons(&self) -> DestructionReport {
        let _creation = self.lock_creation();
        let mut report = DestructionReport::default();
        let mut visited = HashSet::new();

        for name in self.names().into_iter().rev() {
            self.destroy_with_dependents(&name, &mut visited, &mut report);
        }

        self.dependents.write().clear();
        let mut state = self.state.write();
        state.entries.clear();
        state.order.clear();
        drop(state);

        tracing::debug!(
            "Destroyed {} singleton(s), {} failure(s)",
            report.destroyed.len(),
            report.failed_count()
        );
        report
    }

    fn destroy_with_dependents(&self, name: &str, visited: &mut HashSet<String>, report: &mut DestructionReport) {
        if !visited.insert(name.to_string()) {
            return;
        }

        for dependent in self.dependents_of(name) {
            self.destroy_with_dependents(&dependent, visited, report);
        }

        let Some(entry) = self.evict(name) else {
            return;
        };
        let bean = entry.bean().clone();
        if let Some(disposable) = bean.as_disposable() {
            tracing::debug!("Invoking destroy() on bean '{}'", name);
            if let Err(e) = disposable.destroy() {
                tracing::error!("Destroy method on bean '{}' failed: {}", name, e);
                report.failures.push((name.to_string(), e));
                return;
            }
        }
        report.destroyed.push(name.to_string());
    }
}

impl Default for SingletonRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SingletonRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingletonRegistry")
            .field("singletons", &self.names())
            .field("dependents", &*self.dependents.read())
            .finish()
    }
}
