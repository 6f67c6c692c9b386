use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::definition::bean_definition::{BeanDefinition, MergedBeanDefinition};
use crate::errors::BeansError;
use crate::foundation::TypeInfo;

/// Storage and lookup of bean definitions
pub trait BeanDefinitionRegistry: Send + Sync {
    fn register_bean_definition(&self, name: &str, definition: BeanDefinition) -> Result<(), BeansError>;

    fn contains_bean_definition(&self, name: &str) -> bool;

    /// The definition as registered, before merging
    fn bean_definition(&self, name: &str) -> Result<BeanDefinition, BeansError>;

    /// The definition with its parent chain resolved
    fn merged_bean_definition(&self, name: &str) -> Result<Arc<MergedBeanDefinition>, BeansError>;

    /// Non-abstract definitions whose class is assignable to `type_info`, in registration order
    fn bean_names_for_type(&self, type_info: &TypeInfo) -> Vec<String>;

    fn bean_definition_count(&self) -> usize;

    /// Names in registration order
    fn bean_definition_names(&self) -> Vec<String>;

    fn register_alias(&self, name: &str, alias: &str) -> Result<(), BeansError>;

    /// Resolve an alias to the name it stands for; other names are returned unchanged
    fn canonical_name(&self, name: &str) -> String;

    fn aliases(&self, name: &str) -> Vec<String>;
}

#[derive(Debug, Default)]
struct RegistryState {
    definitions: HashMap<String, BeanDefinition>,
    order: Vec<String>,
    aliases: HashMap<String, String>,
}

/// In-memory registry with a merged-definition cache and an optional parent
pub struct DefaultDefinitionRegistry {
    state: RwLock<RegistryState>,
    merged: RwLock<HashMap<String, Arc<MergedBeanDefinition>>>,
    parent: Option<Arc<dyn BeanDefinitionRegistry>>,
    allow_overriding: bool,
}

impl DefaultDefinitionRegistry {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
            merged: RwLock::new(HashMap::new()),
            parent: None,
            allow_overriding: true,
        }
    }

    /// Registry consulting `parent` for definitions that name themselves as parent
    pub fn with_parent(parent: Arc<dyn BeanDefinitionRegistry>) -> Self {
        Self {
            parent: Some(parent),
            ..Self::new()
        }
    }

    pub fn allow_overriding(mut self, allow: bool) -> Self {
        self.allow_overriding = allow;
        self
    }

    pub fn parent(&self) -> Option<&Arc<dyn BeanDefinitionRegistry>> {
        self.parent.as_ref()
    }

    fn merge(&self, name: &str, visited: &mut Vec<String>) -> Result<Arc<MergedBeanDefinition>, BeansError> {
        if let Some(cached) = self.merged.read().get(name) {
            return Ok(cached.clone());
        }

        let definition = self.bean_definition(name)?;
        visited.push(name.to_string());

        let merged = match definition.parent_name() {
            None => MergedBeanDefinition::root(&definition),
            Some(parent_name) if parent_name == name => {
                let parent = self.parent.as_ref().ok_or_else(|| {
                    BeansError::definition_store(
                        name,
                        format!("parent name '{}' is equal to bean name but there is no parent registry", name),
                    )
                })?;
                parent.merged_bean_definition(name)?.overlay(&definition)
            }
            Some(parent_name) => {
                let parent_name = self.canonical_name(parent_name);
                if visited.contains(&parent_name) {
                    visited.push(parent_name);
                    return Err(BeansError::definition_store(
                        name,
                        format!("parent definitions form a loop: {}", visited.join(" -> ")),
                    ));
                }
                let parent = if self.contains_bean_definition(&parent_name) {
                    self.merge(&parent_name, visited)?
                } else {
                    match &self.parent {
                        Some(registry) => registry.merged_bean_definition(&parent_name)?,
                        None => return Err(BeansError::no_such_bean(parent_name)),
                    }
                };
                parent.overlay(&definition)
            }
        };

        let merged = Arc::new(merged);
        self.merged
            .write()
            .insert(name.to_string(), merged.clone());
        Ok(merged)
    }
}

impl Default for DefaultDefinitionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BeanDefinitionRegistry for DefaultDefinitionRegistry {
    fn register_bean_definition(&self, name: &str, definition: BeanDefinition) -> Result<(), BeansError> {
        if name.trim().is_empty() {
            return Err(BeansError::definition_store(name, "bean name must not be empty"));
        }
        definition.validate(name)?;

        let mut state = self.state.write();
        if state.aliases.contains_key(name) {
            return Err(BeansError::definition_store(
                name,
                format!("name is already used as an alias for '{}'", state.aliases[name]),
            ));
        }

        if state.definitions.contains_key(name) {
            if !self.allow_overriding {
                return Err(BeansError::definition_store(
                    name,
                    "a definition with this name already exists and overriding is disabled",
                ));
            }
            tracing::warn!("Overriding bean definition for bean '{}'", name);
        } else {
            state.order.push(name.to_string());
        }
        state.definitions.insert(name.to_string(), definition);
        drop(state);

        // children may have merged against the replaced definition
        self.merged.write().clear();
        tracing::debug!("Registered bean definition '{}'", name);
        Ok(())
    }

    fn contains_bean_definition(&self, name: &str) -> bool {
        self.state.read().definitions.contains_key(name)
    }

    fn bean_definition(&self, name: &str) -> Result<BeanDefinition, BeansError> {
        let canonical = self.canonical_name(name);
        self.state
            .read()
            .definitions
            .get(&canonical)
            .cloned()
            .ok_or_else(|| BeansError::no_such_bean(name))
    }

    fn merged_bean_definition(&self, name: &str) -> Result<Arc<MergedBeanDefinition>, BeansError> {
        let canonical = self.canonical_name(name);
        self.merge(&canonical, &mut Vec::new())
    }

    fn bean_names_for_type(&self, type_info: &TypeInfo) -> Vec<String> {
        self.bean_definition_names()
            .into_iter()
            .filter(|name| match self.merged_bean_definition(name) {
                Ok(merged) => {
                    !merged.is_abstract()
                        && merged
                            .bean_class()
                            .is_some_and(|class| type_info.is_assignable_from(class.type_info()))
                }
                Err(e) => {
                    tracing::debug!("Skipping bean '{}' in type lookup: {}", name, e);
                    false
                }
            })
            .collect()
    }

    fn bean_definition_count(&self) -> usize {
        self.state.read().definitions.len()
    }

    fn bean_definition_names(&self) -> Vec<String> {
        self.state.read().order.clone()
    }

    fn register_alias(&self, name: &str, alias: &str) -> Result<(), BeansError> {
        if alias == name {
            return Ok(());
        }

        let mut state = self.state.write();
        if state.definitions.contains_key(alias) {
            return Err(BeansError::definition_store(
                alias,
                format!("cannot register alias for '{}': a bean definition with this name exists", name),
            ));
        }
        if let Some(existing) = state.aliases.get(alias) {
            if existing != name && !self.allow_overriding {
                return Err(BeansError::definition_store(
                    alias,
                    format!("alias is already registered for '{}'", existing),
                ));
            }
        }
        state.aliases.insert(alias.to_string(), name.to_string());
        Ok(())
    }

    fn canonical_name(&self, name: &str) -> String {
        let state = self.state.read();
        let mut current = name;
        let mut seen = HashSet::new();
        while let Some(target) = state.aliases.get(current) {
            if !seen.insert(current) {
                break;
            }
            current = target.as_str();
        }
        current.to_string()
    }

    fn aliases(&self, name: &str) -> Vec<String> {
        let canonical = self.canonical_name(name);
        let candidates: Vec<String> = self.state.read().aliases.keys().cloned().collect();
        let mut aliases: Vec<String> = candidates
            .into_iter()
            .filter(|alias| alias != name && self.canonical_name(alias) == canonical)
            .collect();
        aliases.sort();
        aliases
    }
}

impl std::fmt::Debug for DefaultDefinitionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("DefaultDefinitionRegistry")
            .field("definitions", &state.order)
            .field("aliases", &state.aliases)
            .field("has_parent", &self.parent.is_some())
            .field("allow_overriding", &self.allow_overriding)
            .finish()
    }
}
