use std::cell::RefCell;
use std::collections::HashSet;

use uuid::Uuid;

use crate::errors::BeansError;

thread_local! {
    /// Beans being built on this thread, keyed by owning container
    static IN_CREATION: RefCell<HashSet<(Uuid, String)>> = RefCell::new(HashSet::new());
}

/// Marks a bean as being created on the current thread until dropped
#[derive(Debug)]
pub struct CreationGuard {
    container_id: Uuid,
    bean_name: String,
}

impl CreationGuard {
    /// Fails with `BeanCurrentlyInCreation` when the same container is
    /// already building `bean_name` further up this thread's stack
    pub fn enter(container_id: Uuid, bean_name: &str) -> Result<Self, BeansError> {
        let inserted = IN_CREATION.with(|set| set.borrow_mut().insert((container_id, bean_name.to_string())));
        if !inserted {
            return Err(BeansError::BeanCurrentlyInCreation {
                bean_name: bean_name.to_string(),
            });
        }
        Ok(Self {
            container_id,
            bean_name: bean_name.to_string(),
        })
    }

    pub fn is_in_creation(container_id: Uuid, bean_name: &str) -> bool {
        IN_CREATION.with(|set| set.borrow().contains(&(container_id, bean_name.to_string())))
    }
}

impl Drop for CreationGuard {
    fn drop(&mut self) {
        let key = (self.container_id, std::mem::take(&mut self.bean_name));
        IN_CREATION.with(|set| {
            set.borrow_mut().remove(&key);
        });
    }
}

/// Walk the explicit depends-on graph from `root` and fail if it leads back to `root`.
///
/// `depends_on` returns the declared dependencies of a bean; unknown beans
/// return an empty list and are reported later by the lookup itself.
pub fn detect_depends_on_cycle<F>(root: &str, depends_on: F) -> Result<(), BeansError>
where
    F: Fn(&str) -> Vec<String>,
{
    let mut path = vec![root.to_string()];
    let mut finished = HashSet::new();
    visit(root, &depends_on, &mut path, &mut finished)
}

fn visit<F>(
    name: &str,
    depends_on: &F,
    path: &mut Vec<String>,
    finished: &mut HashSet<String>,
) -> Result<(), BeansError>
where
    F: Fn(&str) -> Vec<String>,
{
    for dependency in depends_on(name) {
        if path.contains(&dependency) {
            path.push(dependency);
            return Err(BeansError::CircularDependsOn {
                bean_name: path[0].clone(),
                chain: path.join(" -> "),
            });
        }
        if finished.contains(&dependency) {
            continue;
        }
        path.push(dependency.clone());
        visit(&dependency, depends_on, path, finished)?;
        path.pop();
        finished.insert(dependency);
    }
    Ok(())
}
