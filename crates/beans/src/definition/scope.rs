use crate::errors::BeansError;

/// Bean scope enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    /// One shared instance per bean name for the container's lifetime
    #[default]
    Singleton,
    /// New instance created for each request, never cached
    Prototype,
}

impl Scope {
    pub fn is_singleton(&self) -> bool {
        matches!(self, Scope::Singleton)
    }

    pub fn is_prototype(&self) -> bool {
        matches!(self, Scope::Prototype)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Singleton => "singleton",
            Scope::Prototype => "prototype",
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Scope {
    type Err = BeansError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "singleton" => Ok(Scope::Singleton),
            "prototype" => Ok(Scope::Prototype),
            _ => Err(invalid("scope", s, "singleton or prototype")),
        }
    }
}

/// How unset dependencies are filled in automatically
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AutowireMode {
    #[default]
    No,
    /// Inject the bean whose name equals the property name
    ByName,
    /// Inject the single bean assignable to the property type
    ByType,
    /// Resolve constructor parameters by type
    Constructor,
}

impl AutowireMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AutowireMode::No => "no",
            AutowireMode::ByName => "byName",
            AutowireMode::ByType => "byType",
            AutowireMode::Constructor => "constructor",
        }
    }
}

impl std::fmt::Display for AutowireMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AutowireMode {
    type Err = BeansError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "no" | "none" => Ok(AutowireMode::No),
            "byname" => Ok(AutowireMode::ByName),
            "bytype" => Ok(AutowireMode::ByType),
            "constructor" => Ok(AutowireMode::Constructor),
            _ => Err(invalid("autowire mode", s, "no, byName, byType or constructor")),
        }
    }
}

/// Which writable properties must have a value once injection is done
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DependencyCheck {
    #[default]
    None,
    /// References to other beans
    Objects,
    /// Simple values such as numbers and strings
    Simple,
    /// Every writable property
    All,
}

impl DependencyCheck {
    /// Whether a property whose type is simple (or not) is checked
    pub fn covers(&self, simple: bool) -> bool {
        match self {
            DependencyCheck::None => false,
            DependencyCheck::Objects => !simple,
            DependencyCheck::Simple => simple,
            DependencyCheck::All => true,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyCheck::None => "none",
            DependencyCheck::Objects => "objects",
            DependencyCheck::Simple => "simple",
            DependencyCheck::All => "all",
        }
    }
}

impl std::fmt::Display for DependencyCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DependencyCheck {
    type Err = BeansError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(DependencyCheck::None),
            "objects" => Ok(DependencyCheck::Objects),
            "simple" => Ok(DependencyCheck::Simple),
            "all" => Ok(DependencyCheck::All),
            _ => Err(invalid("dependency check", s, "none, objects, simple or all")),
        }
    }
}

fn invalid(attribute: &str, value: &str, expected: &str) -> BeansError {
    BeansError::InvalidAttribute {
        attribute: attribute.to_string(),
        value: value.to_string(),
        expected: expected.to_string(),
    }
}
