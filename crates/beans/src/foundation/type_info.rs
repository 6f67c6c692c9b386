use std::fmt;
use std::hash::{Hash, Hasher};

/// Runtime description of a bean type.
///
/// Types form a single-inheritance tree through `parent` and may additionally
/// implement any number of interface types. Declare them as statics so that
/// references are `'static`:
///
/// ```rust
/// use elif_beans::TypeInfo;
///
/// static REPOSITORY: TypeInfo = TypeInfo::new("Repository");
/// static BASE_REPOSITORY: TypeInfo = TypeInfo::new("BaseRepository");
/// static PG_INTERFACES: [&TypeInfo; 1] = [&REPOSITORY];
/// static PG_REPOSITORY: TypeInfo = TypeInfo::new("PgRepository")
///     .extends(&BASE_REPOSITORY)
///     .implements(&PG_INTERFACES);
///
/// assert!(REPOSITORY.is_assignable_from(&PG_REPOSITORY));
/// assert!(BASE_REPOSITORY.is_assignable_from(&PG_REPOSITORY));
/// assert!(!PG_REPOSITORY.is_assignable_from(&BASE_REPOSITORY));
/// ```
pub struct TypeInfo {
    name: &'static str,
    parent: Option<&'static TypeInfo>,
    interfaces: &'static [&'static TypeInfo],
    simple: bool,
}

/// Built-in types for scalar values and the universal root
pub mod builtin {
    use super::TypeInfo;

    /// Root type; accepts every value
    pub static OBJECT: TypeInfo = TypeInfo::new("Object");
    pub static BOOL: TypeInfo = TypeInfo::simple("bool");
    pub static INT: TypeInfo = TypeInfo::simple("int");
    pub static FLOAT: TypeInfo = TypeInfo::simple("float");
    pub static STRING: TypeInfo = TypeInfo::simple("String");
    pub static LIST: TypeInfo = TypeInfo::simple("List");
}

impl TypeInfo {
    /// Declare a root object type
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            parent: None,
            interfaces: &[],
            simple: false,
        }
    }

    /// Declare a simple (value) type. Simple properties are never autowired.
    pub const fn simple(name: &'static str) -> Self {
        Self {
            name,
            parent: None,
            interfaces: &[],
            simple: true,
        }
    }

    pub const fn extends(mut self, parent: &'static TypeInfo) -> Self {
        self.parent = Some(parent);
        self
    }

    pub const fn implements(mut self, interfaces: &'static [&'static TypeInfo]) -> Self {
        self.interfaces = interfaces;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn parent(&self) -> Option<&'static TypeInfo> {
        self.parent
    }

    pub fn interfaces(&self) -> &'static [&'static TypeInfo] {
        self.interfaces
    }

    pub fn is_simple(&self) -> bool {
        self.simple
    }

    pub fn is_object_root(&self) -> bool {
        std::ptr::eq(self, &builtin::OBJECT)
    }

    /// Superclass chain, nearest first. Interfaces are not included.
    pub fn ancestors(&self) -> Ancestors {
        Ancestors { next: self.parent }
    }

    /// Whether a value of type `other` may be used where `self` is declared
    pub fn is_assignable_from(&self, other: &TypeInfo) -> bool {
        if self.is_object_root() || self == other {
            return true;
        }
        if other.interfaces.iter().any(|i| self.is_assignable_from(i)) {
            return true;
        }
        match other.parent {
            Some(parent) => self.is_assignable_from(parent),
            None => false,
        }
    }

    /// Number of superclass steps above `arg_type` that `self` still accepts.
    ///
    /// Zero when `self` is exactly `arg_type` (or only accepts it through an
    /// interface); grows as the declared type moves toward the root. Every
    /// chain implicitly ends at `Object`, one step above its topmost type.
    pub fn ancestor_distance(&self, arg_type: &TypeInfo) -> u32 {
        if self == arg_type {
            return 0;
        }
        if self.is_object_root() {
            return arg_type.ancestors().count() as u32 + 1;
        }
        arg_type
            .ancestors()
            .take_while(|ancestor| self.is_assignable_from(ancestor))
            .count() as u32
    }
}

/// Iterator over a type's superclass chain
pub struct Ancestors {
    next: Option<&'static TypeInfo>,
}

impl Iterator for Ancestors {
    type Item = &'static TypeInfo;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent;
        Some(current)
    }
}

/// Types are identified by their static, not by name
impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for TypeInfo {}

impl Hash for TypeInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self, state);
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("name", &self.name)
            .field("parent", &self.parent.map(|p| p.name))
            .field(
                "interfaces",
                &self.interfaces.iter().map(|i| i.name).collect::<Vec<_>>(),
            )
            .field("simple", &self.simple)
            .finish()
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
