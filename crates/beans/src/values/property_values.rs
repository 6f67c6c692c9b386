use std::fmt;

use crate::errors::BeansError;
use crate::foundation::Value;
use crate::values::PropertyValue;

/// Ordered collection of property values with unique names.
///
/// Adding a value whose name is already present replaces the existing entry
/// in place, so the original position is kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyValues {
    entries: Vec<PropertyValue>,
}

impl PropertyValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from name/value pairs in iteration order
    pub fn from_map<I, K, V>(map: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut values = Self::new();
        for (name, value) in map {
            values.add_value(name, value);
        }
        values
    }

    /// Insert or replace by name
    pub fn add(&mut self, pv: PropertyValue) -> &mut Self {
        match self.position(pv.name()) {
            Some(index) => self.entries[index] = pv,
            None => self.entries.push(pv),
        }
        self
    }

    pub fn add_value(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.add(PropertyValue::new(name, value))
    }

    /// Builder-style variant of [`add_value`](Self::add_value)
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.add_value(name, value);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<PropertyValue> {
        self.position(name).map(|index| self.entries.remove(index))
    }

    /// Replace the entry at `index`.
    ///
    /// Any other entry carrying the same name is dropped so names stay unique.
    pub fn set_at(&mut self, index: usize, pv: PropertyValue) -> Result<(), BeansError> {
        if index >= self.entries.len() {
            return Err(BeansError::InvalidArgument {
                message: format!(
                    "index {} out of bounds for {} property values",
                    index,
                    self.entries.len()
                ),
            });
        }

        let duplicate = self
            .entries
            .iter()
            .enumerate()
            .find(|(i, existing)| *i != index && existing.name() == pv.name())
            .map(|(i, _)| i);

        self.entries[index] = pv;
        if let Some(i) = duplicate {
            self.entries.remove(i);
        }
        Ok(())
    }

    pub fn values(&self) -> &[PropertyValue] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.entries.iter().find(|pv| pv.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PropertyValue> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|pv| pv.name())
    }

    /// Entries of `self` that are absent from `old` or carry a different value
    pub fn changes_since(&self, old: &PropertyValues) -> PropertyValues {
        let mut changes = PropertyValues::new();
        if std::ptr::eq(self, old) {
            return changes;
        }

        for pv in &self.entries {
            match old.get(pv.name()) {
                Some(previous) if previous == pv => {}
                _ => {
                    changes.add(pv.clone());
                }
            }
        }
        changes
    }

    /// Overlay `other` onto a copy of `self`; entries of `other` win by name
    pub fn merged_with(&self, other: &PropertyValues) -> PropertyValues {
        let mut merged = self.clone();
        for pv in other.iter() {
            merged.add(pv.clone());
        }
        merged
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|pv| pv.name() == name)
    }
}

impl FromIterator<PropertyValue> for PropertyValues {
    fn from_iter<T: IntoIterator<Item = PropertyValue>>(iter: T) -> Self {
        let mut values = Self::new();
        for pv in iter {
            values.add(pv);
        }
        values
    }
}

impl IntoIterator for PropertyValues {
    type Item = PropertyValue;
    type IntoIter = std::vec::IntoIter<PropertyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a PropertyValues {
    type Item = &'a PropertyValue;
    type IntoIter = std::slice::Iter<'a, PropertyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Display for PropertyValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.entries.iter().map(|pv| pv.to_string()).collect();
        write!(
            f,
            "PropertyValues: length={}; {}",
            self.entries.len(),
            rendered.join(",")
        )
    }
}
