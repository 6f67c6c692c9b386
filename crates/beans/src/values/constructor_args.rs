use std::collections::{BTreeMap, HashSet};

use crate::foundation::{TypeInfo, Value};

/// A declared constructor argument with an optional type hint
#[derive(Debug, Clone, PartialEq)]
pub struct ValueHolder {
    value: Value,
    type_hint: Option<String>,
}

impl ValueHolder {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            type_hint: None,
        }
    }

    pub fn typed(value: impl Into<Value>, type_hint: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            type_hint: Some(type_hint.into()),
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn type_hint(&self) -> Option<&str> {
        self.type_hint.as_deref()
    }

    /// Same hint, different value
    pub fn with_value(&self, value: Value) -> Self {
        Self {
            value,
            type_hint: self.type_hint.clone(),
        }
    }
}

/// Identifies a holder within a [`ConstructorArgumentValues`] so that each
/// generic argument is consumed at most once per constructor attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgumentSlot {
    Indexed(usize),
    Generic(usize),
}

/// Indexed and generic constructor arguments of a bean definition
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstructorArgumentValues {
    indexed: BTreeMap<usize, ValueHolder>,
    generic: Vec<ValueHolder>,
}

impl ConstructorArgumentValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_indexed(&mut self, index: usize, holder: ValueHolder) -> &mut Self {
        self.indexed.insert(index, holder);
        self
    }

    pub fn add_generic(&mut self, holder: ValueHolder) -> &mut Self {
        self.generic.push(holder);
        self
    }

    pub fn with_indexed(mut self, index: usize, value: impl Into<Value>) -> Self {
        self.add_indexed(index, ValueHolder::new(value));
        self
    }

    pub fn with_generic(mut self, value: impl Into<Value>) -> Self {
        self.add_generic(ValueHolder::new(value));
        self
    }

    pub fn indexed(&self) -> &BTreeMap<usize, ValueHolder> {
        &self.indexed
    }

    pub fn generic(&self) -> &[ValueHolder] {
        &self.generic
    }

    pub fn indexed_value(&self, index: usize) -> Option<&ValueHolder> {
        self.indexed.get(&index)
    }

    /// Total number of declared arguments
    pub fn argument_count(&self) -> usize {
        self.indexed.len() + self.generic.len()
    }

    /// Minimum parameter count a constructor needs to accept these arguments
    pub fn min_argument_count(&self) -> usize {
        let highest = self.indexed.keys().next_back().map_or(0, |index| index + 1);
        self.argument_count().max(highest)
    }

    pub fn is_empty(&self) -> bool {
        self.indexed.is_empty() && self.generic.is_empty()
    }

    /// Find the argument for parameter `index` of type `required_type`.
    ///
    /// The indexed argument wins when it has no type hint or its hint names
    /// `required_type`. Otherwise the first generic argument not in `used`
    /// whose type hint names `required_type` or, without a hint, whose value
    /// is assignable to it.
    pub fn argument_value(
        &self,
        index: usize,
        required_type: &TypeInfo,
        used: &HashSet<ArgumentSlot>,
    ) -> Option<(ArgumentSlot, &ValueHolder)> {
        if let Some(holder) = self.indexed.get(&index) {
            if holder.type_hint().map_or(true, |hint| hint == required_type.name()) {
                return Some((ArgumentSlot::Indexed(index), holder));
            }
        }

        self.generic
            .iter()
            .enumerate()
            .filter(|(i, _)| !used.contains(&ArgumentSlot::Generic(*i)))
            .find(|(_, holder)| match holder.type_hint() {
                Some(hint) => hint == required_type.name(),
                None => holder.value().is_assignable_to(required_type),
            })
            .map(|(i, holder)| (ArgumentSlot::Generic(i), holder))
    }

    /// Overlay `child` onto a copy of `self`: indexed entries are replaced per
    /// index, generic entries are appended
    pub fn merged_with(&self, child: &ConstructorArgumentValues) -> ConstructorArgumentValues {
        let mut merged = self.clone();
        for (index, holder) in &child.indexed {
            merged.indexed.insert(*index, holder.clone());
        }
        merged.generic.extend(child.generic.iter().cloned());
        merged
    }
}
