use std::collections::HashMap;

use crate::foundation::{TypeInfo, Value};

/// Memoized ancestor distances between declared and runtime types
#[derive(Debug, Default)]
pub struct TypeDifferenceCache {
    distances: HashMap<(&'static TypeInfo, &'static TypeInfo), u32>,
}

impl TypeDifferenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of per-argument ancestor distances, or `None` when an argument is
    /// not assignable to its parameter. `Null` arguments add nothing.
    pub fn weight(&mut self, parameter_types: &[&'static TypeInfo], args: &[Value]) -> Option<u32> {
        if parameter_types.len() != args.len() {
            return None;
        }

        let mut total = 0u32;
        for (param, arg) in parameter_types.iter().zip(args) {
            if !arg.is_assignable_to(param) {
                return None;
            }
            if let Some(arg_type) = arg.type_info() {
                let distance = *self
                    .distances
                    .entry((*param, arg_type))
                    .or_insert_with(|| param.ancestor_distance(arg_type));
                total = total.saturating_add(distance);
            }
        }
        Some(total)
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }
}

/// Uncached type-difference weight
pub fn type_difference_weight(parameter_types: &[&'static TypeInfo], args: &[Value]) -> Option<u32> {
    TypeDifferenceCache::new().weight(parameter_types, args)
}
