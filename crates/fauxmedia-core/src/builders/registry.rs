//! Builder registry: name -> URL builder, fixed after construction

use std::collections::HashMap;
use std::sync::Arc;

use super::{PlaceholderUrlBuilder, BUILTIN_BUILDERS};
use crate::error::AppError;

/// Canonical form of a builder name: lower-case, `-` folded to `_`.
pub fn normalize_builder_name(name: &str) -> String {
    name.trim().to_ascii_lowercase().replace('-', "_")
}

/// Registry of named placeholder builders.
///
/// Populated once at startup and shared behind an `Arc`; there is no way to mutate it
/// after it has been handed to the resolver.
#[derive(Clone)]
pub struct BuilderRegistry {
    builders: HashMap<String, Arc<dyn PlaceholderUrlBuilder>>,
}

impl BuilderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            builders: HashMap::new(),
        }
    }

    /// Registry holding every built-in builder.
    pub fn builtin() -> Self {
        BUILTIN_BUILDERS
            .iter()
            .fold(Self::new(), |registry, (name, builder)| {
                registry.with_builder(name, *builder)
            })
    }

    /// Add (or replace) a builder under `name`.
    pub fn with_builder(
        mut self,
        name: &str,
        builder: impl PlaceholderUrlBuilder + 'static,
    ) -> Self {
        self.builders
            .insert(normalize_builder_name(name), Arc::new(builder));
        self
    }

    /// Look up a builder by (un-normalized) name.
    pub fn get(&self, name: &str) -> Result<Arc<dyn PlaceholderUrlBuilder>, AppError> {
        self.builders
            .get(&normalize_builder_name(name))
            .cloned()
            .ok_or_else(|| AppError::UnknownPlaceholderBuilder(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.builders.contains_key(&normalize_builder_name(name))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.builders.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.builders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }
}

impl Default for BuilderRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
