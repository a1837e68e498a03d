// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Module cache for require()

use dashmap::DashMap;
use std::collections::BTreeMap;

use crate::module_system::value::{BUILTIN_MODULES, ModuleValue};

/// Thread-safe module cache.
///
/// Entries live for the lifetime of the cache. Concurrent writes to the same
/// key are last-writer-wins.
pub struct ModuleCache<E> {
    /// Cache mapping resolved locations or literal keys to values
    cache: DashMap<String, ModuleValue<E>>,
}

impl<E: Clone> ModuleCache<E> {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self {
            cache: DashMap::new(),
        }
    }

    /// Create a cache seeded with the builtin modules
    pub fn with_builtins() -> Self {
        let cache = Self::new();
        for (name, builtin) in BUILTIN_MODULES {
            cache.set(*name, ModuleValue::Builtin(*builtin));
        }
        cache
    }

    /// Get a cached value by key
    pub fn get(&self, key: &str) -> Option<ModuleValue<E>> {
        self.cache.get(key).map(|entry| entry.clone())
    }

    /// Check if a key is cached
    pub fn has(&self, key: &str) -> bool {
        self.cache.contains_key(key)
    }

    /// Store a value
    pub fn set(&self, key: impl Into<String>, value: ModuleValue<E>) {
        self.cache.insert(key.into(), value);
    }

    /// Copy the value at `key` to `alias`. Returns false if `key` is absent.
    pub fn alias(&self, alias: impl Into<String>, key: &str) -> bool {
        match self.get(key) {
            Some(value) => {
                self.set(alias, value);
                true
            }
            None => false,
        }
    }

    /// All cached keys, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.cache.iter().map(|entry| entry.key().clone()).collect();
        keys.sort();
        keys
    }

    /// Copy of every entry
    pub fn snapshot(&self) -> BTreeMap<String, ModuleValue<E>> {
        self.cache
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Get the number of cached entries
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl<E: Clone> Default for ModuleCache<E> {
    fn default() -> Self {
        Self::new()
    }
}
