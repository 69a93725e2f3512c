//! Cache port for the table backend's read-through translation cache.
//!
//! The store is authoritative; cache entries are advisory. Every write to a
//! `(language, namespace)` pair invalidates the corresponding entry before
//! the write returns, so a read after a racing write always sees the store.

use std::collections::HashMap;

use serde_json::{Map, Value};

pub trait Cache {
    fn get(&self, key: &str) -> Option<Map<String, Value>>;
    fn set(&mut self, key: &str, value: Map<String, Value>);
    fn invalidate(&mut self, key: &str);
}

/// Process-local in-memory cache, scoped to one store instance.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: HashMap<String, Map<String, Value>>,
}

impl Cache for MemoryCache {
    fn get(&self, key: &str) -> Option<Map<String, Value>> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Map<String, Value>) {
        self.entries.insert(key.to_string(), value);
    }

    fn invalidate(&mut self, key: &str) {
        self.entries.remove(key);
    }
}
