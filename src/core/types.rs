//! Core types shared across depmap modules

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Module-resolved hook payload delivered by the host.
#[derive(Debug, Clone, Default)]
pub struct ModuleDescriptor {
    pub id: String,
    /// Source text; `None` records a size of zero.
    pub code: Option<String>,
    pub static_imports: Vec<String>,
    pub dynamic_imports: Vec<String>,
    pub exports: Vec<String>,
    pub is_entry: bool,
}

/// Chunk-rendered hook payload delivered by the host.
#[derive(Debug, Clone, Default)]
pub struct ChunkDescriptor {
    pub file_name: String,
    pub code: Option<String>,
    pub imports: Vec<String>,
    pub dynamic_imports: Vec<String>,
    pub exports: Vec<String>,
    pub is_entry: bool,
    pub facade_module_id: Option<String>,
}

/// Insertion-ordered string-keyed map.
///
/// Report consumers depend on first-seen ordering (largest-module
/// tie-breaks, depth-group membership), so a plain `HashMap` is not enough.
/// Replacing an existing key keeps its original position.
#[derive(Debug, Clone)]
pub struct OrderedMap<V> {
    keys: Vec<String>,
    entries: HashMap<String, V>,
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self {
            keys: Vec::new(),
            entries: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.entries.get_mut(key)
    }

    pub fn insert(&mut self, key: String, value: V) {
        if self.entries.insert(key.clone(), value).is_none() {
            self.keys.push(key);
        }
    }

    pub fn get_or_insert_with(&mut self, key: &str, default: impl FnOnce() -> V) -> &mut V {
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(slot) => slot.into_mut(),
            Entry::Vacant(slot) => {
                self.keys.push(key.to_string());
                slot.insert(default())
            }
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.keys.iter().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> + '_ {
        self.keys
            .iter()
            .filter_map(|k| self.entries.get(k).map(|v| (k.as_str(), v)))
    }

    /// Drops entries whose key fails the predicate, preserving order.
    pub fn retain(&mut self, mut pred: impl FnMut(&str) -> bool) {
        self.keys.retain(|k| pred(k));
        self.entries.retain(|k, _| pred(k));
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.keys.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
