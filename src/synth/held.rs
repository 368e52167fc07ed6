use std::{collections::HashSet, hash::Hash};

/// Keys currently pressed. Absence means "not held".
#[derive(Debug, Clone)]
pub struct HeldKeySet<K> {
    keys: HashSet<K>,
}

impl<K: Eq + Hash> HeldKeySet<K> {
    pub fn new() -> Self {
        Self {
            keys: HashSet::new(),
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        self.keys.contains(key)
    }

    /// Returns true if the key was not already held.
    pub fn insert(&mut self, key: K) -> bool {
        self.keys.insert(key)
    }

    /// Returns true if the key was held.
    pub fn remove(&mut self, key: &K) -> bool {
        self.keys.remove(key)
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.keys.iter()
    }
}

impl<K: Eq + Hash> Default for HeldKeySet<K> {
    fn default() -> Self {
        Self::new()
    }
}
