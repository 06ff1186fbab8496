use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Memoizes one value per key for the lifetime of the cache.
///
/// Ready values are served under a read lock. Building goes through a single
/// mutex shared by all keys, and the key is checked again once the mutex is
/// held, so concurrent first requests for a key build it exactly once and
/// never see a partial value.
#[derive(Debug)]
pub struct MemoCache<K, V> {
    ready: RwLock<HashMap<K, Arc<V>>>,
    build_lock: Mutex<()>,
}

impl<K, V> Default for MemoCache<K, V> {
    fn default() -> Self {
        Self {
            ready: RwLock::new(HashMap::new()),
            build_lock: Mutex::new(()),
        }
    }
}

impl<K: Eq + Hash + Clone, V> MemoCache<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_build<F>(&self, key: &K, build: F) -> Arc<V>
    where
        F: FnOnce(&K) -> V,
    {
        if let Some(value) = self.get(key) {
            return value;
        }

        let _guard = self
            .build_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(value) = self.get(key) {
            return value;
        }

        let value = Arc::new(build(key));
        self.ready
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.clone(), Arc::clone(&value));
        value
    }

    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.ready
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.ready
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
