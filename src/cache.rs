//! Process-wide store of rendered documents, keyed by document id (the
//! original URL). Populated as a side effect of search, read back by the
//! cached-content endpoint. Unbounded by design: entries live for the
//! process lifetime. TODO: bound this with an LRU once hit volume warrants.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

#[derive(Clone, Default)]
pub struct ResultCache {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a rendered document, replacing any previous entry for the id.
    pub fn put(&self, id: &str, document: String) {
        let mut map = self.inner.write().expect("cache lock poisoned");
        map.insert(id.to_string(), document);
    }

    /// Returns the rendered document for an id populated by a prior search.
    pub fn get(&self, id: &str) -> Option<String> {
        let map = self.inner.read().expect("cache lock poisoned");
        map.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().expect("cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_id_is_a_miss() {
        let cache = ResultCache::new();
        assert!(cache.get("https://example.com/a").is_none());
    }

    #[test]
    fn put_then_get_returns_the_document() {
        let cache = ResultCache::new();
        cache.put("https://example.com/a", "Hello".to_string());
        assert_eq!(cache.get("https://example.com/a").as_deref(), Some("Hello"));
    }

    #[test]
    fn put_overwrites_previous_entry() {
        let cache = ResultCache::new();
        cache.put("id", "first".to_string());
        cache.put("id", "second".to_string());
        assert_eq!(cache.get("id").as_deref(), Some("second"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clones_share_the_same_store() {
        let cache = ResultCache::new();
        let other = cache.clone();
        cache.put("id", "doc".to_string());
        assert_eq!(other.get("id").as_deref(), Some("doc"));
    }
}
