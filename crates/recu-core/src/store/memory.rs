//! In-memory stores for tests and ephemeral runs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{CatalogSnapshot, CatalogStore, LearningStore, TemplateStore};
use crate::error::PersistenceError;
use crate::learning::LearningSample;
use crate::models::template::ShopTemplate;

/// Catalog store backed by shared memory. Cloning shares the same state.
#[derive(Clone, Default)]
pub struct MemoryCatalogStore {
    inner: Arc<Mutex<CatalogSnapshot>>,
}

impl MemoryCatalogStore {
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        Self {
            inner: Arc::new(Mutex::new(snapshot)),
        }
    }
}

impl CatalogStore for MemoryCatalogStore {
    fn load(&self) -> Result<CatalogSnapshot, PersistenceError> {
        Ok(self.inner.lock().unwrap().clone())
    }

    fn save(&self, snapshot: &CatalogSnapshot) -> Result<(), PersistenceError> {
        *self.inner.lock().unwrap() = snapshot.clone();
        Ok(())
    }
}

/// Template store backed by shared memory.
#[derive(Clone, Default)]
pub struct MemoryTemplateStore {
    inner: Arc<Mutex<HashMap<String, ShopTemplate>>>,
}

impl TemplateStore for MemoryTemplateStore {
    fn load(&self) -> Result<HashMap<String, ShopTemplate>, PersistenceError> {
        Ok(self.inner.lock().unwrap().clone())
    }

    fn save(&self, templates: &HashMap<String, ShopTemplate>) -> Result<(), PersistenceError> {
        *self.inner.lock().unwrap() = templates.clone();
        Ok(())
    }
}

/// Learning-history store backed by shared memory.
#[derive(Clone, Default)]
pub struct MemoryLearningStore {
    inner: Arc<Mutex<Vec<LearningSample>>>,
}

impl LearningStore for MemoryLearningStore {
    fn load(&self) -> Result<Vec<LearningSample>, PersistenceError> {
        Ok(self.inner.lock().unwrap().clone())
    }

    fn save(&self, samples: &[LearningSample]) -> Result<(), PersistenceError> {
        *self.inner.lock().unwrap() = samples.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let store = MemoryTemplateStore::default();
        let alias = store.clone();

        let mut templates = HashMap::new();
        templates.insert("Shoprite".to_string(), ShopTemplate::curated("Shoprite"));
        store.save(&templates).unwrap();

        assert!(alias.load().unwrap().contains_key("Shoprite"));
    }

    #[test]
    fn test_catalog_default_is_empty() {
        let store = MemoryCatalogStore::default();
        assert!(store.load().unwrap().products.is_empty());
    }
}
