//! Persistence collaborators and shared runtime stores.
//!
//! The pipeline never touches files directly: catalogs, templates, and
//! learning history go through the store traits, assumed crash-consistent
//! (a load always returns the last successfully saved state). JSON-file and
//! in-memory implementations are provided.

pub mod json;
pub mod memory;

use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::PersistenceError;
use crate::learning::LearningSample;
use crate::models::product::{CanonicalProduct, LearnedMapping};
use crate::models::template::ShopTemplate;

/// The full persisted catalog document: products plus learned mappings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub products: Vec<CanonicalProduct>,
    #[serde(default)]
    pub mappings: Vec<LearnedMapping>,
}

/// Load/save collaborator for the product catalog.
pub trait CatalogStore: Send + Sync {
    fn load(&self) -> Result<CatalogSnapshot, PersistenceError>;
    fn save(&self, snapshot: &CatalogSnapshot) -> Result<(), PersistenceError>;
}

/// Load/save collaborator for shop templates, keyed by shop id.
pub trait TemplateStore: Send + Sync {
    fn load(&self) -> Result<HashMap<String, ShopTemplate>, PersistenceError>;
    fn save(&self, templates: &HashMap<String, ShopTemplate>) -> Result<(), PersistenceError>;
}

/// Load/save collaborator for the append-only learning history.
pub trait LearningStore: Send + Sync {
    fn load(&self) -> Result<Vec<LearningSample>, PersistenceError>;
    fn save(&self, samples: &[LearningSample]) -> Result<(), PersistenceError>;
}

/// Shared, read-mostly template map with single-writer updates.
///
/// Readers get snapshot clones, so an upsert becomes visible to documents
/// started after the write without interrupting in-flight ones. When a
/// backing store is attached, every upsert writes through.
pub struct TemplateLibrary {
    templates: RwLock<HashMap<String, ShopTemplate>>,
    store: Option<Box<dyn TemplateStore>>,
}

impl TemplateLibrary {
    /// Library over an in-memory template map, no persistence.
    pub fn new(templates: HashMap<String, ShopTemplate>) -> Self {
        Self {
            templates: RwLock::new(templates),
            store: None,
        }
    }

    /// Library loaded from a template store; upserts write through.
    pub fn with_store(store: Box<dyn TemplateStore>) -> Result<Self, PersistenceError> {
        let templates = store.load()?;
        info!("loaded {} shop templates", templates.len());
        Ok(Self {
            templates: RwLock::new(templates),
            store: Some(store),
        })
    }

    /// Snapshot clone of one shop's template.
    pub fn get(&self, shop_id: &str) -> Option<ShopTemplate> {
        self.templates.read().unwrap().get(shop_id).cloned()
    }

    /// Insert or replace a template, persisting through the backing store.
    pub fn upsert(&self, template: ShopTemplate) -> Result<(), PersistenceError> {
        let mut templates = self.templates.write().unwrap();
        templates.insert(template.shop_id.clone(), template);
        if let Some(store) = &self.store {
            store.save(&templates)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.templates.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.read().unwrap().is_empty()
    }

    /// Shop ids with a template, sorted.
    pub fn shop_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.templates.read().unwrap().keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl Default for TemplateLibrary {
    fn default() -> Self {
        Self::new(HashMap::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::template::TemplateProvenance;
    use super::memory::MemoryTemplateStore;

    #[test]
    fn test_upsert_and_get() {
        let library = TemplateLibrary::default();
        assert!(library.get("Shoprite").is_none());

        library.upsert(ShopTemplate::curated("Shoprite")).unwrap();
        let template = library.get("Shoprite").unwrap();
        assert_eq!(template.provenance, TemplateProvenance::Curated);
        assert_eq!(library.len(), 1);
    }

    #[test]
    fn test_upsert_overwrites() {
        let library = TemplateLibrary::default();
        library.upsert(ShopTemplate::curated("KinMart")).unwrap();

        let mut learned = ShopTemplate::curated("KinMart");
        learned.provenance = TemplateProvenance::Learned;
        learned.confidence_threshold = 0.7;
        library.upsert(learned).unwrap();

        let template = library.get("KinMart").unwrap();
        assert_eq!(template.provenance, TemplateProvenance::Learned);
        assert_eq!(library.len(), 1);
    }

    #[test]
    fn test_write_through_to_store() {
        let store = MemoryTemplateStore::default();
        let library = TemplateLibrary::with_store(Box::new(store.clone())).unwrap();

        library.upsert(ShopTemplate::curated("Engen")).unwrap();

        let persisted = store.load().unwrap();
        assert!(persisted.contains_key("Engen"));
    }
}
