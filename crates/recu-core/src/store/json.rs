//! JSON-file store implementations.
//!
//! Each save rewrites the whole document, so a load always observes the last
//! successful save. A missing file loads as the empty document.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{CatalogSnapshot, CatalogStore, LearningStore, TemplateStore};
use crate::error::PersistenceError;
use crate::learning::LearningSample;
use crate::models::template::ShopTemplate;

fn load_json<T: DeserializeOwned + Default>(
    path: &PathBuf,
    what: &'static str,
) -> Result<T, PersistenceError> {
    if !path.exists() {
        return Ok(T::default());
    }
    let content = std::fs::read_to_string(path).map_err(|e| PersistenceError::Load {
        what,
        reason: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| PersistenceError::Load {
        what,
        reason: e.to_string(),
    })
}

fn save_json<T: Serialize>(path: &PathBuf, value: &T, what: &'static str) -> Result<(), PersistenceError> {
    let content = serde_json::to_string_pretty(value).map_err(|e| PersistenceError::Save {
        what,
        reason: e.to_string(),
    })?;
    std::fs::write(path, content).map_err(|e| PersistenceError::Save {
        what,
        reason: e.to_string(),
    })
}

/// Catalog persistence in a single JSON file.
pub struct JsonCatalogStore {
    path: PathBuf,
}

impl JsonCatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogStore for JsonCatalogStore {
    fn load(&self) -> Result<CatalogSnapshot, PersistenceError> {
        load_json(&self.path, "catalog")
    }

    fn save(&self, snapshot: &CatalogSnapshot) -> Result<(), PersistenceError> {
        save_json(&self.path, snapshot, "catalog")
    }
}

/// Template persistence in a single JSON file keyed by shop id.
pub struct JsonTemplateStore {
    path: PathBuf,
}

impl JsonTemplateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TemplateStore for JsonTemplateStore {
    fn load(&self) -> Result<HashMap<String, ShopTemplate>, PersistenceError> {
        load_json(&self.path, "templates")
    }

    fn save(&self, templates: &HashMap<String, ShopTemplate>) -> Result<(), PersistenceError> {
        save_json(&self.path, templates, "templates")
    }
}

/// Learning-history persistence in a single JSON file.
pub struct JsonLearningStore {
    path: PathBuf,
}

impl JsonLearningStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LearningStore for JsonLearningStore {
    fn load(&self) -> Result<Vec<LearningSample>, PersistenceError> {
        load_json(&self.path, "learning history")
    }

    fn save(&self, samples: &[LearningSample]) -> Result<(), PersistenceError> {
        save_json(&self.path, &samples, "learning history")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::product::CanonicalProduct;
    use crate::models::template::ShopTemplate;

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonCatalogStore::new(dir.path().join("catalog.json"));
        let snapshot = store.load().unwrap();
        assert!(snapshot.products.is_empty());
        assert!(snapshot.mappings.is_empty());
    }

    #[test]
    fn test_catalog_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonCatalogStore::new(dir.path().join("catalog.json"));

        let snapshot = CatalogSnapshot {
            products: vec![CanonicalProduct {
                product_id: "PROD_001".to_string(),
                normalized_name: "plantain".to_string(),
                category: "Fruits".to_string(),
                unit_of_measure: "kg".to_string(),
                aliases_fr: vec!["banane plantain".to_string()],
                aliases_en: vec!["plantain".to_string()],
            }],
            mappings: Vec::new(),
        };
        store.save(&snapshot).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.products.len(), 1);
        assert_eq!(loaded.products[0].product_id, "PROD_001");
    }

    #[test]
    fn test_template_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonTemplateStore::new(dir.path().join("templates.json"));

        let mut templates = HashMap::new();
        templates.insert(
            "Shoprite".to_string(),
            ShopTemplate::curated("Shoprite").with_total_pattern(r"TOTAL[:\s]*([0-9.,]+)"),
        );
        store.save(&templates).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(loaded["Shoprite"].total_pattern.is_some());
    }

    #[test]
    fn test_load_observes_last_save() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonTemplateStore::new(dir.path().join("templates.json"));

        let mut first = HashMap::new();
        first.insert("A".to_string(), ShopTemplate::curated("A"));
        store.save(&first).unwrap();

        let mut second = HashMap::new();
        second.insert("B".to_string(), ShopTemplate::curated("B"));
        store.save(&second).unwrap();

        let loaded = store.load().unwrap();
        assert!(loaded.contains_key("B"));
        assert!(!loaded.contains_key("A"));
    }
}
