//! CLI command implementations.

pub mod batch;
pub mod catalog;
pub mod normalize;
pub mod process;
pub mod stats;
pub mod translate;

use std::path::Path;
use std::sync::Arc;

use recu_core::store::json::{JsonCatalogStore, JsonLearningStore, JsonTemplateStore};
use recu_core::{
    CatalogSnapshot, CatalogStore, LearningEngine, ProductNormalizer, ReceiptProcessor,
    RecuConfig, TemplateLibrary, seed,
};

/// Shared engines built once per invocation.
pub struct Context {
    pub config: RecuConfig,
    pub normalizer: Arc<ProductNormalizer>,
    pub templates: Arc<TemplateLibrary>,
    pub learner: Arc<LearningEngine>,
}

impl Context {
    /// Build the engine stack. With a data directory, catalog/templates/
    /// learning history live in JSON stores there (seeded on first run);
    /// without one, everything runs on the built-in seed catalog in memory.
    pub fn build(config_path: Option<&str>, data_dir: Option<&str>) -> anyhow::Result<Self> {
        let config = match config_path {
            Some(path) => RecuConfig::from_file(Path::new(path))?,
            None => RecuConfig::default(),
        };

        let (normalizer, templates, learner) = match data_dir {
            Some(dir) => {
                let dir = Path::new(dir);
                std::fs::create_dir_all(dir)?;

                let catalog_store = JsonCatalogStore::new(dir.join("catalog.json"));
                let snapshot = catalog_store.load()?;
                if snapshot.products.is_empty() {
                    catalog_store.save(&CatalogSnapshot {
                        products: seed::default_catalog(),
                        mappings: Vec::new(),
                    })?;
                }

                let normalizer = Arc::new(ProductNormalizer::with_store(
                    Box::new(catalog_store),
                    config.normalizer.clone(),
                )?);
                let templates = Arc::new(TemplateLibrary::with_store(Box::new(
                    JsonTemplateStore::new(dir.join("templates.json")),
                ))?);
                let learner = Arc::new(LearningEngine::with_store(
                    templates.clone(),
                    Box::new(JsonLearningStore::new(dir.join("learning_history.json"))),
                    config.learning.clone(),
                )?);
                (normalizer, templates, learner)
            }
            None => {
                let normalizer = Arc::new(ProductNormalizer::new(
                    seed::default_catalog(),
                    config.normalizer.clone(),
                ));
                let templates = Arc::new(TemplateLibrary::default());
                let learner =
                    Arc::new(LearningEngine::new(templates.clone(), config.learning.clone()));
                (normalizer, templates, learner)
            }
        };

        Ok(Self {
            config,
            normalizer,
            templates,
            learner,
        })
    }

    /// A processor over this context's engines. No AI transport is wired in
    /// the CLI, so low-confidence documents keep their local result.
    pub fn processor(&self) -> ReceiptProcessor {
        ReceiptProcessor::new(
            self.normalizer.clone(),
            self.templates.clone(),
            self.learner.clone(),
            self.config.clone(),
        )
    }
}
