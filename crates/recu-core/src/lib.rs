//! Core library for hybrid receipt extraction and product normalization.
//!
//! This crate provides:
//! - Shop identification and template-based field extraction from OCR'd
//!   receipt text
//! - A cascading product normalizer against a canonical catalog (learned
//!   mappings, exact, abbreviation, translation, fuzzy, semantic)
//! - A confidence-scored hybrid pipeline with an external AI fallback
//! - A learning loop that synthesizes shop templates from corrected samples
//!
//! OCR, the AI extraction service, and persistence are collaborators behind
//! traits; the core is synchronous and deterministic.

pub mod ai;
pub mod error;
pub mod extract;
pub mod learning;
pub mod models;
pub mod normalize;
pub mod ocr;
pub mod pipeline;
pub mod seed;
pub mod store;

pub use ai::{AiExtraction, AiItem, AiReceiptExtractor, RateLimiter};
pub use error::{AiError, OcrError, PersistenceError, RecuError, Result, TemplateError};
pub use extract::{ShopIdentifier, ShopIdentity, TemplateExtractor, confidence_score};
pub use learning::{LearningEngine, LearningSample, LearningStats};
pub use models::config::RecuConfig;
pub use models::product::{
    BatchItem, BatchOutcome, CanonicalProduct, LearnedMapping, MatchMethod, NormalizationResult,
    SearchHit, Suggestion,
};
pub use models::receipt::{
    ProcessingMethod, ProcessingResult, ProcessingStats, Receipt, ReceiptItem,
};
pub use models::template::{ShopTemplate, TemplateProvenance};
pub use normalize::{ProductNormalizer, clean_text};
pub use ocr::OcrProvider;
pub use pipeline::ReceiptProcessor;
pub use store::{CatalogSnapshot, CatalogStore, LearningStore, TemplateLibrary, TemplateStore};
