//! Cascading product normalizer: raw receipt text to canonical product.
//!
//! Matching proceeds through cheap exact stages first (learned mappings,
//! catalog index, abbreviation expansion, translation pivot) and falls back
//! to fuzzy string similarity and finally semantic embeddings. The first
//! confident hit short-circuits the rest.

pub mod abbrev;
pub mod semantic;
pub mod similarity;
pub mod translate;

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::{debug, info};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::error::{RecuError, Result};
use crate::models::config::NormalizerConfig;
use crate::models::product::{
    BatchItem, BatchOutcome, CanonicalProduct, LearnedMapping, MatchMethod, NormalizationResult,
    SearchHit, Suggestion,
};
use crate::store::{CatalogSnapshot, CatalogStore};
use semantic::SemanticMatcher;
use similarity::combined_similarity;
use translate::{Language, Translator};

/// Confidence assigned to exact hits reached through a lossy transform
/// (abbreviation expansion or translation).
const TRANSFORMED_EXACT_CONFIDENCE: f32 = 0.95;

/// Stopwords removed during cleaning. French partitives ("de", "du") are
/// kept: they carry meaning in product names like "pomme de terre".
const NOISE_WORDS: &[&str] = &[
    "le", "la", "les", "un", "une", "et", "au", "aux", "en", "an", "of", "and", "with", "for",
];

/// Lowercase text with accents stripped (NFD, combining marks removed).
pub(crate) fn strip_accents(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Clean raw item text for matching: lowercase, strip accents, drop
/// punctuation, remove noise words, collapse whitespace.
pub fn clean_text(raw: &str) -> String {
    let folded = strip_accents(&raw.to_lowercase());
    let depunctuated: String = folded
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    depunctuated
        .split_whitespace()
        .filter(|word| !NOISE_WORDS.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Catalog index plus learned mappings, guarded by the normalizer's lock.
struct CatalogState {
    products: Vec<CanonicalProduct>,
    /// Cleaned alias -> product index; first insertion wins.
    by_alias: HashMap<String, usize>,
    /// (cleaned alias, product index) in insertion order, for similarity scans.
    alias_entries: Vec<(String, usize)>,
    /// Cleaned raw text -> product_id, global scope.
    global_mappings: HashMap<String, String>,
    /// (shop_id, cleaned raw text) -> product_id.
    shop_mappings: HashMap<(String, String), String>,
    matcher: SemanticMatcher,
}

impl CatalogState {
    fn build(products: Vec<CanonicalProduct>, mappings: Vec<LearnedMapping>) -> Self {
        let mut state = Self {
            products,
            by_alias: HashMap::new(),
            alias_entries: Vec::new(),
            global_mappings: HashMap::new(),
            shop_mappings: HashMap::new(),
            matcher: SemanticMatcher::tf_idf(),
        };

        for idx in 0..state.products.len() {
            state.index_product(idx);
        }
        for mapping in mappings {
            match mapping.shop_id {
                Some(shop) => {
                    state.shop_mappings.insert((shop, mapping.raw_text), mapping.product_id);
                }
                None => {
                    state.global_mappings.insert(mapping.raw_text, mapping.product_id);
                }
            }
        }
        state.refit_matcher();
        state
    }

    fn index_product(&mut self, idx: usize) {
        let product = self.products[idx].clone();
        let names = std::iter::once(&product.normalized_name)
            .chain(product.aliases_fr.iter())
            .chain(product.aliases_en.iter());

        for name in names {
            let cleaned = clean_text(name);
            if cleaned.is_empty() {
                continue;
            }
            if !self.alias_entries.iter().any(|(alias, i)| *i == idx && alias == &cleaned) {
                self.alias_entries.push((cleaned.clone(), idx));
            }
            self.by_alias.entry(cleaned).or_insert(idx);
        }
    }

    fn refit_matcher(&mut self) {
        let corpus: Vec<String> = self.alias_entries.iter().map(|(alias, _)| alias.clone()).collect();
        self.matcher.fit(&corpus);
    }

    fn product_index(&self, product_id: &str) -> Option<usize> {
        self.products.iter().position(|p| p.product_id == product_id)
    }

    /// Per-product best combined similarity against the query, ranked
    /// descending with catalog insertion order breaking ties.
    fn rank_by_similarity(&self, query: &str) -> Vec<(usize, f32)> {
        let mut best: HashMap<usize, f32> = HashMap::new();
        for (alias, idx) in &self.alias_entries {
            let score = combined_similarity(query, alias);
            let entry = best.entry(*idx).or_insert(0.0);
            if score > *entry {
                *entry = score;
            }
        }

        let mut ranked: Vec<(usize, f32)> = best.into_iter().collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        ranked
    }

    /// Best semantic candidate for the query.
    fn best_semantic(&self, query: &str) -> Option<(usize, f32)> {
        let mut best: Option<(usize, f32)> = None;
        for (alias, idx) in &self.alias_entries {
            let score = self.matcher.similarity(query, alias);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((*idx, score));
            }
        }
        best
    }

    fn snapshot(&self) -> CatalogSnapshot {
        let mut mappings: Vec<LearnedMapping> = self
            .global_mappings
            .iter()
            .map(|(raw, pid)| LearnedMapping {
                raw_text: raw.clone(),
                product_id: pid.clone(),
                shop_id: None,
            })
            .chain(self.shop_mappings.iter().map(|((shop, raw), pid)| LearnedMapping {
                raw_text: raw.clone(),
                product_id: pid.clone(),
                shop_id: Some(shop.clone()),
            }))
            .collect();
        mappings.sort_by(|a, b| (&a.shop_id, &a.raw_text).cmp(&(&b.shop_id, &b.raw_text)));

        CatalogSnapshot {
            products: self.products.clone(),
            mappings,
        }
    }
}

/// Cascading matcher against the canonical product catalog.
///
/// The catalog index, learned mappings, and TF-IDF model are read-mostly;
/// mutations (`learn_mapping`, `add_product`) go through the single writer
/// lock and are visible to subsequently started documents.
pub struct ProductNormalizer {
    state: RwLock<CatalogState>,
    translator: Translator,
    store: Option<Box<dyn CatalogStore>>,
    config: NormalizerConfig,
}

impl ProductNormalizer {
    /// Normalizer over an in-memory catalog, no persistence.
    pub fn new(products: Vec<CanonicalProduct>, config: NormalizerConfig) -> Self {
        info!("building product index over {} products", products.len());
        Self {
            state: RwLock::new(CatalogState::build(products, Vec::new())),
            translator: Translator::new(),
            store: None,
            config,
        }
    }

    /// Normalizer loaded from a catalog store; learn/add operations write
    /// through to the store.
    pub fn with_store(store: Box<dyn CatalogStore>, config: NormalizerConfig) -> Result<Self> {
        let snapshot = store.load()?;
        info!(
            "loaded catalog: {} products, {} learned mappings",
            snapshot.products.len(),
            snapshot.mappings.len()
        );
        Ok(Self {
            state: RwLock::new(CatalogState::build(snapshot.products, snapshot.mappings)),
            translator: Translator::new(),
            store: Some(store),
            config,
        })
    }

    /// Resolve raw item text to a canonical product.
    pub fn normalize(&self, raw: &str, shop_id: Option<&str>) -> NormalizationResult {
        let cleaned = clean_text(raw);
        let state = self.state.read().unwrap();

        if cleaned.is_empty() {
            return self.no_match(cleaned, 0.0, Vec::new());
        }

        // Suggestions are computed up front, independent of the accepted
        // match, so review UIs always get ranked alternatives.
        let ranked = state.rank_by_similarity(&cleaned);
        let suggestions = self.suggestions(&state, &ranked);

        // Learned mappings: shop scope first, then global.
        let learned = shop_id
            .and_then(|shop| state.shop_mappings.get(&(shop.to_string(), cleaned.clone())))
            .or_else(|| state.global_mappings.get(&cleaned));
        if let Some(product_id) = learned {
            if let Some(idx) = state.product_index(product_id) {
                debug!("learned mapping hit for {cleaned:?}");
                return self.accept(&state, idx, 1.0, MatchMethod::Learned, suggestions);
            }
        }

        // Exact catalog lookup.
        if let Some(&idx) = state.by_alias.get(&cleaned) {
            return self.accept(&state, idx, 1.0, MatchMethod::Exact, suggestions);
        }

        // Abbreviation expansion, then exact re-lookup.
        let expanded = abbrev::expand(&cleaned);
        if expanded != cleaned {
            if let Some(&idx) = state.by_alias.get(&expanded) {
                debug!("abbreviation hit: {cleaned:?} -> {expanded:?}");
                return self.accept(
                    &state,
                    idx,
                    TRANSFORMED_EXACT_CONFIDENCE,
                    MatchMethod::Abbreviation,
                    suggestions,
                );
            }
        }

        // Cross-language pivot, then exact re-lookup.
        let pivoted = match self.translator.detect_language(&cleaned) {
            Language::French => Some(self.translator.to_english(&cleaned)),
            Language::English => Some(self.translator.to_french(&cleaned)),
            Language::Unknown => None,
        };
        if let Some(pivoted) = pivoted {
            let pivot_cleaned = clean_text(&pivoted);
            if pivot_cleaned != cleaned {
                if let Some(&idx) = state.by_alias.get(&pivot_cleaned) {
                    debug!("translation hit: {cleaned:?} -> {pivot_cleaned:?}");
                    return self.accept(
                        &state,
                        idx,
                        TRANSFORMED_EXACT_CONFIDENCE,
                        MatchMethod::Translation,
                        suggestions,
                    );
                }
            }
        }

        // Fuzzy similarity cascade.
        let mut best_seen = 0.0f32;
        if let Some(&(idx, score)) = ranked.first() {
            best_seen = score;
            if score >= self.config.fuzzy_floor {
                return self.accept(&state, idx, score, MatchMethod::Fuzzy, suggestions);
            }
        }

        // Semantic fallback.
        if let Some((idx, score)) = state.best_semantic(&cleaned) {
            best_seen = best_seen.max(score);
            if score >= self.config.semantic_floor {
                return self.accept(&state, idx, score, MatchMethod::Semantic, suggestions);
            }
        }

        self.no_match(cleaned, best_seen, suggestions)
    }

    /// Record a raw-text shortcut to a product. Idempotent: re-learning the
    /// same pair overwrites. Store failures are surfaced, not swallowed.
    pub fn learn_mapping(&self, raw: &str, product_id: &str, shop_id: Option<&str>) -> Result<()> {
        let cleaned = clean_text(raw);
        if cleaned.is_empty() {
            return Err(RecuError::Input("cannot learn a mapping for empty text".to_string()));
        }

        let mut state = self.state.write().unwrap();
        if state.product_index(product_id).is_none() {
            return Err(RecuError::UnknownProduct(product_id.to_string()));
        }

        info!("learning mapping {cleaned:?} -> {product_id} (shop: {shop_id:?})");
        match shop_id {
            Some(shop) => {
                state
                    .shop_mappings
                    .insert((shop.to_string(), cleaned), product_id.to_string());
            }
            None => {
                state.global_mappings.insert(cleaned, product_id.to_string());
            }
        }

        self.persist(&state)
    }

    /// Add a product to the catalog and return its generated id.
    pub fn add_product(
        &self,
        normalized_name: &str,
        category: &str,
        unit_of_measure: &str,
        aliases_fr: Vec<String>,
        aliases_en: Vec<String>,
    ) -> Result<String> {
        let mut state = self.state.write().unwrap();
        let product_id = next_product_id(&state.products);

        state.products.push(CanonicalProduct {
            product_id: product_id.clone(),
            normalized_name: normalized_name.to_lowercase(),
            category: category.to_string(),
            unit_of_measure: unit_of_measure.to_string(),
            aliases_fr,
            aliases_en,
        });
        let idx = state.products.len() - 1;
        state.index_product(idx);
        state.refit_matcher();
        info!("added product {product_id}: {normalized_name}");

        self.persist(&state)?;
        Ok(product_id)
    }

    /// Rank the whole catalog against a query, truncated to `limit`.
    pub fn search_products(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        let cleaned = clean_text(query);
        if cleaned.is_empty() {
            return Vec::new();
        }

        let state = self.state.read().unwrap();
        state
            .rank_by_similarity(&cleaned)
            .into_iter()
            .take(limit)
            .map(|(idx, score)| SearchHit {
                product: state.products[idx].clone(),
                match_score: score,
            })
            .collect()
    }

    /// Normalize a batch of input records, preserving input order.
    pub fn normalize_batch(&self, items: &[BatchItem]) -> Vec<BatchOutcome> {
        items
            .iter()
            .map(|item| BatchOutcome {
                input: item.clone(),
                normalization: self.normalize(&item.name, None),
            })
            .collect()
    }

    /// Look up a product by id.
    pub fn product_info(&self, product_id: &str) -> Option<CanonicalProduct> {
        let state = self.state.read().unwrap();
        state.product_index(product_id).map(|idx| state.products[idx].clone())
    }

    pub fn product_count(&self) -> usize {
        self.state.read().unwrap().products.len()
    }

    fn persist(&self, state: &CatalogState) -> Result<()> {
        if let Some(store) = &self.store {
            store.save(&state.snapshot()).map_err(RecuError::Persistence)?;
        }
        Ok(())
    }

    fn suggestions(&self, state: &CatalogState, ranked: &[(usize, f32)]) -> Vec<Suggestion> {
        ranked
            .iter()
            .take(self.config.suggestion_limit)
            .map(|&(idx, score)| Suggestion {
                product_id: state.products[idx].product_id.clone(),
                normalized_name: state.products[idx].normalized_name.clone(),
                score,
            })
            .collect()
    }

    fn accept(
        &self,
        state: &CatalogState,
        idx: usize,
        confidence: f32,
        method: MatchMethod,
        suggestions: Vec<Suggestion>,
    ) -> NormalizationResult {
        let product = &state.products[idx];
        NormalizationResult {
            product_id: Some(product.product_id.clone()),
            normalized_name: product.normalized_name.clone(),
            category: Some(product.category.clone()),
            confidence,
            match_method: method,
            needs_review: confidence < self.config.accept_threshold,
            suggestions,
        }
    }

    fn no_match(&self, cleaned: String, best_seen: f32, suggestions: Vec<Suggestion>) -> NormalizationResult {
        NormalizationResult {
            product_id: None,
            normalized_name: cleaned,
            category: None,
            confidence: best_seen,
            match_method: MatchMethod::None,
            needs_review: true,
            suggestions,
        }
    }
}

fn next_product_id(products: &[CanonicalProduct]) -> String {
    let max_seen = products
        .iter()
        .filter_map(|p| p.product_id.strip_prefix("PROD_"))
        .filter_map(|suffix| suffix.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    format!("PROD_{:03}", max_seen + 1)
}
