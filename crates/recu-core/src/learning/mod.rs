//! Template learning from AI-corrected extractions.
//!
//! Every accepted correction for a low-confidence local extraction is kept
//! as a [`LearningSample`]. Once a shop accumulates enough samples, a
//! permissive [`ShopTemplate`] is synthesized from them and written into the
//! shared template library with `learned` provenance. History is
//! append-only: synthesis never consumes samples, and re-running it
//! overwrites the previous learned template.

pub mod features;

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::ai::AiExtraction;
use crate::error::Result;
use crate::models::config::LearningConfig;
use crate::models::template::{ShopTemplate, TemplateProvenance};
use crate::store::{LearningStore, TemplateLibrary};
use features::{ItemFeatures, TextFeatures, item_features, text_features};

/// Fixed menus of multilingual field patterns considered during synthesis.
/// Each entry pairs the trigger keyword with the candidate pattern.
const TOTAL_MENU: &[(&str, &str)] = &[
    ("TOTAL", r"TOTAL[:\s]*([0-9][0-9 .,]*)"),
    ("MONTANT", r"MONTANT[:\s]*([0-9][0-9 .,]*)"),
    ("SOMME", r"SOMME[:\s]*([0-9][0-9 .,]*)"),
];

const SUBTOTAL_MENU: &[(&str, &str)] = &[
    ("SOUS-TOTAL", r"SOUS[-\s]?TOTAL[:\s]*([0-9][0-9 .,]*)"),
    ("SUBTOTAL", r"SUBTOTAL[:\s]*([0-9][0-9 .,]*)"),
];

const TAX_MENU: &[(&str, &str)] = &[
    ("TVA", r"TVA[:\s]*([0-9][0-9 .,]*)"),
    ("TAXE", r"TAXE[:\s]*([0-9][0-9 .,]*)"),
    ("TAX", r"TAX[:\s]*([0-9][0-9 .,]*)"),
];

const DATE_FALLBACK: &str = r"(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})";
const TOTAL_FALLBACK: &str = r"TOTAL[:\s]*([0-9][0-9 .,]*)";

/// Items per sample considered when building item patterns.
const ITEMS_PER_SAMPLE: usize = 3;

/// One AI-corrected observation retained for pattern synthesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningSample {
    pub shop_id: String,
    pub raw_text: String,
    pub correction: AiExtraction,
    /// Local confidence at capture time (the value that triggered fallback).
    pub local_confidence: f32,
    pub recorded_at: DateTime<Utc>,
    pub text_features: TextFeatures,
    pub item_features: ItemFeatures,
}

/// Aggregate statistics over the learning history.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LearningStats {
    pub total_samples: usize,
    pub shops_learned: usize,
    pub average_local_confidence: f32,
}

/// Accumulates corrected samples and synthesizes shop templates.
pub struct LearningEngine {
    templates: Arc<TemplateLibrary>,
    samples: Mutex<Vec<LearningSample>>,
    store: Option<Box<dyn LearningStore>>,
    config: LearningConfig,
}

impl LearningEngine {
    /// Engine with in-memory history only.
    pub fn new(templates: Arc<TemplateLibrary>, config: LearningConfig) -> Self {
        Self {
            templates,
            samples: Mutex::new(Vec::new()),
            store: None,
            config,
        }
    }

    /// Engine with history loaded from (and persisted to) a store.
    pub fn with_store(
        templates: Arc<TemplateLibrary>,
        store: Box<dyn LearningStore>,
        config: LearningConfig,
    ) -> Result<Self> {
        let samples = store.load()?;
        info!("loaded {} learning samples", samples.len());
        Ok(Self {
            templates,
            samples: Mutex::new(samples),
            store: Some(store),
            config,
        })
    }

    /// Record an AI correction for a low-confidence local extraction.
    ///
    /// Returns `Ok(true)` when the shop's template was (re)synthesized as a
    /// result. Corrections for already-adequate local extractions
    /// (`local_confidence >= max_local_confidence`) and unsuccessful
    /// corrections are rejected without recording. Sample accumulation and
    /// synthesis happen under one lock, so concurrent corrections for the
    /// same shop cannot lose updates.
    pub fn learn_from_correction(
        &self,
        shop_id: &str,
        raw_text: &str,
        correction: &AiExtraction,
        local_confidence: f32,
    ) -> Result<bool> {
        if local_confidence >= self.config.max_local_confidence {
            debug!("local confidence {local_confidence:.2} already adequate; not learning");
            return Ok(false);
        }
        if !correction.success {
            debug!("correction unsuccessful; not learning");
            return Ok(false);
        }

        let sample = LearningSample {
            shop_id: shop_id.to_string(),
            raw_text: raw_text.to_string(),
            correction: correction.clone(),
            local_confidence,
            recorded_at: Utc::now(),
            text_features: text_features(raw_text),
            item_features: item_features(&correction.items),
        };

        let mut samples = self.samples.lock().unwrap();
        samples.push(sample);
        info!(
            "recorded learning sample #{} for {shop_id}",
            samples.iter().filter(|s| s.shop_id == shop_id).count()
        );

        let updated = self.try_synthesize(&samples, shop_id)?;

        if let Some(store) = &self.store {
            store.save(&samples)?;
        }
        Ok(updated)
    }

    /// Re-run synthesis for a shop. Returns `Ok(false)` while the shop has
    /// fewer than `min_samples` samples.
    pub fn synthesize_template(&self, shop_id: &str) -> Result<bool> {
        let samples = self.samples.lock().unwrap();
        self.try_synthesize(&samples, shop_id)
    }

    /// Number of recorded samples for a shop.
    pub fn sample_count(&self, shop_id: &str) -> usize {
        self.samples
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.shop_id == shop_id)
            .count()
    }

    pub fn stats(&self) -> LearningStats {
        let samples = self.samples.lock().unwrap();
        if samples.is_empty() {
            return LearningStats::default();
        }

        let mut shops: Vec<&str> = samples.iter().map(|s| s.shop_id.as_str()).collect();
        shops.sort_unstable();
        shops.dedup();

        LearningStats {
            total_samples: samples.len(),
            shops_learned: shops.len(),
            average_local_confidence: samples.iter().map(|s| s.local_confidence).sum::<f32>()
                / samples.len() as f32,
        }
    }

    fn try_synthesize(&self, samples: &[LearningSample], shop_id: &str) -> Result<bool> {
        let shop_samples: Vec<&LearningSample> =
            samples.iter().filter(|s| s.shop_id == shop_id).collect();
        if shop_samples.len() < self.config.min_samples {
            return Ok(false);
        }

        let template = synthesize(shop_id, &shop_samples, self.config.learned_threshold);
        info!(
            "synthesized template for {shop_id} from {} samples",
            shop_samples.len()
        );
        self.templates.upsert(template)?;
        Ok(true)
    }
}

/// Build a permissive template from a shop's samples.
fn synthesize(shop_id: &str, samples: &[&LearningSample], threshold: f32) -> ShopTemplate {
    // Item patterns: anchor on each corrected item name with flexible
    // whitespace/quantity/price groups, then keep the most frequent.
    let mut item_patterns = Vec::new();
    for sample in samples {
        for item in sample.correction.items.iter().take(ITEMS_PER_SAMPLE) {
            let name = item.name.trim();
            if name.is_empty() {
                continue;
            }
            item_patterns.push(format!(
                r"({}.*?)\s+(\d+(?:[.,]\d+)?)?\s*[xX*]\s*([0-9][0-9 .,]*)",
                regex::escape(name)
            ));
        }
    }

    let total_pattern =
        select_field_pattern(TOTAL_MENU, samples, |s| s.correction.total.is_some())
            .or_else(|| Some(TOTAL_FALLBACK.to_string()));
    let subtotal_pattern =
        select_field_pattern(SUBTOTAL_MENU, samples, |s| s.correction.subtotal.is_some());
    let tax_pattern = select_field_pattern(TAX_MENU, samples, |s| s.correction.tax.is_some());
    // Dates and totals always get at least the default pattern.
    let date_pattern = Some(DATE_FALLBACK.to_string());

    ShopTemplate {
        shop_id: shop_id.to_string(),
        item_pattern: most_frequent(&item_patterns),
        total_pattern,
        subtotal_pattern,
        tax_pattern,
        date_pattern,
        currency: majority_currency(samples),
        confidence_threshold: threshold,
        provenance: TemplateProvenance::Learned,
        sample_count: samples.len() as u32,
    }
}

/// Pick a field pattern from the fixed menu: only keywords actually present
/// in a sample's raw text qualify, the keyword seen in the most samples
/// wins, and menu order breaks ties. The field is skipped entirely when the
/// correction never produced it.
fn select_field_pattern(
    menu: &[(&str, &str)],
    samples: &[&LearningSample],
    field_present: impl Fn(&LearningSample) -> bool,
) -> Option<String> {
    if !samples.iter().any(|s| field_present(s)) {
        return None;
    }

    let mut best: Option<(usize, &str)> = None;
    for &(keyword, pattern) in menu {
        let count = samples
            .iter()
            .filter(|s| s.raw_text.to_uppercase().contains(keyword))
            .count();
        // Strictly greater: earlier menu entries win ties.
        if count > 0 && best.is_none_or(|(best_count, _)| count > best_count) {
            best = Some((count, pattern));
        }
    }
    best.map(|(_, pattern)| pattern.to_string())
}

/// Most frequent value, first-seen order breaking ties.
fn most_frequent(values: &[String]) -> Option<String> {
    let mut best: Option<(&String, usize)> = None;
    for (index, value) in values.iter().enumerate() {
        if values[..index].contains(value) {
            continue;
        }
        let count = values.iter().filter(|v| *v == value).count();
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value.clone())
}

/// Majority currency across sample corrections, defaulting to CDF.
fn majority_currency(samples: &[&LearningSample]) -> String {
    let currencies: Vec<String> = samples
        .iter()
        .filter_map(|s| s.correction.currency.clone())
        .collect();
    most_frequent(&currencies).unwrap_or_else(|| "CDF".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::AiItem;
    use rust_decimal::Decimal;

    const RAW_TEXT: &str = "\
CHEZ MAMA BOUTIQUE
Plantain 2 x 1500
Pain 1 x 500
TOTAL: 3500
";

    fn correction() -> AiExtraction {
        AiExtraction {
            success: true,
            merchant: "Chez Mama".to_string(),
            date: Some("2024-03-12".to_string()),
            time: None,
            currency: Some("CDF".to_string()),
            items: vec![
                AiItem {
                    name: "Plantain".to_string(),
                    price: Decimal::new(1500, 0),
                    quantity: Decimal::new(2, 0),
                },
                AiItem {
                    name: "Pain".to_string(),
                    price: Decimal::new(500, 0),
                    quantity: Decimal::ONE,
                },
            ],
            subtotal: None,
            tax: None,
            total: Some(Decimal::new(3500, 0)),
            confidence: Some(0.9),
        }
    }

    fn engine() -> (Arc<TemplateLibrary>, LearningEngine) {
        let templates = Arc::new(TemplateLibrary::default());
        let engine = LearningEngine::new(templates.clone(), LearningConfig::default());
        (templates, engine)
    }

    #[test]
    fn test_rejects_adequate_local_confidence() {
        let (_, engine) = engine();
        let updated = engine
            .learn_from_correction("ShopX", RAW_TEXT, &correction(), 0.85)
            .unwrap();
        assert!(!updated);
        assert_eq!(engine.sample_count("ShopX"), 0);
    }

    #[test]
    fn test_rejects_unsuccessful_correction() {
        let (_, engine) = engine();
        let mut failed = correction();
        failed.success = false;
        let updated = engine
            .learn_from_correction("ShopX", RAW_TEXT, &failed, 0.4)
            .unwrap();
        assert!(!updated);
        assert_eq!(engine.sample_count("ShopX"), 0);
    }

    #[test]
    fn test_template_appears_at_min_samples() {
        let (templates, engine) = engine();

        for i in 0..2 {
            let updated = engine
                .learn_from_correction("ShopX", RAW_TEXT, &correction(), 0.4)
                .unwrap();
            assert!(!updated, "no template expected after {} samples", i + 1);
            assert!(templates.get("ShopX").is_none());
        }

        let updated = engine
            .learn_from_correction("ShopX", RAW_TEXT, &correction(), 0.4)
            .unwrap();
        assert!(updated);

        let template = templates.get("ShopX").unwrap();
        assert_eq!(template.provenance, TemplateProvenance::Learned);
        assert_eq!(template.confidence_threshold, 0.7);
        assert_eq!(template.sample_count, 3);
        assert!(template.item_pattern.is_some());
        assert_eq!(template.currency, "CDF");
    }

    #[test]
    fn test_synthesize_below_threshold_is_noop() {
        let (templates, engine) = engine();
        engine
            .learn_from_correction("ShopX", RAW_TEXT, &correction(), 0.4)
            .unwrap();

        assert!(!engine.synthesize_template("ShopX").unwrap());
        assert!(templates.get("ShopX").is_none());
    }

    #[test]
    fn test_samples_survive_synthesis() {
        let (_, engine) = engine();
        for _ in 0..3 {
            engine
                .learn_from_correction("ShopX", RAW_TEXT, &correction(), 0.4)
                .unwrap();
        }
        // Append-only history: synthesis must not consume samples.
        assert_eq!(engine.sample_count("ShopX"), 3);
        assert!(engine.synthesize_template("ShopX").unwrap());
        assert_eq!(engine.sample_count("ShopX"), 3);
    }

    #[test]
    fn test_field_patterns_filtered_by_presence() {
        let (templates, engine) = engine();
        for _ in 0..3 {
            engine
                .learn_from_correction("ShopX", RAW_TEXT, &correction(), 0.4)
                .unwrap();
        }

        let template = templates.get("ShopX").unwrap();
        // TOTAL appears in the raw text and the correction carries a total.
        assert_eq!(template.total_pattern.as_deref(), Some(r"TOTAL[:\s]*([0-9][0-9 .,]*)"));
        // The correction never produced subtotal or tax.
        assert!(template.subtotal_pattern.is_none());
        assert!(template.tax_pattern.is_none());
        assert!(template.date_pattern.is_some());
    }

    #[test]
    fn test_synthesized_item_pattern_matches_sample_text() {
        let (templates, engine) = engine();
        for _ in 0..3 {
            engine
                .learn_from_correction("ShopX", RAW_TEXT, &correction(), 0.4)
                .unwrap();
        }

        let template = templates.get("ShopX").unwrap();
        let pattern = template.item_pattern.unwrap();
        let regex = regex::RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .multi_line(true)
            .build()
            .unwrap();
        let caps = regex.captures(RAW_TEXT).unwrap();
        assert!(caps[1].starts_with("Plantain"));
    }

    #[test]
    fn test_stats() {
        let (_, engine) = engine();
        engine
            .learn_from_correction("ShopX", RAW_TEXT, &correction(), 0.4)
            .unwrap();
        engine
            .learn_from_correction("ShopY", RAW_TEXT, &correction(), 0.6)
            .unwrap();

        let stats = engine.stats();
        assert_eq!(stats.total_samples, 2);
        assert_eq!(stats.shops_learned, 2);
        assert!((stats.average_local_confidence - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_most_frequent_first_seen_tie_break() {
        let values = vec!["b".to_string(), "a".to_string(), "a".to_string(), "b".to_string()];
        assert_eq!(most_frequent(&values), Some("b".to_string()));
    }
}
