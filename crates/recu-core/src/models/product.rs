//! Canonical product catalog models and normalization results.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A golden-record product that all raw spellings and aliases normalize to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalProduct {
    /// Unique product identifier (e.g. "PROD_001").
    pub product_id: String,

    /// Canonical lowercase product name.
    pub normalized_name: String,

    /// Product category (e.g. "Fruits", "Household").
    pub category: String,

    /// Unit of measure (e.g. "kg", "piece", "liter").
    pub unit_of_measure: String,

    /// Known French spellings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases_fr: Vec<String>,

    /// Known English spellings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases_en: Vec<String>,
}

/// Which cascade stage resolved a raw product name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    /// Verbatim hit on an indexed name or alias.
    Exact,
    /// Previously learned raw-text mapping.
    Learned,
    /// Exact hit after abbreviation expansion.
    Abbreviation,
    /// Exact hit after translating to the pivot language.
    Translation,
    /// Best fuzzy-similarity candidate above the floor.
    Fuzzy,
    /// Best semantic-embedding candidate, last resort.
    Semantic,
    /// No stage produced an accepted match.
    None,
}

impl MatchMethod {
    /// Stable string form for display and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMethod::Exact => "exact",
            MatchMethod::Learned => "learned",
            MatchMethod::Abbreviation => "abbreviation",
            MatchMethod::Translation => "translation",
            MatchMethod::Fuzzy => "fuzzy",
            MatchMethod::Semantic => "semantic",
            MatchMethod::None => "none",
        }
    }
}

/// A ranked alternative candidate attached for manual review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    pub product_id: String,
    pub normalized_name: String,
    pub score: f32,
}

/// Outcome of normalizing one raw product name against the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizationResult {
    /// Matched product, if any stage accepted a candidate.
    pub product_id: Option<String>,

    /// The matched product's canonical name, or the cleaned input when
    /// nothing matched.
    pub normalized_name: String,

    /// Category of the matched product.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Calibrated confidence in [0, 1].
    pub confidence: f32,

    /// Cascade stage that produced the match.
    pub match_method: MatchMethod,

    /// True when the match should be routed to manual review: no product
    /// matched, or confidence is below the acceptance threshold.
    pub needs_review: bool,

    /// Top-ranked alternatives by combined similarity, best first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<Suggestion>,
}

/// A learned shortcut from raw receipt text to a canonical product.
///
/// The key is the *cleaned* form of the raw text; future lookups of the
/// same cleaned text resolve with confidence 1.0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnedMapping {
    /// Cleaned raw text used as the lookup key.
    pub raw_text: String,

    /// Target product.
    pub product_id: String,

    /// Restricts the mapping to one shop when set; global otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shop_id: Option<String>,
}

/// One record of the batch normalization input format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItem {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Decimal>,
}

/// One batch output pair; results are returned in input order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub input: BatchItem,
    pub normalization: NormalizationResult,
}

/// A catalog search hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub product: CanonicalProduct,
    pub match_score: f32,
}
