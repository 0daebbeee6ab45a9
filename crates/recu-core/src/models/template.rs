//! Shop extraction templates.

use serde::{Deserialize, Serialize};

/// Where a template came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateProvenance {
    /// Hand-written and shipped with the system.
    Curated,
    /// Synthesized from AI-corrected samples.
    Learned,
}

/// Extraction rules for one shop.
///
/// Patterns are stored as data (regex source strings), not code, so learned
/// templates can be synthesized and persisted safely. Item patterns must
/// expose three capture groups: (name, qty, price); qty may match empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopTemplate {
    pub shop_id: String,

    /// Item line pattern with (name, qty, price) capture groups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_pattern: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pattern: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtotal_pattern: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_pattern: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_pattern: Option<String>,

    /// Currency printed by this shop.
    pub currency: String,

    /// Acceptance threshold for extractions made with this template.
    /// Learned templates carry a lower threshold than curated ones.
    pub confidence_threshold: f32,

    pub provenance: TemplateProvenance,

    /// Number of corrected samples this template was synthesized from.
    /// Zero for curated templates.
    #[serde(default)]
    pub sample_count: u32,
}

impl ShopTemplate {
    /// Start a curated template with default currency and threshold.
    pub fn curated(shop_id: impl Into<String>) -> Self {
        Self {
            shop_id: shop_id.into(),
            item_pattern: None,
            total_pattern: None,
            subtotal_pattern: None,
            tax_pattern: None,
            date_pattern: None,
            currency: "CDF".to_string(),
            confidence_threshold: 0.85,
            provenance: TemplateProvenance::Curated,
            sample_count: 0,
        }
    }

    pub fn with_item_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.item_pattern = Some(pattern.into());
        self
    }

    pub fn with_total_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.total_pattern = Some(pattern.into());
        self
    }

    pub fn with_subtotal_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.subtotal_pattern = Some(pattern.into());
        self
    }

    pub fn with_tax_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.tax_pattern = Some(pattern.into());
        self
    }

    pub fn with_date_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.date_pattern = Some(pattern.into());
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curated_defaults() {
        let template = ShopTemplate::curated("Shoprite")
            .with_item_pattern(r"^(.+?)\s+(\d+)\s*x\s*([0-9.,]+)$");

        assert_eq!(template.shop_id, "Shoprite");
        assert_eq!(template.provenance, TemplateProvenance::Curated);
        assert_eq!(template.sample_count, 0);
        assert!(template.item_pattern.is_some());
        assert!(template.total_pattern.is_none());
    }

    #[test]
    fn test_template_roundtrip() {
        let template = ShopTemplate::curated("KinMart")
            .with_total_pattern(r"TOTAL[:\s]*([0-9.,]+)")
            .with_currency("USD");

        let json = serde_json::to_string(&template).unwrap();
        let back: ShopTemplate = serde_json::from_str(&json).unwrap();

        assert_eq!(back.shop_id, "KinMart");
        assert_eq!(back.currency, "USD");
        assert_eq!(back.total_pattern, template.total_pattern);
    }
}
