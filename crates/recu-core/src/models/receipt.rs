//! Receipt and processing-result models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One parsed receipt line with its catalog normalization attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptItem {
    /// Item name as printed on the receipt.
    pub name: String,

    /// Canonical product name, or the cleaned raw name when unmatched.
    pub normalized_name: String,

    /// Matched catalog product, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,

    /// Category of the matched product.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Quantity; 1 when the receipt does not print one.
    pub qty: Decimal,

    /// Unit price.
    pub price: Decimal,

    /// Line total. Recomputed as qty x price during output normalization
    /// when the printed value is missing or inconsistent.
    pub total: Decimal,

    /// Normalization confidence for the product match.
    pub match_confidence: f32,
}

/// Raw extraction result for one receipt, before output normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Receipt {
    /// Shop display label ("Unknown" when unidentified).
    pub merchant: String,

    /// Receipt date as printed (raw matched string).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Parsed line items.
    pub items: Vec<ReceiptItem>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax: Option<Decimal>,

    /// Document total; zero when not found.
    pub total: Decimal,

    /// Currency tag. No conversion is performed.
    pub currency: String,
}

/// Which path produced the final result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingMethod {
    /// Rule-based local extraction.
    Local,
    /// External AI fallback.
    Ai,
    /// The document could not be processed.
    Failed,
}

/// Final output of one document run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub success: bool,

    pub merchant: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    pub items: Vec<ReceiptItem>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<Decimal>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax: Option<Decimal>,

    pub total: Decimal,

    pub currency: String,

    pub processing_method: ProcessingMethod,

    /// Confidence of the accepted extraction, in [0, 1].
    pub confidence: f32,

    /// Raw OCR text, kept for downstream validation.
    pub raw_text: String,

    /// Human-readable error when `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub processing_time_ms: u64,
}

/// Counters over a processor's lifetime.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ProcessingStats {
    pub total_processed: u64,
    pub local_success: u64,
    pub ai_fallback: u64,
    pub failed: u64,
}
