//! Typed contract for the external AI extraction collaborator.
//!
//! The core depends only on this JSON-shaped request/response contract; the
//! transport (vendor API, HTTP client, credentials) lives behind the
//! [`AiReceiptExtractor`] trait. Implementations must surface missing
//! credentials and network failures as [`AiError::Unavailable`] rather than
//! panicking, and malformed payloads as [`AiError::ResponseFormat`].

use std::sync::Mutex;
use std::time::{Duration, Instant};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AiError;

/// One item in an AI extraction response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiItem {
    pub name: String,
    pub price: Decimal,
    #[serde(default = "default_quantity")]
    pub quantity: Decimal,
}

fn default_quantity() -> Decimal {
    Decimal::ONE
}

/// The response contract for AI receipt extraction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AiExtraction {
    /// Whether the service considers the extraction usable.
    pub success: bool,

    #[serde(default)]
    pub merchant: String,

    #[serde(default)]
    pub date: Option<String>,

    #[serde(default)]
    pub time: Option<String>,

    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default)]
    pub items: Vec<AiItem>,

    #[serde(default)]
    pub subtotal: Option<Decimal>,

    #[serde(default)]
    pub tax: Option<Decimal>,

    #[serde(default)]
    pub total: Option<Decimal>,

    /// Model-reported confidence, when the service provides one.
    #[serde(default)]
    pub confidence: Option<f32>,
}

/// External AI extraction collaborator.
pub trait AiReceiptExtractor: Send + Sync {
    /// Extract structured receipt data from an image and/or its OCR text.
    fn extract(&self, image: Option<&[u8]>, ocr_text: &str) -> Result<AiExtraction, AiError>;
}

/// Shared monotonic-clock rate limiter for outgoing AI calls.
///
/// `acquire` blocks the caller just long enough to keep at least the
/// configured interval between consecutive calls. The mutex makes it safe
/// to share across concurrent document-processing threads; callers queue on
/// the lock rather than racing the clock.
pub struct RateLimiter {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// Wait until the next request is allowed, then claim the slot.
    pub fn acquire(&self) {
        let mut last = self.last_request.lock().unwrap();
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                debug!("rate limiting AI call: waiting {wait:?}");
                std::thread::sleep(wait);
            }
        }
        *last = Some(Instant::now());
    }
}
