//! Hybrid extraction pipeline.
//!
//! One document runs Init -> LocalExtract -> ConfidenceCheck ->
//! {AcceptLocal | AiFallback} -> LearnFromCorrection (optional) ->
//! NormalizeOutput -> Done. Any error lands in the Failed terminal state and
//! is reported inside the [`ProcessingResult`]; it never crosses the batch
//! boundary.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::ai::{AiExtraction, AiReceiptExtractor, RateLimiter};
use crate::error::{OcrError, RecuError, Result};
use crate::extract::confidence::confidence_score;
use crate::extract::shop::{ShopIdentifier, ShopIdentity};
use crate::extract::template::TemplateExtractor;
use crate::learning::LearningEngine;
use crate::models::config::RecuConfig;
use crate::models::receipt::{
    ProcessingMethod, ProcessingResult, ProcessingStats, Receipt, ReceiptItem,
};
use crate::normalize::ProductNormalizer;
use crate::ocr::OcrProvider;
use crate::store::TemplateLibrary;

/// The hybrid receipt processing orchestrator.
///
/// Stores and engines are injected once at construction; the processor
/// itself only reads them, so batches can run against a stable snapshot
/// while learning updates become visible to later documents.
pub struct ReceiptProcessor {
    shops: ShopIdentifier,
    extractor: TemplateExtractor,
    normalizer: Arc<ProductNormalizer>,
    learner: Arc<LearningEngine>,
    ocr: Option<Box<dyn OcrProvider>>,
    ai: Option<Box<dyn AiReceiptExtractor>>,
    rate_limiter: RateLimiter,
    config: RecuConfig,
    stats: Mutex<ProcessingStats>,
}

impl ReceiptProcessor {
    pub fn new(
        normalizer: Arc<ProductNormalizer>,
        templates: Arc<TemplateLibrary>,
        learner: Arc<LearningEngine>,
        config: RecuConfig,
    ) -> Self {
        let extractor = TemplateExtractor::new(
            templates,
            normalizer.clone(),
            config.extraction.default_currency.clone(),
        );
        let rate_limiter =
            RateLimiter::new(Duration::from_millis(config.ai.min_request_interval_ms));

        Self {
            shops: ShopIdentifier::new(),
            extractor,
            normalizer,
            learner,
            ocr: None,
            ai: None,
            rate_limiter,
            config,
            stats: Mutex::new(ProcessingStats::default()),
        }
    }

    /// Attach an OCR collaborator for image processing.
    pub fn with_ocr(mut self, ocr: Box<dyn OcrProvider>) -> Self {
        self.ocr = Some(ocr);
        self
    }

    /// Attach the external AI fallback. Without one, low-confidence
    /// documents keep their local result.
    pub fn with_ai(mut self, ai: Box<dyn AiReceiptExtractor>) -> Self {
        self.ai = Some(ai);
        self
    }

    /// Replace the shop identification rule table.
    pub fn with_shop_identifier(mut self, shops: ShopIdentifier) -> Self {
        self.shops = shops;
        self
    }

    /// Process a receipt image end to end: OCR, then the hybrid pipeline.
    pub fn process_image(&self, image: &[u8]) -> ProcessingResult {
        let start = Instant::now();

        let text = match &self.ocr {
            Some(ocr) => match ocr.extract_text(image) {
                Ok(text) if !text.trim().is_empty() => text,
                Ok(_) => return self.fail_early(RecuError::Ocr(OcrError::EmptyText), start),
                Err(error) => return self.fail_early(RecuError::Ocr(error), start),
            },
            None => {
                return self.fail_early(
                    RecuError::Config("no OCR provider configured".to_string()),
                    start,
                );
            }
        };

        self.run(Some(image), &text, start)
    }

    /// Process pre-extracted OCR text through the hybrid pipeline.
    pub fn process_text(&self, raw_text: &str) -> ProcessingResult {
        self.run(None, raw_text, Instant::now())
    }

    /// Process documents independently and in order. One document's failure
    /// never aborts its siblings.
    pub fn process_batch<S: AsRef<str>>(&self, raw_texts: &[S]) -> Vec<ProcessingResult> {
        raw_texts
            .iter()
            .map(|text| self.process_text(text.as_ref()))
            .collect()
    }

    /// Lifetime counters for this processor.
    pub fn stats(&self) -> ProcessingStats {
        *self.stats.lock().unwrap()
    }

    fn run(&self, image: Option<&[u8]>, raw_text: &str, start: Instant) -> ProcessingResult {
        self.stats.lock().unwrap().total_processed += 1;

        match self.run_pipeline(image, raw_text) {
            Ok((receipt, method, confidence)) => {
                {
                    let mut stats = self.stats.lock().unwrap();
                    match method {
                        ProcessingMethod::Ai => stats.ai_fallback += 1,
                        _ => stats.local_success += 1,
                    }
                }
                let result = self.normalize_output(receipt, method, confidence, raw_text, start);
                info!(
                    "processed document via {:?} with confidence {confidence:.2} in {}ms",
                    method, result.processing_time_ms
                );
                result
            }
            Err(error) => {
                self.stats.lock().unwrap().failed += 1;
                self.run_failed(error, raw_text, start)
            }
        }
    }

    fn run_pipeline(
        &self,
        image: Option<&[u8]>,
        raw_text: &str,
    ) -> Result<(Receipt, ProcessingMethod, f32)> {
        // Init
        if raw_text.trim().is_empty() {
            return Err(RecuError::Input("empty raw text".to_string()));
        }

        // LocalExtract
        let shop = self.shops.identify(raw_text);
        let local = self.extractor.extract(&shop, raw_text);
        let local_confidence = confidence_score(&local, self.config.extraction.min_items);
        info!(
            "local extraction for {}: {} items, confidence {local_confidence:.2}",
            shop.label(),
            local.items.len()
        );

        // ConfidenceCheck
        let needs_fallback =
            local_confidence < self.config.extraction.min_confidence || shop.is_unknown();
        if !needs_fallback {
            return Ok((local, ProcessingMethod::Local, local_confidence));
        }

        // AiFallback: availability is a soft dependency.
        let Some(ai) = &self.ai else {
            info!("fallback warranted but no AI extractor configured; accepting local result");
            return Ok((local, ProcessingMethod::Local, local_confidence));
        };

        self.rate_limiter.acquire();
        match ai.extract(image, raw_text) {
            Ok(correction) if correction.success => {
                let confidence = correction
                    .confidence
                    .unwrap_or(self.config.ai.default_confidence);
                debug!("AI fallback succeeded with confidence {confidence:.2}");

                // LearnFromCorrection: only corrections of genuinely poor
                // local extractions feed the template learner.
                if local_confidence < self.config.learning.max_local_confidence {
                    match self.learner.learn_from_correction(
                        shop.label(),
                        raw_text,
                        &correction,
                        local_confidence,
                    ) {
                        Ok(true) => info!("learned template for {}", shop.label()),
                        Ok(false) => {}
                        Err(error) => warn!("failed to record learning sample: {error}"),
                    }
                }

                let receipt = self.receipt_from_ai(correction, &shop);
                Ok((receipt, ProcessingMethod::Ai, confidence))
            }
            Ok(_) => {
                warn!("AI fallback returned no usable data; keeping local result");
                Ok((local, ProcessingMethod::Local, local_confidence))
            }
            Err(error) => {
                warn!("AI fallback unavailable ({error}); keeping local result");
                Ok((local, ProcessingMethod::Local, local_confidence))
            }
        }
    }

    /// Convert a successful AI response into a raw receipt, running each
    /// item through the product normalizer. The AI result replaces the
    /// local extraction wholesale rather than being merged field by field.
    fn receipt_from_ai(&self, correction: AiExtraction, shop: &ShopIdentity) -> Receipt {
        let shop_scope = match shop {
            ShopIdentity::Known(shop_id) => Some(shop_id.as_str()),
            _ => None,
        };

        let items = correction
            .items
            .into_iter()
            .map(|item| {
                let normalized = self.normalizer.normalize(&item.name, shop_scope);
                ReceiptItem {
                    name: item.name,
                    normalized_name: normalized.normalized_name,
                    product_id: normalized.product_id,
                    category: normalized.category,
                    qty: item.quantity,
                    price: item.price,
                    total: item.quantity * item.price,
                    match_confidence: normalized.confidence,
                }
            })
            .collect();

        let merchant = if correction.merchant.trim().is_empty() {
            shop.label().to_string()
        } else {
            correction.merchant
        };

        Receipt {
            merchant,
            date: correction.date,
            items,
            subtotal: correction.subtotal,
            tax: correction.tax,
            total: correction.total.unwrap_or(Decimal::ZERO),
            currency: correction
                .currency
                .unwrap_or_else(|| self.config.extraction.default_currency.clone()),
        }
    }

    /// NormalizeOutput: enforce the output-shape invariants regardless of
    /// which path produced the receipt.
    fn normalize_output(
        &self,
        receipt: Receipt,
        method: ProcessingMethod,
        confidence: f32,
        raw_text: &str,
        start: Instant,
    ) -> ProcessingResult {
        let tolerance = self.config.extraction.total_tolerance;

        let mut items: Vec<ReceiptItem> = Vec::with_capacity(receipt.items.len());
        for mut item in receipt.items {
            item.name = item.name.trim().to_string();
            if item.name.is_empty() || item.price <= Decimal::ZERO {
                continue;
            }
            let expected = item.qty * item.price;
            if item.total == Decimal::ZERO || (item.total - expected).abs() > tolerance {
                item.total = expected;
            }
            items.push(item);
        }

        let mut total = receipt.total;
        if total == Decimal::ZERO && !items.is_empty() {
            total = items.iter().map(|item| item.total).sum();
        }

        ProcessingResult {
            success: true,
            merchant: receipt.merchant,
            date: receipt.date,
            items,
            subtotal: receipt.subtotal,
            tax: receipt.tax,
            total,
            currency: receipt.currency,
            processing_method: method,
            confidence,
            raw_text: raw_text.to_string(),
            error: None,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Failure before the pipeline proper (OCR stage): counted and surfaced.
    fn fail_early(&self, error: RecuError, start: Instant) -> ProcessingResult {
        let mut stats = self.stats.lock().unwrap();
        stats.total_processed += 1;
        stats.failed += 1;
        drop(stats);
        self.run_failed(error, "", start)
    }

    /// Failed terminal state: surfaced in the result, never raised.
    fn run_failed(&self, error: RecuError, raw_text: &str, start: Instant) -> ProcessingResult {
        warn!("document processing failed: {error}");
        ProcessingResult {
            success: false,
            merchant: "Unknown".to_string(),
            date: None,
            items: Vec::new(),
            subtotal: None,
            tax: None,
            total: Decimal::ZERO,
            currency: self.config.extraction.default_currency.clone(),
            processing_method: ProcessingMethod::Failed,
            confidence: 0.0,
            raw_text: raw_text.to_string(),
            error: Some(error.to_string()),
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}
