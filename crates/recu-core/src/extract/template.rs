//! Template-driven receipt extraction with a generic fallback.
//!
//! When a shop has a [`ShopTemplate`], its item pattern is applied globally
//! and each per-field pattern once against the whole text. When no template
//! exists, or the template cannot be applied, a generic line scanner looks
//! for `name <qty> x <price>` shapes. The generic path is a defined
//! fallback branch keyed on the error kind, not an exception handler.

use std::sync::Arc;

use regex::RegexBuilder;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use super::amounts::{parse_amount, parse_quantity};
use super::patterns::{DATE_DEFAULT, GENERIC_ITEM, SUBTOTAL_DEFAULT, TAX_DEFAULT, TOTAL_DEFAULT};
use super::shop::ShopIdentity;
use crate::error::TemplateError;
use crate::models::receipt::{Receipt, ReceiptItem};
use crate::models::template::ShopTemplate;
use crate::normalize::ProductNormalizer;
use crate::store::TemplateLibrary;

/// Rule-based receipt extractor over the shared template library.
pub struct TemplateExtractor {
    templates: Arc<TemplateLibrary>,
    normalizer: Arc<ProductNormalizer>,
    default_currency: String,
}

impl TemplateExtractor {
    pub fn new(
        templates: Arc<TemplateLibrary>,
        normalizer: Arc<ProductNormalizer>,
        default_currency: impl Into<String>,
    ) -> Self {
        Self {
            templates,
            normalizer,
            default_currency: default_currency.into(),
        }
    }

    /// Extract a raw receipt. Never fails: template errors degrade to the
    /// generic extractor, missing fields stay empty.
    pub fn extract(&self, shop: &ShopIdentity, raw_text: &str) -> Receipt {
        match self.templates.get(shop.label()) {
            Some(template) => {
                info!("using {} template for {}", template_kind(&template), shop.label());
                match self.extract_with_template(&template, shop, raw_text) {
                    Ok(receipt) => receipt,
                    Err(error) => {
                        warn!("template for {} failed ({error}); using generic extractor", shop.label());
                        self.extract_generic(shop, raw_text)
                    }
                }
            }
            None => {
                debug!("no template for {}; using generic extractor", shop.label());
                self.extract_generic(shop, raw_text)
            }
        }
    }

    fn extract_with_template(
        &self,
        template: &ShopTemplate,
        shop: &ShopIdentity,
        text: &str,
    ) -> Result<Receipt, TemplateError> {
        let items = match &template.item_pattern {
            Some(pattern) => self.extract_items(pattern, shop, text)?,
            None => Vec::new(),
        };

        // Per-field failures are absorbed: the field stays empty and
        // extraction continues.
        let total = extract_amount_field(template.total_pattern.as_deref(), &TOTAL_DEFAULT, "total", text);
        let subtotal =
            extract_amount_field(template.subtotal_pattern.as_deref(), &SUBTOTAL_DEFAULT, "subtotal", text);
        let tax = extract_amount_field(template.tax_pattern.as_deref(), &TAX_DEFAULT, "tax", text);
        let date = extract_date_field(template.date_pattern.as_deref(), text);

        Ok(Receipt {
            merchant: shop.label().to_string(),
            date,
            items,
            subtotal,
            tax,
            total: total.unwrap_or(Decimal::ZERO),
            currency: template.currency.clone(),
        })
    }

    /// Apply the item pattern globally over the text. An uncompilable item
    /// pattern is unrecoverable for this template and triggers the generic
    /// fallback in the caller.
    fn extract_items(
        &self,
        pattern: &str,
        shop: &ShopIdentity,
        text: &str,
    ) -> Result<Vec<ReceiptItem>, TemplateError> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .multi_line(true)
            .build()
            .map_err(|e| TemplateError::InvalidPattern {
                field: "item",
                reason: e.to_string(),
            })?;

        let mut items = Vec::new();
        for caps in regex.captures_iter(text) {
            if caps.len() < 4 {
                // Pattern lacks the (name, qty, price) groups.
                continue;
            }
            let name = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
            if name.is_empty() {
                continue;
            }
            let qty = parse_quantity(caps.get(2).map(|m| m.as_str()));
            let price = caps
                .get(3)
                .and_then(|m| parse_amount(m.as_str()))
                .unwrap_or(Decimal::ZERO);

            items.push(self.build_item(shop, name, qty, price));
        }
        debug!("template matched {} item lines", items.len());
        Ok(items)
    }

    /// Generic fallback: scan line by line for `name <qty> x <price>`.
    fn extract_generic(&self, shop: &ShopIdentity, text: &str) -> Receipt {
        let mut items = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(caps) = GENERIC_ITEM.captures(line) {
                let name = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
                if name.is_empty() {
                    continue;
                }
                let qty = parse_quantity(caps.get(2).map(|m| m.as_str()));
                let price = caps
                    .get(3)
                    .and_then(|m| parse_amount(m.as_str()))
                    .unwrap_or(Decimal::ZERO);
                items.push(self.build_item(shop, name, qty, price));
            }
        }

        let total = TOTAL_DEFAULT
            .captures(text)
            .and_then(|caps| parse_amount(&caps[1]))
            .unwrap_or(Decimal::ZERO);

        Receipt {
            merchant: shop.label().to_string(),
            date: None,
            items,
            subtotal: None,
            tax: None,
            total,
            currency: self.default_currency.clone(),
        }
    }

    fn build_item(&self, shop: &ShopIdentity, name: &str, qty: Decimal, price: Decimal) -> ReceiptItem {
        let shop_scope = match shop {
            ShopIdentity::Known(shop_id) => Some(shop_id.as_str()),
            _ => None,
        };
        let normalized = self.normalizer.normalize(name, shop_scope);

        ReceiptItem {
            name: name.to_string(),
            normalized_name: normalized.normalized_name,
            product_id: normalized.product_id,
            category: normalized.category,
            qty,
            price,
            total: qty * price,
            match_confidence: normalized.confidence,
        }
    }
}

fn template_kind(template: &ShopTemplate) -> &'static str {
    match template.provenance {
        crate::models::template::TemplateProvenance::Curated => "curated",
        crate::models::template::TemplateProvenance::Learned => "learned",
    }
}

/// Apply a labeled-amount pattern once; first match wins. An invalid
/// template pattern is logged and treated as no match.
fn extract_amount_field(
    pattern: Option<&str>,
    default: &regex::Regex,
    field: &'static str,
    text: &str,
) -> Option<Decimal> {
    match pattern {
        Some(source) => match RegexBuilder::new(source).case_insensitive(true).multi_line(true).build() {
            Ok(regex) => regex
                .captures(text)
                .and_then(|caps| caps.get(1))
                .and_then(|m| parse_amount(m.as_str())),
            Err(error) => {
                warn!("invalid {field} pattern ({error}); field left empty");
                None
            }
        },
        None => default
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| parse_amount(m.as_str())),
    }
}

fn extract_date_field(pattern: Option<&str>, text: &str) -> Option<String> {
    match pattern {
        Some(source) => match RegexBuilder::new(source).case_insensitive(true).build() {
            Ok(regex) => regex
                .captures(text)
                .and_then(|caps| caps.get(1).or_else(|| caps.get(0)))
                .map(|m| m.as_str().to_string()),
            Err(error) => {
                warn!("invalid date pattern ({error}); field left empty");
                None
            }
        },
        None => DATE_DEFAULT.captures(text).map(|caps| caps[1].to_string()),
    }
}
