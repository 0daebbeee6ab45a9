//! Structural features extracted from corrected samples.
//!
//! Features describe where totals sit, which lines look like items, and how
//! items are formatted. They are persisted with each sample so synthesis can
//! be re-run and audited.

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ai::AiItem;

/// Keywords that mark a line as carrying a document total.
const TOTAL_KEYWORDS: &[&str] = &["total", "montant", "somme", "totaal"];

/// Position ratio below which a line counts as header, above as footer.
const HEADER_RATIO: f32 = 0.3;
const FOOTER_RATIO: f32 = 0.7;

lazy_static! {
    /// A line with at least one word and a digit looks like an item line.
    static ref ITEM_LINE: Regex = Regex::new(r"[a-zA-Z]{3,}.*\d").unwrap();
    static ref HAS_QUANTITY: Regex = Regex::new(r"\d+\s*[xX*]").unwrap();
    static ref HAS_PRICE: Regex = Regex::new(r"\d+[,.]\d{2}").unwrap();
}

/// A line carrying a total-like keyword.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TotalLine {
    pub line: String,
    pub position: usize,
    /// Position relative to document length, in [0, 1].
    pub ratio: f32,
}

/// A line that looks like an item (letters plus digits).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemLine {
    pub line: String,
    pub position: usize,
    pub has_quantity: bool,
    pub has_price: bool,
}

/// Structural features of one raw receipt text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextFeatures {
    pub total_lines: Vec<TotalLine>,
    pub item_lines: Vec<ItemLine>,
    pub header_lines: Vec<String>,
    pub footer_lines: Vec<String>,
}

/// Extract structural features from raw receipt text.
pub fn text_features(raw_text: &str) -> TextFeatures {
    let lines: Vec<&str> = raw_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let mut features = TextFeatures::default();
    if lines.is_empty() {
        return features;
    }

    let count = lines.len() as f32;
    for (position, line) in lines.iter().enumerate() {
        let lower = line.to_lowercase();

        if TOTAL_KEYWORDS.iter().any(|keyword| lower.contains(keyword)) {
            features.total_lines.push(TotalLine {
                line: line.to_string(),
                position,
                ratio: position as f32 / count,
            });
        }

        if ITEM_LINE.is_match(line) {
            features.item_lines.push(ItemLine {
                line: line.to_string(),
                position,
                has_quantity: HAS_QUANTITY.is_match(line),
                has_price: HAS_PRICE.is_match(line),
            });
        }

        let ratio = position as f32 / count;
        if ratio < HEADER_RATIO {
            features.header_lines.push(line.to_string());
        } else if ratio > FOOTER_RATIO {
            features.footer_lines.push(line.to_string());
        }
    }

    features
}

/// Formatting features observed across a correction's items.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemFeatures {
    /// Distinct non-unit quantity strings (e.g. "2", "2.5").
    pub quantity_formats: Vec<String>,
    /// Distinct price strings, two-decimal form.
    pub price_formats: Vec<String>,
    /// Punctuation separators observed inside item names.
    pub separators: Vec<String>,
}

/// Extract formatting features from corrected items.
pub fn item_features(items: &[AiItem]) -> ItemFeatures {
    let mut features = ItemFeatures::default();

    for item in items {
        if item.quantity != Decimal::ONE {
            push_unique(&mut features.quantity_formats, item.quantity.to_string());
        }

        if item.price > Decimal::ZERO {
            push_unique(&mut features.price_formats, format!("{:.2}", item.price));
        }

        for c in item.name.chars() {
            if !c.is_alphanumeric() && !c.is_whitespace() {
                push_unique(&mut features.separators, c.to_string());
            }
        }
    }

    features
}

fn push_unique(values: &mut Vec<String>, value: String) {
    if !values.contains(&value) {
        values.push(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    const SAMPLE: &str = "\
SHOPRITE SUPERMARKET
KINSHASA
Plantain 2 x 1500
Tomate 3 x 600.00
Merci de votre visite
TOTAL: 4800
";

    #[test]
    fn test_total_lines_detected() {
        let features = text_features(SAMPLE);
        assert_eq!(features.total_lines.len(), 1);
        let total = &features.total_lines[0];
        assert!(total.line.starts_with("TOTAL"));
        assert!(total.ratio > FOOTER_RATIO);
    }

    #[test]
    fn test_item_lines_detected() {
        let features = text_features(SAMPLE);
        let item_lines: Vec<&str> = features.item_lines.iter().map(|l| l.line.as_str()).collect();
        assert!(item_lines.contains(&"Plantain 2 x 1500"));
        assert!(item_lines.contains(&"Tomate 3 x 600.00"));

        let plantain = &features.item_lines[0];
        assert!(plantain.has_quantity);
        let tomate = features.item_lines.iter().find(|l| l.line.starts_with("Tomate")).unwrap();
        assert!(tomate.has_price);
    }

    #[test]
    fn test_header_and_footer_slices() {
        let features = text_features(SAMPLE);
        assert!(features.header_lines.contains(&"SHOPRITE SUPERMARKET".to_string()));
        assert!(features.footer_lines.iter().any(|l| l.starts_with("TOTAL")));
    }

    #[test]
    fn test_empty_text() {
        let features = text_features("  \n \n");
        assert!(features.total_lines.is_empty());
        assert!(features.item_lines.is_empty());
    }

    #[test]
    fn test_item_features() {
        let items = vec![
            AiItem {
                name: "Huile végétale 1L".to_string(),
                price: Decimal::from_str("2500").unwrap(),
                quantity: Decimal::from_str("2").unwrap(),
            },
            AiItem {
                name: "Pain".to_string(),
                price: Decimal::from_str("500").unwrap(),
                quantity: Decimal::ONE,
            },
        ];

        let features = item_features(&items);
        assert_eq!(features.quantity_formats, vec!["2"]);
        assert_eq!(features.price_formats, vec!["2500.00", "500.00"]);
        assert!(features.separators.is_empty());
    }
}
