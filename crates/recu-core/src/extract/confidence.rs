//! Extraction confidence scoring.

use rust_decimal::Decimal;

use crate::models::receipt::Receipt;

const SHOP_WEIGHT: f32 = 0.3;
const ITEM_COUNT_WEIGHT: f32 = 0.3;
const TOTAL_WEIGHT: f32 = 0.2;
const COMPLETENESS_WEIGHT: f32 = 0.2;

/// Score an extraction's trustworthiness, in [0, 1].
///
/// Four independently capped factors, normalized by the sum of applied
/// weights: shop identified (all-or-nothing), item count (full credit at
/// `min_items`, half below, none at zero), a positive total found
/// (all-or-nothing), and the fraction of items carrying both a name and a
/// positive price. Pure; this is the sole admission signal for the AI
/// fallback decision.
pub fn confidence_score(receipt: &Receipt, min_items: usize) -> f32 {
    let mut score = 0.0f32;
    let mut weights = 0.0f32;

    // Factor 1: shop identification
    if receipt.merchant != "Unknown" {
        score += SHOP_WEIGHT;
    }
    weights += SHOP_WEIGHT;

    // Factor 2: item count
    let item_count = receipt.items.len();
    if item_count >= min_items {
        score += ITEM_COUNT_WEIGHT;
    } else if item_count > 0 {
        score += ITEM_COUNT_WEIGHT / 2.0;
    }
    weights += ITEM_COUNT_WEIGHT;

    // Factor 3: total amount found
    if receipt.total > Decimal::ZERO {
        score += TOTAL_WEIGHT;
    }
    weights += TOTAL_WEIGHT;

    // Factor 4: item completeness
    if !receipt.items.is_empty() {
        let complete = receipt
            .items
            .iter()
            .filter(|item| !item.name.trim().is_empty() && item.price > Decimal::ZERO)
            .count();
        score += COMPLETENESS_WEIGHT * complete as f32 / receipt.items.len() as f32;
    }
    weights += COMPLETENESS_WEIGHT;

    if weights > 0.0 { score / weights } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::receipt::ReceiptItem;

    fn item(name: &str, price: i64) -> ReceiptItem {
        ReceiptItem {
            name: name.to_string(),
            normalized_name: name.to_lowercase(),
            product_id: None,
            category: None,
            qty: Decimal::ONE,
            price: Decimal::new(price, 0),
            total: Decimal::new(price, 0),
            match_confidence: 0.0,
        }
    }

    fn receipt(merchant: &str, items: Vec<ReceiptItem>, total: i64) -> Receipt {
        Receipt {
            merchant: merchant.to_string(),
            date: None,
            items,
            subtotal: None,
            tax: None,
            total: Decimal::new(total, 0),
            currency: "CDF".to_string(),
        }
    }

    #[test]
    fn test_full_score() {
        let r = receipt(
            "Shoprite",
            vec![item("a", 100), item("b", 200), item("c", 300)],
            600,
        );
        assert_eq!(confidence_score(&r, 3), 1.0);
    }

    #[test]
    fn test_empty_extraction_scores_zero() {
        let r = receipt("Unknown", vec![], 0);
        assert_eq!(confidence_score(&r, 3), 0.0);
    }

    #[test]
    fn test_partial_item_credit() {
        let full = receipt("Unknown", vec![item("a", 100), item("b", 100), item("c", 100)], 0);
        let partial = receipt("Unknown", vec![item("a", 100)], 0);
        let none = receipt("Unknown", vec![], 0);

        assert!(confidence_score(&full, 3) > confidence_score(&partial, 3));
        assert!(confidence_score(&partial, 3) > confidence_score(&none, 3));
    }

    #[test]
    fn test_adding_total_never_decreases_score() {
        let without = receipt("Shoprite", vec![item("a", 100)], 0);
        let with = receipt("Shoprite", vec![item("a", 100)], 100);
        assert!(confidence_score(&with, 3) >= confidence_score(&without, 3));
    }

    #[test]
    fn test_incomplete_item_never_increases_score() {
        // With the item-count factor already saturated, an empty zero-price
        // item can only dilute the completeness ratio.
        let clean = receipt(
            "Shoprite",
            vec![item("a", 100), item("b", 100), item("c", 100)],
            300,
        );
        let mut padded = clean.clone();
        padded.items.push(item("", 0));

        assert!(confidence_score(&padded, 3) < confidence_score(&clean, 3));
    }

    #[test]
    fn test_shop_identification_credit() {
        let known = receipt("Shoprite", vec![], 0);
        let unknown = receipt("Unknown", vec![], 0);
        assert!(confidence_score(&known, 3) > confidence_score(&unknown, 3));
    }
}
