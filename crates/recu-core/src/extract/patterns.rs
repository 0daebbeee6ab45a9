//! Default regex patterns for receipt field extraction.
//!
//! Shop templates may override any of these; the defaults cover the common
//! French/English receipt layouts. Label patterns are anchored to the line
//! start so "SOUS-TOTAL" lines do not satisfy the TOTAL pattern.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Labeled amounts
    pub static ref TOTAL_DEFAULT: Regex = Regex::new(
        r"(?mi)^\s*(?:TOTAL|MONTANT|SOMME)\b[\s:]*([0-9][0-9 .,]*)"
    ).unwrap();

    pub static ref SUBTOTAL_DEFAULT: Regex = Regex::new(
        r"(?mi)^\s*(?:SOUS[-\s]?TOTAL|SUBTOTAL)\b[\s:]*([0-9][0-9 .,]*)"
    ).unwrap();

    pub static ref TAX_DEFAULT: Regex = Regex::new(
        r"(?mi)^\s*(?:TVA|TAXE?|TAX)\b[\s:]*([0-9][0-9 .,]*)"
    ).unwrap();

    // Dates (kept as raw matched strings; day/month order is ambiguous)
    pub static ref DATE_DEFAULT: Regex = Regex::new(
        r"(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})"
    ).unwrap();

    // Generic `name <qty> x <price>` item line
    pub static ref GENERIC_ITEM: Regex = Regex::new(
        r"^(.+?)\s+(\d+(?:[.,]\d+)?)?\s*[xX*]\s*([0-9][0-9 .,]*)$"
    ).unwrap();

    // DRC phone numbers after a TEL/PHONE label (country code 243)
    pub static ref PHONE_DRC: Regex = Regex::new(
        r"(?:TEL|TÉL|PHONE)[\s:]*\+?243[\s\-.]*\d{3}[\s\-.]*\d{3}[\s\-.]*\d{3}"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_matches_label() {
        let caps = TOTAL_DEFAULT.captures("TOTAL: 12,500").unwrap();
        assert_eq!(caps[1].trim(), "12,500");
    }

    #[test]
    fn test_total_skips_subtotal_line() {
        let text = "SOUS-TOTAL: 10,000\nTOTAL: 12,500";
        let caps = TOTAL_DEFAULT.captures(text).unwrap();
        assert_eq!(caps[1].trim(), "12,500");
    }

    #[test]
    fn test_french_total_labels() {
        assert!(TOTAL_DEFAULT.is_match("MONTANT 5000"));
        assert!(TOTAL_DEFAULT.is_match("Somme: 5000"));
    }

    #[test]
    fn test_generic_item_shapes() {
        let caps = GENERIC_ITEM.captures("Savon de Marseille 2 x 1,500").unwrap();
        assert_eq!(caps[1].trim(), "Savon de Marseille");
        assert_eq!(&caps[2], "2");
        assert_eq!(caps[3].trim(), "1,500");

        // Quantity is optional.
        let caps = GENERIC_ITEM.captures("Pain x 500").unwrap();
        assert_eq!(caps[1].trim(), "Pain");
        assert!(caps.get(2).is_none());
    }

    #[test]
    fn test_phone_drc() {
        assert!(PHONE_DRC.is_match("TEL: +243 812 345 678"));
        assert!(PHONE_DRC.is_match("PHONE 243-812-345-678"));
        assert!(!PHONE_DRC.is_match("TEL: +44 20 7946 0000"));
    }
}
