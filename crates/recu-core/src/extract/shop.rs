//! Shop identification from raw receipt text.

use regex::Regex;
use tracing::{debug, info};

use super::patterns::PHONE_DRC;

/// Congolese cities whose presence marks a receipt as local even when the
/// shop itself is unknown.
const CITIES: &[&str] = &[
    "KINSHASA", "LUBUMBASHI", "KANANGA", "KISANGANI", "GOMA", "BUKAVU", "MBUJI-MAYI", "TSHIKAPA",
    "KOLWEZI",
];

/// Outcome of shop identification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShopIdentity {
    /// A shop from the rule table.
    Known(String),
    /// Unidentified shop in a known region (local phone prefix or city hit).
    Local,
    /// No identifying signal at all.
    Unknown,
}

impl ShopIdentity {
    /// Display label, also used as the template/learning key.
    pub fn label(&self) -> &str {
        match self {
            ShopIdentity::Known(shop_id) => shop_id,
            ShopIdentity::Local => "LocalShop",
            ShopIdentity::Unknown => "Unknown",
        }
    }

    /// True only for [`ShopIdentity::Unknown`]; a local-but-unnamed shop is
    /// still a usable identification.
    pub fn is_unknown(&self) -> bool {
        matches!(self, ShopIdentity::Unknown)
    }
}

struct ShopRule {
    shop_id: String,
    /// (source keyword, compiled word-boundary pattern) pairs.
    keywords: Vec<(String, Regex)>,
}

/// Keyword/regex matcher resolving raw text to a shop identity.
///
/// The rule table is ordered; the first shop with any matching keyword wins,
/// so table order is the tie-break. Identification never fails: absence of a
/// match is the `Unknown` terminal outcome.
pub struct ShopIdentifier {
    rules: Vec<ShopRule>,
}

impl ShopIdentifier {
    /// Identifier with the built-in rule table.
    pub fn new() -> Self {
        Self::with_rules(&[
            ("Shoprite", &["SHOPRITE", "SHOPRITE SUPERMARKET", "SHOPRITE STORES"]),
            ("Carrefour", &["CARREFOUR", "CARREFOUR MARKET", "CARREFOUR EXPRESS"]),
            ("GrandMarche", &["GRAND MARCHÉ", "GRAND MARCHE", "GRAND MARKET"]),
            ("KinMart", &["KINMART", "KIN MART", "KINMART SUPERMARKET", "KINMART EXPRESS"]),
            ("CongoMarket", &["CONGO MARKET", "CONGO MARCHÉ", "CONGO SUPERMARKET"]),
            ("TotalEnergies", &["TOTAL ENERGIES", "STATION TOTAL", "TOTAL STATION"]),
            ("Engen", &["ENGEN", "ENGEN STATION", "ENGEN SERVICE STATION"]),
        ])
    }

    /// Identifier over a custom ordered rule table.
    pub fn with_rules(table: &[(&str, &[&str])]) -> Self {
        let rules = table
            .iter()
            .map(|(shop_id, keywords)| ShopRule {
                shop_id: shop_id.to_string(),
                keywords: keywords
                    .iter()
                    .map(|keyword| {
                        let upper = keyword.to_uppercase();
                        let pattern =
                            Regex::new(&format!(r"\b{}\b", regex::escape(&upper))).unwrap();
                        (upper, pattern)
                    })
                    .collect(),
            })
            .collect();
        Self { rules }
    }

    /// Resolve raw receipt text to a shop identity. Pure; never fails.
    pub fn identify(&self, raw_text: &str) -> ShopIdentity {
        if raw_text.trim().is_empty() {
            return ShopIdentity::Unknown;
        }

        let upper = raw_text.to_uppercase();

        for rule in &self.rules {
            for (keyword, pattern) in &rule.keywords {
                if pattern.is_match(&upper) {
                    info!("shop identified as {} (matched {keyword:?})", rule.shop_id);
                    return ShopIdentity::Known(rule.shop_id.clone());
                }
            }
        }

        if PHONE_DRC.is_match(&upper) {
            debug!("DRC phone number detected; classifying as local shop");
            return ShopIdentity::Local;
        }

        for city in CITIES {
            if upper.contains(city) {
                debug!("city {city} detected; classifying as local shop");
                return ShopIdentity::Local;
            }
        }

        debug!("shop could not be identified");
        ShopIdentity::Unknown
    }
}

impl Default for ShopIdentifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_keyword_match() {
        let identifier = ShopIdentifier::new();
        let identity = identifier.identify("SHOPRITE SUPERMARKET\nKinshasa\nTOTAL: 5000");
        assert_eq!(identity, ShopIdentity::Known("Shoprite".to_string()));
    }

    #[test]
    fn test_case_insensitive() {
        let identifier = ShopIdentifier::new();
        let identity = identifier.identify("carrefour market - gombe");
        assert_eq!(identity, ShopIdentity::Known("Carrefour".to_string()));
    }

    #[test]
    fn test_word_boundary() {
        let identifier = ShopIdentifier::new();
        // "ENGENDER" must not match the ENGEN keyword.
        assert_eq!(identifier.identify("ENGENDERED GOODS LTD"), ShopIdentity::Unknown);
    }

    #[test]
    fn test_table_order_breaks_ties() {
        let identifier = ShopIdentifier::with_rules(&[
            ("First", &["MARKET"]),
            ("Second", &["MARKET"]),
        ]);
        assert_eq!(
            identifier.identify("CITY MARKET"),
            ShopIdentity::Known("First".to_string())
        );
    }

    #[test]
    fn test_phone_number_means_local() {
        let identifier = ShopIdentifier::new();
        let identity = identifier.identify("ALIMENTATION CHEZ MAMA\nTEL: +243 812 345 678");
        assert_eq!(identity, ShopIdentity::Local);
        assert_eq!(identity.label(), "LocalShop");
        assert!(!identity.is_unknown());
    }

    #[test]
    fn test_city_means_local() {
        let identifier = ShopIdentifier::new();
        assert_eq!(identifier.identify("BOUTIQUE 24\nLUBUMBASHI"), ShopIdentity::Local);
    }

    #[test]
    fn test_unknown() {
        let identifier = ShopIdentifier::new();
        let identity = identifier.identify("corner store receipt\nitems: misc");
        assert_eq!(identity, ShopIdentity::Unknown);
        assert!(identity.is_unknown());
    }

    #[test]
    fn test_empty_text() {
        let identifier = ShopIdentifier::new();
        assert_eq!(identifier.identify("   \n  "), ShopIdentity::Unknown);
    }

    #[test]
    fn test_keyword_beats_city() {
        // Keyword rules run before the city fallback.
        let identifier = ShopIdentifier::new();
        let identity = identifier.identify("KINMART EXPRESS\nKINSHASA");
        assert_eq!(identity, ShopIdentity::Known("KinMart".to_string()));
    }
}
