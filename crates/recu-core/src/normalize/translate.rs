//! French/English lexicon for product-name translation.
//!
//! A curated dictionary of common receipt items. Lookups are folded to
//! lowercase with accents stripped, so `"Pastèque"` and `"pasteque"` hit the
//! same entry. Multi-word phrases are matched greedily, longest first.

use std::collections::HashMap;
use std::sync::RwLock;

use super::strip_accents;

/// Longest phrase length attempted during greedy translation.
const MAX_PHRASE_TOKENS: usize = 4;

/// Curated French -> English pairs for common food and household items.
const FRENCH_ENGLISH: &[(&str, &str)] = &[
    // Fruits
    ("banane", "banana"),
    ("banane plantain", "plantain"),
    ("plantain", "plantain"),
    ("orange", "orange"),
    ("pomme", "apple"),
    ("mangue", "mango"),
    ("ananas", "pineapple"),
    ("papaye", "papaya"),
    ("avocat", "avocado"),
    ("citron", "lemon"),
    ("pastèque", "watermelon"),
    ("raisin", "grape"),
    ("poire", "pear"),
    ("fraise", "strawberry"),
    // Vegetables
    ("tomate", "tomato"),
    ("oignon", "onion"),
    ("ail", "garlic"),
    ("carotte", "carrot"),
    ("pomme de terre", "potato"),
    ("patate", "potato"),
    ("manioc", "cassava"),
    ("kwanga", "cassava"),
    ("chou", "cabbage"),
    ("épinard", "spinach"),
    ("piment", "chili"),
    ("poivron", "bell pepper"),
    ("aubergine", "eggplant"),
    ("gombo", "okra"),
    ("laitue", "lettuce"),
    ("concombre", "cucumber"),
    ("courgette", "zucchini"),
    ("haricot vert", "green bean"),
    ("petit pois", "pea"),
    ("maïs", "corn"),
    // Proteins
    ("poulet", "chicken"),
    ("boeuf", "beef"),
    ("viande", "meat"),
    ("viande de boeuf", "beef"),
    ("chèvre", "goat"),
    ("viande de chèvre", "goat meat"),
    ("porc", "pork"),
    ("mouton", "mutton"),
    ("poisson", "fish"),
    ("oeuf", "egg"),
    ("tilapia", "tilapia"),
    ("sardine", "sardine"),
    ("thon", "tuna"),
    ("crevette", "shrimp"),
    // Dairy
    ("lait", "milk"),
    ("beurre", "butter"),
    ("fromage", "cheese"),
    ("yaourt", "yogurt"),
    ("crème", "cream"),
    // Grains & staples
    ("riz", "rice"),
    ("farine", "flour"),
    ("pain", "bread"),
    ("pâtes", "pasta"),
    ("spaghetti", "spaghetti"),
    ("haricots", "beans"),
    ("haricot", "bean"),
    ("lentille", "lentil"),
    ("arachide", "peanut"),
    ("cacahuète", "peanut"),
    // Oils & condiments
    ("huile", "oil"),
    ("huile de palme", "palm oil"),
    ("huile rouge", "red oil"),
    ("huile végétale", "vegetable oil"),
    ("sel", "salt"),
    ("sucre", "sugar"),
    ("miel", "honey"),
    ("vinaigre", "vinegar"),
    ("concentré de tomate", "tomato paste"),
    ("pâte de tomate", "tomato paste"),
    ("moutarde", "mustard"),
    ("épice", "spice"),
    ("cube maggi", "bouillon cube"),
    ("bouillon", "bouillon"),
    // Beverages
    ("eau", "water"),
    ("eau minérale", "mineral water"),
    ("boisson", "drink"),
    ("boisson gazeuse", "soda"),
    ("jus", "juice"),
    ("jus de fruit", "fruit juice"),
    ("bière", "beer"),
    ("vin", "wine"),
    ("café", "coffee"),
    ("thé", "tea"),
    ("lait concentré", "condensed milk"),
    // Hygiene & household
    ("savon", "soap"),
    ("détergent", "detergent"),
    ("lessive", "laundry detergent"),
    ("dentifrice", "toothpaste"),
    ("brosse à dents", "toothbrush"),
    ("papier toilette", "toilet paper"),
    ("papier hygiénique", "toilet paper"),
    ("couche", "diaper"),
    ("shampooing", "shampoo"),
    // Units & packaging
    ("kilogramme", "kilogram"),
    ("kilo", "kilogram"),
    ("gramme", "gram"),
    ("litre", "liter"),
    ("morceau", "piece"),
    ("paquet", "pack"),
    ("sachet", "sachet"),
    ("boîte", "box"),
    ("bouteille", "bottle"),
    ("sac", "bag"),
    // Common adjectives
    ("frais", "fresh"),
    ("fraîche", "fresh"),
    ("sec", "dry"),
    ("entier", "whole"),
    ("entière", "whole"),
    ("moulu", "ground"),
    ("congelé", "frozen"),
    ("en conserve", "canned"),
];

/// Detected source language of a product name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    French,
    English,
    Unknown,
}

/// Bidirectional French/English lexical translator.
pub struct Translator {
    fr_to_en: RwLock<HashMap<String, String>>,
    en_to_fr: RwLock<HashMap<String, String>>,
}

impl Translator {
    pub fn new() -> Self {
        let mut fr_to_en = HashMap::new();
        let mut en_to_fr = HashMap::new();
        for (fr, en) in FRENCH_ENGLISH {
            let fr = fold(fr);
            let en = fold(en);
            fr_to_en.insert(fr.clone(), en.clone());
            // Reverse map: later entries win for shared English targets.
            en_to_fr.insert(en, fr);
        }
        Self {
            fr_to_en: RwLock::new(fr_to_en),
            en_to_fr: RwLock::new(en_to_fr),
        }
    }

    /// Translate French text to English, leaving unknown words as-is.
    pub fn to_english(&self, text: &str) -> String {
        translate(text, &self.fr_to_en.read().unwrap())
    }

    /// Translate English text to French, leaving unknown words as-is.
    pub fn to_french(&self, text: &str) -> String {
        translate(text, &self.en_to_fr.read().unwrap())
    }

    /// Detect the language of a product name by counting dictionary hits
    /// per side. Ties (including zero hits) are `Unknown`.
    pub fn detect_language(&self, text: &str) -> Language {
        let folded = fold(text);
        let fr = self.fr_to_en.read().unwrap();
        let en = self.en_to_fr.read().unwrap();

        let mut fr_count = 0usize;
        let mut en_count = 0usize;
        for word in folded.split_whitespace() {
            if fr.contains_key(word) {
                fr_count += 1;
            }
            if en.contains_key(word) {
                en_count += 1;
            }
        }

        if fr_count > en_count {
            Language::French
        } else if en_count > fr_count {
            Language::English
        } else {
            Language::Unknown
        }
    }

    /// Normalize text to the pivot language so that multilingual inputs
    /// match the same catalog entries. Undetected text is folded only.
    pub fn to_pivot(&self, text: &str, pivot: Language) -> String {
        match (pivot, self.detect_language(text)) {
            (Language::English, Language::French) => self.to_english(text),
            (Language::French, Language::English) => self.to_french(text),
            _ => fold(text),
        }
    }

    /// Add a translation pair at runtime. Folded like the built-in table.
    pub fn add_translation(&self, french: &str, english: &str) {
        let fr = fold(french);
        let en = fold(english);
        self.fr_to_en.write().unwrap().insert(fr.clone(), en.clone());
        self.en_to_fr.write().unwrap().insert(en, fr);
    }

    /// All language variants of a text: the folded original plus any
    /// differing translation in each direction, deduplicated.
    pub fn variants(&self, text: &str) -> Vec<String> {
        let folded = fold(text);
        let mut variants = vec![folded.clone()];
        for candidate in [self.to_english(text), self.to_french(text)] {
            if candidate != folded && !variants.contains(&candidate) {
                variants.push(candidate);
            }
        }
        variants
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new()
    }
}

/// Lowercase and strip accents so dictionary keys match cleaned input.
fn fold(text: &str) -> String {
    strip_accents(&text.to_lowercase()).trim().to_string()
}

/// Exact-phrase lookup first, then greedy longest-phrase word walk.
fn translate(text: &str, dict: &HashMap<String, String>) -> String {
    let folded = fold(text);
    if folded.is_empty() {
        return String::new();
    }

    if let Some(hit) = dict.get(&folded) {
        return hit.clone();
    }

    let words: Vec<&str> = folded.split_whitespace().collect();
    let mut output: Vec<&str> = Vec::with_capacity(words.len());
    let mut i = 0;

    while i < words.len() {
        let mut translated = false;
        for n in (1..=MAX_PHRASE_TOKENS.min(words.len() - i)).rev() {
            let phrase = words[i..i + n].join(" ");
            if let Some(hit) = dict.get(&phrase) {
                output.push(hit);
                i += n;
                translated = true;
                break;
            }
        }
        if !translated {
            output.push(words[i]);
            i += 1;
        }
    }

    output.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_simple_french_to_english() {
        let translator = Translator::new();
        assert_eq!(translator.to_english("banane"), "banana");
    }

    #[test]
    fn test_phrase_beats_word_by_word() {
        let translator = Translator::new();
        // "banane plantain" is one lexicon entry, not banana + plantain.
        assert_eq!(translator.to_english("banane plantain"), "plantain");
    }

    #[test]
    fn test_multi_word_french() {
        let translator = Translator::new();
        assert_eq!(translator.to_english("pomme de terre"), "potato");
        assert_eq!(translator.to_english("huile végétale"), "vegetable oil");
    }

    #[test]
    fn test_accents_folded() {
        let translator = Translator::new();
        assert_eq!(translator.to_english("huile vegetale"), "vegetable oil");
    }

    #[test]
    fn test_english_to_french() {
        let translator = Translator::new();
        assert_eq!(translator.to_french("banana"), "banane");
        assert_eq!(translator.to_french("potato"), "patate");
    }

    #[test]
    fn test_unknown_words_kept() {
        let translator = Translator::new();
        assert_eq!(translator.to_english("poulet xyz"), "chicken xyz");
    }

    #[test]
    fn test_detect_language() {
        let translator = Translator::new();
        assert_eq!(translator.detect_language("banane fraiche"), Language::French);
        assert_eq!(translator.detect_language("fresh banana"), Language::English);
        assert_eq!(translator.detect_language("zzz qqq"), Language::Unknown);
    }

    #[test]
    fn test_to_pivot() {
        let translator = Translator::new();
        assert_eq!(translator.to_pivot("banane", Language::English), "banana");
        assert_eq!(translator.to_pivot("banana", Language::English), "banana");
        assert_eq!(translator.to_pivot("banana", Language::French), "banane");
    }

    #[test]
    fn test_add_translation() {
        let translator = Translator::new();
        translator.add_translation("fufu", "fufu flour");
        assert_eq!(translator.to_english("fufu"), "fufu flour");
        assert_eq!(translator.to_french("fufu flour"), "fufu");
    }

    #[test]
    fn test_variants() {
        let translator = Translator::new();
        let variants = translator.variants("banane");
        assert!(variants.contains(&"banane".to_string()));
        assert!(variants.contains(&"banana".to_string()));
    }
}
