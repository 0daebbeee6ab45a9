//! Built-in seed catalog.
//!
//! Used when no catalog store is configured, and as the starting state for a
//! fresh store. Covers the staples that dominate DRC supermarket receipts.

use crate::models::product::CanonicalProduct;

fn product(
    product_id: &str,
    normalized_name: &str,
    category: &str,
    unit_of_measure: &str,
    aliases_fr: &[&str],
    aliases_en: &[&str],
) -> CanonicalProduct {
    CanonicalProduct {
        product_id: product_id.to_string(),
        normalized_name: normalized_name.to_string(),
        category: category.to_string(),
        unit_of_measure: unit_of_measure.to_string(),
        aliases_fr: aliases_fr.iter().map(|s| s.to_string()).collect(),
        aliases_en: aliases_en.iter().map(|s| s.to_string()).collect(),
    }
}

/// The default canonical product catalog.
pub fn default_catalog() -> Vec<CanonicalProduct> {
    vec![
        product("PROD_001", "plantain", "Fruits", "kg", &["banane plantain", "plantain"], &["plantain", "banana plantain"]),
        product("PROD_002", "banana", "Fruits", "kg", &["banane", "banane douce"], &["banana", "sweet banana"]),
        product("PROD_003", "potato", "Vegetables", "kg", &["pomme de terre", "patate"], &["potato"]),
        product("PROD_004", "tomato", "Vegetables", "kg", &["tomate", "tomate fraiche"], &["tomato", "fresh tomato"]),
        product("PROD_005", "onion", "Vegetables", "kg", &["oignon"], &["onion"]),
        product("PROD_006", "garlic", "Vegetables", "kg", &["ail"], &["garlic"]),
        product("PROD_007", "cassava", "Staples", "kg", &["manioc", "kwanga"], &["cassava"]),
        product("PROD_008", "rice", "Staples", "kg", &["riz"], &["rice"]),
        product("PROD_009", "flour", "Staples", "kg", &["farine", "farine de ble"], &["flour", "wheat flour"]),
        product("PROD_010", "bread", "Bakery", "piece", &["pain"], &["bread"]),
        product("PROD_011", "vegetable oil", "Oils", "liter", &["huile vegetale"], &["vegetable oil"]),
        product("PROD_012", "palm oil", "Oils", "liter", &["huile de palme", "huile rouge"], &["palm oil", "red oil"]),
        product("PROD_013", "sugar", "Staples", "kg", &["sucre"], &["sugar"]),
        product("PROD_014", "salt", "Condiments", "kg", &["sel"], &["salt"]),
        product("PROD_015", "chicken", "Proteins", "kg", &["poulet", "poulet entier"], &["chicken", "whole chicken"]),
        product("PROD_016", "beef", "Proteins", "kg", &["boeuf", "viande de boeuf", "viande"], &["beef", "meat"]),
        product("PROD_017", "goat meat", "Proteins", "kg", &["chevre", "viande de chevre"], &["goat", "goat meat"]),
        product("PROD_018", "fish", "Proteins", "kg", &["poisson"], &["fish"]),
        product("PROD_019", "tilapia", "Proteins", "kg", &["tilapia"], &["tilapia"]),
        product("PROD_020", "egg", "Proteins", "piece", &["oeuf", "oeufs"], &["egg", "eggs"]),
        product("PROD_021", "milk", "Dairy", "liter", &["lait"], &["milk"]),
        product("PROD_022", "condensed milk", "Dairy", "can", &["lait concentre"], &["condensed milk"]),
        product("PROD_023", "butter", "Dairy", "piece", &["beurre"], &["butter"]),
        product("PROD_024", "beans", "Staples", "kg", &["haricots", "haricot"], &["beans", "bean"]),
        product("PROD_025", "peanut", "Staples", "kg", &["arachide", "cacahuete"], &["peanut", "groundnut"]),
        product("PROD_026", "corn", "Staples", "kg", &["mais"], &["corn", "maize"]),
        product("PROD_027", "water", "Beverages", "bottle", &["eau", "eau minerale"], &["water", "mineral water"]),
        product("PROD_028", "soda", "Beverages", "bottle", &["boisson gazeuse", "soda"], &["soda", "soft drink"]),
        product("PROD_029", "beer", "Beverages", "bottle", &["biere"], &["beer"]),
        product("PROD_030", "juice", "Beverages", "bottle", &["jus", "jus de fruit"], &["juice", "fruit juice"]),
        product("PROD_031", "soap", "Household", "piece", &["savon"], &["soap"]),
        product("PROD_032", "detergent", "Household", "piece", &["detergent", "lessive"], &["detergent", "laundry detergent"]),
        product("PROD_033", "toilet paper", "Household", "pack", &["papier toilette", "papier hygienique"], &["toilet paper"]),
        product("PROD_034", "toothpaste", "Household", "piece", &["dentifrice"], &["toothpaste"]),
        product("PROD_035", "tomato paste", "Condiments", "can", &["concentre de tomate", "pate de tomate"], &["tomato paste"]),
        product("PROD_036", "bouillon cube", "Condiments", "pack", &["cube maggi", "bouillon"], &["bouillon cube", "stock cube"]),
        product("PROD_037", "spaghetti", "Staples", "pack", &["spaghetti", "pates"], &["spaghetti", "pasta"]),
        product("PROD_038", "coffee", "Beverages", "pack", &["cafe"], &["coffee"]),
        product("PROD_039", "tea", "Beverages", "pack", &["the"], &["tea"]),
    ]
}
