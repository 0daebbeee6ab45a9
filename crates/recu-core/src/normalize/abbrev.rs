//! Abbreviation expansion for receipt shorthand.
//!
//! Receipt printers truncate aggressively ("BNN PLTN", "HLE VGT 1L"). The
//! table maps cleaned shorthand to full (French) words; whole-string entries
//! come first and win over token-level expansion. Order matters: the first
//! hit wins.

/// Curated shorthand observed on DRC receipts.
const ABBREVIATIONS: &[(&str, &str)] = &[
    // Whole-string entries
    ("bnn pltn", "banane plantain"),
    ("hle vgt", "huile vegetale"),
    ("pdt", "pomme de terre"),
    // Token-level entries
    ("bnn", "banane"),
    ("pltn", "plantain"),
    ("hle", "huile"),
    ("vgt", "vegetale"),
    ("tmt", "tomate"),
    ("oign", "oignon"),
    ("plt", "poulet"),
    ("pssn", "poisson"),
    ("svn", "savon"),
    ("scr", "sucre"),
    ("frn", "farine"),
    ("lt", "lait"),
    ("bte", "bouteille"),
    ("pqt", "paquet"),
];

/// Minimum token length before the looser prefix fallback applies.
const MIN_PREFIX_LEN: usize = 3;

/// Expand known abbreviations in cleaned text.
///
/// Tries an exact whole-string hit first, then expands token by token
/// (exact entry, then prefix match in either direction). Unknown tokens
/// pass through unchanged.
pub fn expand(cleaned: &str) -> String {
    if let Some((_, expansion)) = ABBREVIATIONS.iter().find(|(abbr, _)| *abbr == cleaned) {
        return (*expansion).to_string();
    }

    cleaned
        .split_whitespace()
        .map(|token| expand_token(token).unwrap_or(token))
        .collect::<Vec<_>>()
        .join(" ")
}

fn expand_token(token: &str) -> Option<&'static str> {
    // Exact entry wins.
    if let Some((_, expansion)) = ABBREVIATIONS.iter().find(|(abbr, _)| *abbr == token) {
        return Some(expansion);
    }

    // Looser fallback: prefix in either direction, within two characters,
    // so an OCR'd stray character still hits without swallowing full words.
    if token.len() >= MIN_PREFIX_LEN {
        if let Some((_, expansion)) = ABBREVIATIONS.iter().find(|(abbr, _)| {
            (abbr.starts_with(token) || token.starts_with(abbr))
                && abbr.len().abs_diff(token.len()) <= 2
        }) {
            return Some(expansion);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_whole_string_expansion() {
        assert_eq!(expand("bnn pltn"), "banane plantain");
        assert_eq!(expand("pdt"), "pomme de terre");
    }

    #[test]
    fn test_token_expansion() {
        assert_eq!(expand("bnn"), "banane");
        assert_eq!(expand("hle vgt 1l"), "huile vegetale 1l");
    }

    #[test]
    fn test_unknown_tokens_pass_through() {
        assert_eq!(expand("mystery item"), "mystery item");
    }

    #[test]
    fn test_prefix_fallback() {
        // "oignn" starts with the "oign" entry.
        assert_eq!(expand("oignn"), "oignon");
    }
}
