//! String-similarity primitives for product matching.

/// Blend weights when the query is a single token: favor edit distance.
const SINGLE_TOKEN_WEIGHTS: (f32, f32) = (0.7, 0.3);

/// Blend weights for multi-word queries: favor token overlap.
const MULTI_TOKEN_WEIGHTS: (f32, f32) = (0.4, 0.6);

/// Classic Levenshtein edit distance over characters.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Edit-distance similarity normalized into [0, 1]:
/// `1 - distance / max(len(a), len(b))`.
pub fn levenshtein_similarity(a: &str, b: &str) -> f32 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein_distance(a, b) as f32 / max_len as f32
}

/// Token-set Jaccard similarity over whitespace-split words:
/// `|intersection| / |union|`.
pub fn jaccard_similarity(a: &str, b: &str) -> f32 {
    let set_a: std::collections::HashSet<&str> = a.split_whitespace().collect();
    let set_b: std::collections::HashSet<&str> = b.split_whitespace().collect();

    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count();
    intersection as f32 / union as f32
}

/// Weighted blend of edit-distance and token-overlap similarity.
///
/// Single-token queries lean on edit distance (typos dominate); multi-word
/// queries lean on token overlap (word order and extra tokens dominate).
/// Always in [0, 1].
pub fn combined_similarity(a: &str, b: &str) -> f32 {
    let lev = levenshtein_similarity(a, b);
    let jac = jaccard_similarity(a, b);

    let single_token = !a.trim().contains(char::is_whitespace);
    let (w_lev, w_jac) = if single_token {
        SINGLE_TOKEN_WEIGHTS
    } else {
        MULTI_TOKEN_WEIGHTS
    };

    (w_lev * lev + w_jac * jac).clamp(0.0, 1.0)
}
