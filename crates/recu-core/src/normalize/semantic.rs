//! TF-IDF embeddings and semantic matching.
//!
//! The default backend is a lightweight TF-IDF vector space fitted on the
//! catalog vocabulary. Higher-quality backends (e.g. multilingual sentence
//! embeddings) plug in through the [`Embedder`] trait.

use std::collections::HashMap;

/// An embedding backend: fit on a corpus, then embed arbitrary text.
pub trait Embedder: Send + Sync {
    /// (Re)fit on a corpus. A no-op for pretrained backends.
    fn fit(&mut self, corpus: &[String]);

    /// Embed text into the backend's vector space.
    fn embed(&self, text: &str) -> Vec<f32>;
}

/// Term-frequency / inverse-document-frequency embedder.
///
/// Vectors are L2-normalized, so a plain dot product is the cosine.
#[derive(Debug, Default)]
pub struct TfIdfEmbedder {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
}

impl TfIdfEmbedder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Embedder for TfIdfEmbedder {
    fn fit(&mut self, corpus: &[String]) {
        let mut words: Vec<String> = corpus
            .iter()
            .flat_map(|doc| doc.to_lowercase().split_whitespace().map(str::to_string).collect::<Vec<_>>())
            .collect();
        words.sort();
        words.dedup();

        self.vocabulary = words
            .into_iter()
            .enumerate()
            .map(|(idx, word)| (word, idx))
            .collect();

        let mut doc_counts = vec![0usize; self.vocabulary.len()];
        for doc in corpus {
            let mut seen: Vec<usize> = doc
                .to_lowercase()
                .split_whitespace()
                .filter_map(|w| self.vocabulary.get(w).copied())
                .collect();
            seen.sort_unstable();
            seen.dedup();
            for idx in seen {
                doc_counts[idx] += 1;
            }
        }

        let total = corpus.len() as f32;
        self.idf = doc_counts
            .iter()
            .map(|&count| {
                if count > 0 {
                    (total / count as f32).ln()
                } else {
                    0.0
                }
            })
            .collect();
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.vocabulary.len()];
        let lowered = text.to_lowercase();
        let words: Vec<&str> = lowered.split_whitespace().collect();
        if words.is_empty() {
            return vector;
        }

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for word in &words {
            *counts.entry(word).or_insert(0) += 1;
        }

        for (word, count) in counts {
            if let Some(&idx) = self.vocabulary.get(word) {
                let tf = count as f32 / words.len() as f32;
                vector[idx] = tf * self.idf[idx];
            }
        }

        let magnitude = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for x in &mut vector {
                *x /= magnitude;
            }
        }

        vector
    }
}

/// Cosine similarity clamped into [0, 1].
///
/// Returns 0.0 for empty vectors or vectors of different lengths; raw
/// near-antiparallel values clamp to 0.0 rather than going negative.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f32::EPSILON {
        return 0.0;
    }

    (dot / denom).clamp(0.0, 1.0)
}

/// Semantic matcher over a pluggable embedding backend.
pub struct SemanticMatcher {
    embedder: Box<dyn Embedder>,
}

impl SemanticMatcher {
    /// Matcher over the default TF-IDF backend.
    pub fn tf_idf() -> Self {
        Self {
            embedder: Box::new(TfIdfEmbedder::new()),
        }
    }

    /// Matcher over a custom embedding backend.
    pub fn with_embedder(embedder: Box<dyn Embedder>) -> Self {
        Self { embedder }
    }

    pub fn fit(&mut self, corpus: &[String]) {
        self.embedder.fit(corpus);
    }

    /// Semantic similarity between two texts, in [0, 1].
    pub fn similarity(&self, a: &str, b: &str) -> f32 {
        cosine_similarity(&self.embedder.embed(a), &self.embedder.embed(b))
    }

    /// Best-scoring candidate for a query, if any.
    pub fn find_best_match<'a>(&self, query: &str, candidates: &'a [String]) -> Option<(&'a str, f32)> {
        let query_vec = self.embedder.embed(query);
        candidates
            .iter()
            .map(|c| (c.as_str(), cosine_similarity(&query_vec, &self.embedder.embed(c))))
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// Candidates ranked by similarity, best first, truncated to `top_k`.
    pub fn rank_candidates(&self, query: &str, candidates: &[String], top_k: usize) -> Vec<(String, f32)> {
        let query_vec = self.embedder.embed(query);
        let mut ranked: Vec<(String, f32)> = candidates
            .iter()
            .map(|c| (c.clone(), cosine_similarity(&query_vec, &self.embedder.embed(c))))
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(top_k);
        ranked
    }
}
