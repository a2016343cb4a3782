// src/ranking/tfidf.rs
//! Small TF-IDF model used by the text-similarity ranker.
//!
//! Documents are tokenized by lowercasing, splitting on anything that is not
//! alphanumeric or `_`, and dropping English stopwords. Term frequency is the
//! raw count; `idf(t) = 1 + ln(N / (1 + df(t)))`.

use std::collections::HashMap;

/// Sorted so lookups can binary search.
const STOPWORDS: &[&str] = &[
    "0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "_", "a", "about", "above", "after",
    "again", "all", "also", "am", "an", "and", "another", "any", "are", "as", "at", "b",
    "be", "because", "been", "before", "being", "below", "between", "both", "but", "by",
    "c", "came", "can", "cannot", "come", "could", "d", "did", "do", "does", "doing",
    "during", "e", "each", "f", "few", "for", "from", "further", "g", "get", "got", "h",
    "had", "has", "have", "he", "her", "here", "him", "himself", "his", "how", "i", "if",
    "in", "into", "is", "it", "its", "itself", "j", "k", "l", "like", "m", "make", "many",
    "me", "might", "more", "most", "much", "must", "my", "myself", "n", "never", "now",
    "o", "of", "on", "only", "or", "other", "our", "ours", "ourselves", "out", "over",
    "own", "p", "q", "r", "s", "said", "same", "see", "should", "since", "so", "some",
    "still", "such", "t", "take", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "there", "these", "they", "this", "those", "through", "to",
    "too", "u", "under", "until", "up", "v", "very", "w", "was", "way", "we", "well",
    "were", "what", "when", "where", "which", "while", "who", "whom", "why", "with",
    "would", "x", "y", "you", "your", "yours", "yourself", "z",
];

pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.binary_search(&token).is_ok()
}

pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| !token.is_empty() && !is_stopword(token))
        .map(|token| token.to_string())
        .collect()
}

/// Term counts for one document, remembering first-seen order so vector
/// layouts are deterministic.
#[derive(Debug, Clone, Default)]
pub struct TermDocument {
    counts: HashMap<String, usize>,
    order: Vec<String>,
}

impl TermDocument {
    pub fn from_text(text: &str) -> Self {
        let mut doc = Self::default();
        for token in tokenize(text) {
            match doc.counts.get_mut(&token) {
                Some(count) => *count += 1,
                None => {
                    doc.order.push(token.clone());
                    doc.counts.insert(token, 1);
                }
            }
        }
        doc
    }

    pub fn term_frequency(&self, term: &str) -> usize {
        self.counts.get(term).copied().unwrap_or(0)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.counts.contains_key(term)
    }

    /// Distinct terms in first-seen order.
    pub fn terms(&self) -> &[String] {
        &self.order
    }
}

#[derive(Debug, Clone, Default)]
pub struct TfIdfModel {
    documents: Vec<TermDocument>,
}

impl TfIdfModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document and returns its index.
    pub fn add_document(&mut self, text: &str) -> usize {
        self.documents.push(TermDocument::from_text(text));
        self.documents.len() - 1
    }

    pub fn idf(&self, term: &str) -> f64 {
        let docs_with_term = self.documents.iter().filter(|d| d.contains(term)).count();
        1.0 + (self.documents.len() as f64 / (1.0 + docs_with_term as f64)).ln()
    }

    /// Weight vectors of two documents laid out over the terms of `axis`.
    pub fn vectors_over(&self, axis: usize, other: usize) -> (Vec<f64>, Vec<f64>) {
        let Some(axis_doc) = self.documents.get(axis) else {
            return (Vec::new(), Vec::new());
        };

        axis_doc
            .terms()
            .iter()
            .map(|term| {
                let idf = self.idf(term);
                let a = axis_doc.term_frequency(term) as f64 * idf;
                let b = self
                    .documents
                    .get(other)
                    .map_or(0.0, |doc| doc.term_frequency(term) as f64 * idf);
                (a, b)
            })
            .unzip()
    }
}

/// Cosine of the angle between two weight vectors; zero when either is empty or zero.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        tracing::warn!(
            a_len = a.len(),
            b_len = b.len(),
            "term vector length mismatch; returning zero similarity"
        );
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}
