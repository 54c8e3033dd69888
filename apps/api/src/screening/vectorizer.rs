//! Vectorizer — turns normalized text into a fixed-dimension feature vector.
//!
//! `TfidfVectorizer` replays a pre-fit TF-IDF transform from its exported
//! parameters (vocabulary, idf weights, tokenizer settings). It is loaded once
//! and never refit.

use std::collections::{BTreeMap, HashMap, HashSet};

use regex::Regex;
use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Feature vector
// ────────────────────────────────────────────────────────────────────────────

/// A fixed-length numeric vector stored sparsely.
///
/// `entries` holds `(index, value)` pairs sorted by index with no duplicates;
/// every index not present is zero.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureVector {
    dim: usize,
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    /// Builds a vector from `(index, value)` pairs. Zero values are dropped and
    /// pairs are sorted; indices must be `< dim` and unique.
    pub fn from_sparse(dim: usize, entries: impl IntoIterator<Item = (usize, f64)>) -> Self {
        let mut entries: Vec<(usize, f64)> = entries.into_iter().filter(|(_, v)| *v != 0.0).collect();
        entries.sort_by_key(|(i, _)| *i);
        debug_assert!(entries.iter().all(|(i, _)| *i < dim));
        debug_assert!(entries.windows(2).all(|w| w[0].0 != w[1].0));
        Self { dim, entries }
    }

    pub fn from_dense(values: &[f64]) -> Self {
        Self::from_sparse(values.len(), values.iter().copied().enumerate())
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |(i, _)| *i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    /// Dot product against a dense weight row of the same width.
    pub fn dot_dense(&self, weights: &[f64]) -> f64 {
        self.entries.iter().map(|(i, v)| v * weights[*i]).sum()
    }

    /// Dot product of two sparse vectors (merge walk over sorted indices).
    pub fn dot(&self, other: &FeatureVector) -> f64 {
        let (mut a, mut b) = (self.entries.iter().peekable(), other.entries.iter().peekable());
        let mut sum = 0.0;
        while let (Some(&&(ia, va)), Some(&&(ib, vb))) = (a.peek(), b.peek()) {
            match ia.cmp(&ib) {
                std::cmp::Ordering::Less => {
                    a.next();
                }
                std::cmp::Ordering::Greater => {
                    b.next();
                }
                std::cmp::Ordering::Equal => {
                    sum += va * vb;
                    a.next();
                    b.next();
                }
            }
        }
        sum
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// A pre-fit text → feature transform. Implement this to swap the feature
/// extractor (or inject a fake in tests) without touching the predictors.
pub trait Vectorizer: Send + Sync {
    /// Width of every vector this vectorizer produces.
    fn dimension(&self) -> usize;

    /// Transforms a batch of documents; output order matches input order.
    fn transform(&self, documents: &[&str]) -> Vec<FeatureVector>;

    fn info(&self) -> VectorizerInfo;
}

/// Metadata reported by `GET /api/v1/models`.
#[derive(Debug, Clone, Serialize)]
pub struct VectorizerInfo {
    pub kind: String,
    pub dimension: usize,
    pub ngram_range: (usize, usize),
    pub sublinear_tf: bool,
    pub norm: Option<Norm>,
}

// ────────────────────────────────────────────────────────────────────────────
// TF-IDF artifact
// ────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

/// On-disk form of a fitted TF-IDF vectorizer (`tfidf.json`).
#[derive(Debug, Clone, Deserialize)]
pub struct TfidfArtifact {
    pub vocabulary: HashMap<String, usize>,
    pub idf: Vec<f64>,
    #[serde(default = "default_true")]
    pub lowercase: bool,
    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default)]
    pub stop_words: Vec<String>,
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default = "default_norm")]
    pub norm: Option<Norm>,
}

fn default_true() -> bool {
    true
}

fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_string()
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

// ────────────────────────────────────────────────────────────────────────────
// TfidfVectorizer
// ────────────────────────────────────────────────────────────────────────────

/// Validated, ready-to-use TF-IDF transform.
///
/// Deserializing goes through `TfidfArtifact`, so a malformed artifact fails
/// at load time rather than on the first request.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "TfidfArtifact")]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    lowercase: bool,
    token_pattern: Regex,
    ngram_range: (usize, usize),
    stop_words: HashSet<String>,
    sublinear_tf: bool,
    norm: Option<Norm>,
}

impl TryFrom<TfidfArtifact> for TfidfVectorizer {
    type Error = String;

    fn try_from(artifact: TfidfArtifact) -> Result<Self, Self::Error> {
        let dim = artifact.idf.len();

        if let Some(bad) = artifact.idf.iter().position(|w| !w.is_finite()) {
            return Err(format!("idf[{bad}] is not a finite number"));
        }

        let mut seen = vec![false; dim];
        for (term, &index) in &artifact.vocabulary {
            if index >= dim {
                return Err(format!(
                    "term '{term}' maps to index {index} but idf has only {dim} entries"
                ));
            }
            if std::mem::replace(&mut seen[index], true) {
                return Err(format!("index {index} is assigned to more than one term"));
            }
        }

        let (min_n, max_n) = artifact.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(format!("invalid ngram_range ({min_n}, {max_n})"));
        }

        let token_pattern = Regex::new(&artifact.token_pattern)
            .map_err(|e| format!("token_pattern does not compile: {e}"))?;
        if token_pattern.captures_len() > 2 {
            return Err("token_pattern may contain at most one capturing group".to_string());
        }

        Ok(Self {
            vocabulary: artifact.vocabulary,
            idf: artifact.idf,
            lowercase: artifact.lowercase,
            token_pattern,
            ngram_range: artifact.ngram_range,
            stop_words: artifact.stop_words.into_iter().collect(),
            sublinear_tf: artifact.sublinear_tf,
            norm: artifact.norm,
        })
    }
}

impl TfidfVectorizer {
    /// Splits a document into the terms looked up in the vocabulary:
    /// tokens (stop words removed), then word n-grams joined by single spaces.
    pub fn analyze(&self, document: &str) -> Vec<String> {
        let document = if self.lowercase {
            document.to_lowercase()
        } else {
            document.to_string()
        };

        // With one capturing group the group is the token, not the whole match.
        let tokens: Vec<&str> = if self.token_pattern.captures_len() == 2 {
            self.token_pattern
                .captures_iter(&document)
                .filter_map(|c| c.get(1).map(|m| m.as_str()))
                .filter(|t| !self.stop_words.contains(*t))
                .collect()
        } else {
            self.token_pattern
                .find_iter(&document)
                .map(|m| m.as_str())
                .filter(|t| !self.stop_words.contains(*t))
                .collect()
        };

        word_ngrams(&tokens, self.ngram_range)
    }

    fn transform_one(&self, document: &str) -> FeatureVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in self.analyze(document) {
            if let Some(&index) = self.vocabulary.get(&term) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut weighted: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(index, tf)| {
                let tf = if self.sublinear_tf { 1.0 + tf.ln() } else { tf };
                (index, tf * self.idf[index])
            })
            .collect();

        let scale = match self.norm {
            Some(Norm::L2) => weighted.iter().map(|(_, v)| v * v).sum::<f64>().sqrt(),
            Some(Norm::L1) => weighted.iter().map(|(_, v)| v.abs()).sum::<f64>(),
            None => 1.0,
        };
        if scale > 0.0 {
            for (_, v) in &mut weighted {
                *v /= scale;
            }
        }

        FeatureVector::from_sparse(self.idf.len(), weighted)
    }
}

impl Vectorizer for TfidfVectorizer {
    fn dimension(&self) -> usize {
        self.idf.len()
    }

    fn transform(&self, documents: &[&str]) -> Vec<FeatureVector> {
        documents.iter().map(|d| self.transform_one(d)).collect()
    }

    fn info(&self) -> VectorizerInfo {
        VectorizerInfo {
            kind: "tfidf".to_string(),
            dimension: self.idf.len(),
            ngram_range: self.ngram_range,
            sublinear_tf: self.sublinear_tf,
            norm: self.norm,
        }
    }
}

/// Word n-grams for `min_n..=max_n`. Unigrams keep token order; longer
/// n-grams follow in increasing `n`.
fn word_ngrams(tokens: &[&str], (min_n, max_n): (usize, usize)) -> Vec<String> {
    let mut terms = Vec::new();
    for n in min_n..=max_n.min(tokens.len()) {
        terms.extend(tokens.windows(n).map(|w| w.join(" ")));
    }
    terms
}
