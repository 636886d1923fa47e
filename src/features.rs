//! Vocabulary-indexed bag-of-words features plus the two engineered
//! semicolon features.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use crate::error::Error;

/// An ordered vocabulary loaded from a JSON array, indexed `string → position`.
pub struct Vocabulary {
    tokens: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    pub fn from_tokens(tokens: Vec<String>) -> Self {
        let index = tokens
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();
        Vocabulary { tokens, index }
    }

    /// Parses `vocab.json`: a single top-level JSON array of strings.
    pub fn from_reader(path_for_errors: &str, reader: impl Read) -> Result<Self, Error> {
        let value: serde_json::Value =
            serde_json::from_reader(reader).map_err(|e| Error::resource(path_for_errors, e))?;

        let array = value.as_array().ok_or_else(|| {
            Error::resource_msg(path_for_errors, "vocabulary file is not a JSON array")
        })?;

        let tokens = array
            .iter()
            .map(|v| {
                v.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| Error::resource_msg(path_for_errors, "vocabulary entry is not a string"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_tokens(tokens))
    }

    /// Opens `path`, parses it per [`Vocabulary::from_reader`], and logs the
    /// path and byte count on success.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| Error::resource(path, e))?;
        let vocab = Self::from_reader(&path.display().to_string(), bytes.as_slice())?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "loaded vocabulary");
        Ok(vocab)
    }

    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.index.get(token).copied()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Turns a tokenized comment into a `V + 2`-length feature vector:
/// vocabulary counts, then semicolon count, then semicolon frequency.
pub struct FeatureExtractor<'a> {
    vocab: &'a Vocabulary,
    max_tokens: usize,
}

impl<'a> FeatureExtractor<'a> {
    pub fn new(vocab: &'a Vocabulary, max_tokens: usize) -> Self {
        FeatureExtractor { vocab, max_tokens }
    }

    /// Extracts features over the first `min(tokens.len(), max_tokens)` tokens.
    ///
    /// Callers guarantee `tokens` is non-empty for non-empty comments; an
    /// empty `tokens` produces an all-zero vector with `NaN` in the
    /// frequency slot (division by zero) rather than panicking.
    pub fn extract(&self, tokens: &[String]) -> Vec<f64> {
        let v = self.vocab.len();
        let mut features = vec![0.0f64; v + 2];

        let n = tokens.len().min(self.max_tokens);
        let mut semicolons = 0f64;

        for token in &tokens[..n] {
            if let Some(k) = self.vocab.index_of(token) {
                features[k] += 1.0;
            }
            semicolons += token.chars().filter(|&c| c == ';').count() as f64;
        }

        features[v] = semicolons;
        features[v + 1] = semicolons / n as f64;

        features
    }
}
