//! Byte-Pair-Encoding merges over a ranked merge table (level 4).

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::rc::Rc;

use crate::error::Error;

/// An ordered pair of BPE symbols. Equality and hashing are structural over
/// `(left, right)` only — `merge` is a derived cache.
#[derive(Debug, Clone)]
pub struct BpePair {
    pub left: String,
    pub right: String,
    pub merge: String,
}

impl BpePair {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        let left = left.into();
        let right = right.into();
        let merge = format!("{left}{right}");
        BpePair { left, right, merge }
    }
}

impl PartialEq for BpePair {
    fn eq(&self, other: &Self) -> bool {
        self.left == other.left && self.right == other.right
    }
}

impl Eq for BpePair {}

impl std::hash::Hash for BpePair {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.left.hash(state);
        self.right.hash(state);
    }
}

/// Immutable mapping `BpePair → rank`, built once from a merge file.
pub struct BpeRanks {
    ranks: HashMap<BpePair, usize>,
}

impl BpeRanks {
    /// Parses the `merges.txt` grammar: UTF-8 text, a `#`-prefixed header
    /// line, then one `left SPACE right` pair per non-empty line, ranked by
    /// zero-based position after the header.
    pub fn from_reader(path_for_errors: &str, reader: impl Read) -> Result<Self, Error> {
        let mut lines = BufReader::new(reader).lines();

        let header = lines
            .next()
            .ok_or_else(|| Error::resource_msg(path_for_errors, "merge file is empty"))?
            .map_err(|e| Error::resource(path_for_errors, e))?;

        if !header.starts_with('#') {
            return Err(Error::resource_msg(
                path_for_errors,
                "merge file's first line must begin with '#'",
            ));
        }

        let mut ranks = HashMap::new();
        let mut rank = 0usize;
        for line in lines {
            let line = line.map_err(|e| Error::resource(path_for_errors, e))?;
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }
            let mut parts = line.splitn(2, ' ');
            let left = parts.next().ok_or_else(|| {
                Error::resource_msg(path_for_errors, format!("malformed merge line: {line:?}"))
            })?;
            let right = parts.next().ok_or_else(|| {
                Error::resource_msg(path_for_errors, format!("malformed merge line: {line:?}"))
            })?;
            ranks.insert(BpePair::new(left, right), rank);
            rank += 1;
        }

        Ok(BpeRanks { ranks })
    }

    /// Opens `path`, parses it per [`BpeRanks::from_reader`], and logs the
    /// path and byte count on success.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| Error::resource(path, e))?;
        let ranks = Self::from_reader(&path.display().to_string(), bytes.as_slice())?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "loaded BPE merge table");
        Ok(ranks)
    }

    /// Builds a table directly from an in-memory list, for tests and
    /// programmatic construction.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let ranks = pairs
            .into_iter()
            .enumerate()
            .map(|(rank, (l, r))| (BpePair::new(l, r), rank))
            .collect();
        BpeRanks { ranks }
    }

    pub fn rank(&self, left: &str, right: &str) -> Option<usize> {
        // HashMap lookup needs an owned BpePair; Borrow<(&str,&str)> isn't
        // implemented for our key type, so build one cheaply.
        self.ranks.get(&BpePair::new(left, right)).copied()
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

/// Applies BPE merges to a sequence of single-character tokens.
pub trait BpeEncoder {
    fn encode(&self, token: &str) -> Vec<String>;
}

/// The greedy single-sweep BPE algorithm, driven by a [`BpeRanks`] table.
///
/// Holds the table behind an `Rc` rather than a borrow so that a
/// [`CachingBpeEncoder`] built on top of it can outlive any single
/// `tokenize` call and be owned directly by a long-lived `Detector`. The
/// pipeline runs single-threaded, so `Rc` rather than `Arc` is enough.
pub struct GreedyBpeEncoder {
    ranks: Rc<BpeRanks>,
}

impl GreedyBpeEncoder {
    pub fn new(ranks: Rc<BpeRanks>) -> Self {
        GreedyBpeEncoder { ranks }
    }

    /// Finds the index of the lowest-rank adjacent pair, breaking ties by
    /// first occurrence (stable left-to-right argmin).
    fn best_pair(&self, symbols: &[String]) -> Option<(usize, usize)> {
        let mut best: Option<(usize, usize)> = None;
        for i in 0..symbols.len().saturating_sub(1) {
            if let Some(rank) = self.ranks.rank(&symbols[i], &symbols[i + 1]) {
                match best {
                    Some((_, best_rank)) if rank >= best_rank => {}
                    _ => best = Some((i, rank)),
                }
            }
        }
        best
    }
}

impl BpeEncoder for GreedyBpeEncoder {
    fn encode(&self, token: &str) -> Vec<String> {
        let mut symbols: Vec<String> = token.chars().map(|c| c.to_string()).collect();

        if symbols.len() < 2 {
            return symbols;
        }

        loop {
            let Some((first_at, _)) = self.best_pair(&symbols) else {
                break;
            };
            // `best_pair` only picks out which pair *type* wins this round
            // (via its first occurrence, for stable tie-breaking); every
            // non-overlapping occurrence of that same (left, right) pair
            // merges in this one sweep before ranks are recomputed, matching
            // the reference `bpe()` loop.
            let left = symbols[first_at].clone();
            let right = symbols[first_at + 1].clone();

            let mut merged = Vec::with_capacity(symbols.len() - 1);
            let mut i = 0;
            while i < symbols.len() {
                if i + 1 < symbols.len() && symbols[i] == left && symbols[i + 1] == right {
                    merged.push(format!("{left}{right}"));
                    i += 2;
                } else {
                    merged.push(symbols[i].clone());
                    i += 1;
                }
            }
            symbols = merged;

            if symbols.len() == 1 {
                break;
            }
        }

        crate::invariants::assert_bpe_lossless(token, &symbols);
        symbols
    }
}

/// Memoizing decorator over a [`BpeEncoder`]. Not thread-safe: the pipeline
/// runs single-threaded, and entries are never invalidated.
pub struct CachingBpeEncoder<E> {
    inner: E,
    cache: RefCell<HashMap<String, Vec<String>>>,
    calls: Cell<u64>,
}

impl<E: BpeEncoder> CachingBpeEncoder<E> {
    pub fn new(inner: E) -> Self {
        CachingBpeEncoder {
            inner,
            cache: RefCell::new(HashMap::new()),
            calls: Cell::new(0),
        }
    }

    /// Total invocations of [`CachingBpeEncoder::encode`], including cache hits.
    pub fn calls(&self) -> u64 {
        self.calls.get()
    }

    /// Number of distinct inputs seen so far.
    pub fn size(&self) -> usize {
        self.cache.borrow().len()
    }
}

impl<E: BpeEncoder> BpeEncoder for CachingBpeEncoder<E> {
    fn encode(&self, token: &str) -> Vec<String> {
        self.calls.set(self.calls.get() + 1);

        if let Some(cached) = self.cache.borrow().get(token) {
            return cached.clone();
        }

        let result = self.inner.encode(token);
        self.cache
            .borrow_mut()
            .insert(token.to_string(), result.clone());
        result
    }
}
