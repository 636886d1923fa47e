//! Orchestrates level-2 regex split → level-3 byte-to-unicode encoding →
//! level-4 BPE into the single `tokenize` entry point.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::OnceLock;

use crate::bpe::{BpeEncoder, BpeRanks, CachingBpeEncoder, GreedyBpeEncoder};
use crate::byte_encoder;

/// The 6-alternative RoBERTa pre-tokenization pattern, compiled once.
const LEVEL2_PATTERN: &str =
    r"'s|'t|'re|'ve|'m|'ll|'d| ?\p{L}+| ?\p{N}+| ?[^\s\p{L}\p{N}]+|\s+(?!\S)|\s+";

fn level2_regex() -> &'static fancy_regex::Regex {
    static REGEX: OnceLock<fancy_regex::Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        fancy_regex::Regex::new(LEVEL2_PATTERN).expect("LEVEL2_PATTERN is a fixed, valid pattern")
    })
}

/// Hooks invoked synchronously at each tokenization level, with the
/// accumulated context produced so far. Default is a no-op.
pub trait TokenizeListener {
    fn on_level2(&mut self, _tokens: &[String]) {}
    fn on_level3(&mut self, _tokens: &[String]) {}
    fn on_level4(&mut self, _tokens: &[String]) {}
}

/// The default, no-op listener.
#[derive(Default)]
pub struct NoopListener;

impl TokenizeListener for NoopListener {}

/// A user-supplied functor wrapping one tokenization level, letting a caller
/// intercept or memoize that level's per-fragment computation. `compute` is
/// the level's own logic; implementors decide whether and how to call it.
pub trait LevelCache<O> {
    fn get_or_compute(&self, key: &str, compute: impl FnOnce(&str) -> O) -> O;
}

/// The default cache: pass-through, always calls `compute` directly.
#[derive(Default)]
pub struct PassThroughCache;

impl<O> LevelCache<O> for PassThroughCache {
    fn get_or_compute(&self, key: &str, compute: impl FnOnce(&str) -> O) -> O {
        compute(key)
    }
}

/// A memoizing [`LevelCache`], keyed on the input fragment. Not thread-safe,
/// matching the pipeline's single-threaded convention.
#[derive(Default)]
pub struct MemoCache<O> {
    entries: RefCell<HashMap<String, O>>,
}

impl<O> MemoCache<O> {
    pub fn new() -> Self {
        MemoCache {
            entries: RefCell::new(HashMap::new()),
        }
    }
}

impl<O: Clone> LevelCache<O> for MemoCache<O> {
    fn get_or_compute(&self, key: &str, compute: impl FnOnce(&str) -> O) -> O {
        if let Some(cached) = self.entries.borrow().get(key) {
            return cached.clone();
        }
        let value = compute(key);
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.clone());
        value
    }
}

/// Splits `text` by the level-2 pattern, reproducing the reference
/// tokenizer's cursor discipline exactly: the cursor advances to each
/// match's *start*, not its end, so consecutive matches are concatenated
/// into one emitted slice at the next match boundary.
pub fn level2_split(text: &str) -> Vec<String> {
    let regex = level2_regex();
    let mut tokens = Vec::new();
    let mut cursor = 0usize;

    for found in regex.find_iter(text) {
        let m = match found {
            Ok(m) => m,
            Err(_) => continue,
        };
        let match_start = m.start();
        if match_start > cursor {
            tokens.push(text[cursor..match_start].to_string());
        }
        cursor = match_start;
    }

    if cursor < text.len() {
        tokens.push(text[cursor..].to_string());
    }

    tokens
}

/// Encodes a level-2 token through the byte-to-unicode table (level 3).
pub fn level3_encode(token: &str) -> String {
    byte_encoder::encode(token)
}

/// Faithful port of the Hugging Face RoBERTa tokenizer: regex
/// pre-tokenization, byte-to-unicode remapping, and BPE merges. Level 1
/// (added-token splitting) is not implemented — the whole input is treated
/// as a single level-1 token.
///
/// Owns the level-4 [`CachingBpeEncoder`] for its own lifetime, so repeated
/// `tokenize` calls across an analysis run share one cache rather than
/// rebuilding it per call.
pub struct RoBERTaTokenizer {
    bpe: CachingBpeEncoder<GreedyBpeEncoder>,
}

impl RoBERTaTokenizer {
    pub fn new(ranks: Rc<BpeRanks>) -> Self {
        RoBERTaTokenizer {
            bpe: CachingBpeEncoder::new(GreedyBpeEncoder::new(ranks)),
        }
    }

    /// `tokenize(text) → [String]`: level-2 split, level-3 encode each
    /// fragment, level-4 BPE each level-3 token, flatten preserving order.
    /// Levels 2 and 3 run uncached (pass-through).
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.tokenize_with(text, &PassThroughCache, &PassThroughCache, &mut NoopListener)
    }

    /// As [`RoBERTaTokenizer::tokenize`], but with each level's output also
    /// reported to `listener`, and levels 2 and 3 run through `level2_cache`
    /// and `level3_cache` — user-supplied functors that may intercept or
    /// memoize that level's computation instead of running it directly.
    /// Pass [`PassThroughCache`] for either to get `tokenize`'s default,
    /// uncached behavior.
    pub fn tokenize_with(
        &self,
        text: &str,
        level2_cache: &impl LevelCache<Vec<String>>,
        level3_cache: &impl LevelCache<String>,
        listener: &mut impl TokenizeListener,
    ) -> Vec<String> {
        let level2 = level2_cache.get_or_compute(text, level2_split);
        listener.on_level2(&level2);

        let level3: Vec<String> = level2
            .iter()
            .map(|t| level3_cache.get_or_compute(t, level3_encode))
            .collect();
        listener.on_level3(&level3);

        let mut level4 = Vec::new();
        for token in &level3 {
            if token.is_empty() {
                continue;
            }
            level4.extend(self.bpe.encode(token));
        }
        listener.on_level4(&level4);

        level4
    }

    /// Total BPE cache lookups and distinct entries seen so far, exposed for
    /// observability and cache-hit-rate diagnostics.
    pub fn cache_stats(&self) -> (u64, usize) {
        (self.bpe.calls(), self.bpe.size())
    }
}
