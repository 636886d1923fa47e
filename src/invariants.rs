//! Runtime invariant assertions for the classification pipeline.
//!
//! This module provides debug-mode assertions that verify the pipeline's
//! structural invariants at runtime. These checks help catch a
//! misconfigured data bundle — a corrupt byte table, a BPE merge that eats
//! input, a model file whose coefficients don't match the feature layout —
//! without impacting release performance.
//!
//! # Invariants enforced
//!
//! 1. **Byte-to-unicode bijectivity**: all 256 table entries are distinct,
//!    non-whitespace, non-control characters.
//! 2. **BPE losslessness**: concatenating a token's BPE pieces reproduces
//!    the token exactly.
//! 3. **Feature/coefficient shape agreement**: a feature vector's length
//!    matches the model's coefficient count before scoring.
//!
//! These assertions are only active in debug builds (`debug_assertions`).
//! In release builds they compile to no-ops for zero overhead; the same
//! conditions are still caught at the shape-mismatch boundary via
//! `Error::ShapeMismatch`, which is not debug-gated.

/// Asserts that the byte-to-unicode table is a bijection onto 256 distinct,
/// printable characters.
///
/// # Panics
///
/// Panics in debug builds if any entry is whitespace, a control character,
/// or duplicated.
#[inline]
pub fn assert_byte_table_well_formed(table: &[char; 256]) {
    #[cfg(debug_assertions)]
    {
        let mut seen = std::collections::HashSet::with_capacity(256);
        for (byte, &ch) in table.iter().enumerate() {
            debug_assert!(
                !ch.is_whitespace() && !ch.is_control(),
                "Invariant violation: byte {byte} maps to whitespace/control char {ch:?}"
            );
            debug_assert!(
                seen.insert(ch),
                "Invariant violation: byte-to-unicode table is not injective at byte {byte} ({ch:?})"
            );
        }
        debug_assert_eq!(
            seen.len(),
            256,
            "Invariant violation: byte-to-unicode table does not cover 256 distinct code points"
        );
    }
    #[cfg(not(debug_assertions))]
    {
        let _ = table;
    }
}

/// Asserts that BPE encoding a non-empty token is lossless: the
/// concatenation of its output pieces equals the input.
///
/// # Panics
///
/// Panics in debug builds if `pieces.concat() != token` or `pieces` is empty.
#[inline]
pub fn assert_bpe_lossless(token: &str, pieces: &[String]) {
    #[cfg(debug_assertions)]
    {
        debug_assert!(
            !pieces.is_empty(),
            "Invariant violation: BPE encoding of non-empty token {token:?} produced no pieces"
        );
        let joined = pieces.concat();
        debug_assert_eq!(
            joined, token,
            "Invariant violation: BPE pieces {pieces:?} do not reconstruct input {token:?}"
        );
    }
    #[cfg(not(debug_assertions))]
    {
        let _ = (token, pieces);
    }
}

/// Asserts that a feature vector's length agrees with a coefficient
/// vector's length before scoring.
///
/// This mirrors the fail-fast behavior of `Model::predict`'s
/// `Error::ShapeMismatch`; the debug assertion exists so a mismatch is
/// caught at the call site with a stack trace during development, not just
/// surfaced as a `Result::Err` later.
///
/// # Panics
///
/// Panics in debug builds if the lengths differ.
#[inline]
pub fn assert_feature_shape_matches(features_len: usize, coefficients_len: usize) {
    #[cfg(debug_assertions)]
    {
        debug_assert_eq!(
            features_len, coefficients_len,
            "Invariant violation: feature vector length {features_len} != coefficient vector length {coefficients_len}"
        );
    }
    #[cfg(not(debug_assertions))]
    {
        let _ = (features_len, coefficients_len);
    }
}

/// Asserts that a sigmoid output lies strictly between 0 and 1.
///
/// # Panics
///
/// Panics in debug builds if `sigmoid` is outside `(0, 1)`.
#[inline]
pub fn assert_sigmoid_in_open_unit_interval(sigmoid: f64) {
    #[cfg(debug_assertions)]
    {
        debug_assert!(
            sigmoid > 0.0 && sigmoid < 1.0,
            "Invariant violation: sigmoid {sigmoid} is not in the open interval (0, 1)"
        );
    }
    #[cfg(not(debug_assertions))]
    {
        let _ = sigmoid;
    }
}
