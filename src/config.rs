//! Runtime-tunable knobs for a [`crate::detector::Detector`].

use std::path::PathBuf;

/// The default sigmoid threshold the bundled model is calibrated against.
pub const DEFAULT_THRESHOLD: f64 = 0.83;

/// Default `max_tokens`, chosen generously so that ordinary commented-out
/// code blocks are never truncated; override for pathologically long
/// comments. Only the features computed over the first `max_tokens` tokens
/// are affected — there is no hard correctness reason to cap this lower.
pub const DEFAULT_MAX_TOKENS: usize = 4096;

/// Where one bundled resource (the merge table, the vocabulary, or the model
/// parameters) should be read from: a filesystem path, or bytes already held
/// in memory (e.g. embedded via `include_bytes!`).
#[derive(Debug, Clone)]
pub enum ResourceLocation {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl ResourceLocation {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        ResourceLocation::Path(path.into())
    }

    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        ResourceLocation::Bytes(bytes.into())
    }
}

/// Parameterizes [`crate::detector::Detector::new`]: where to find the
/// three bundled data files, the decision threshold, the truncation limit,
/// and whether the model-based path runs at all.
///
/// Constructing a `DetectorConfig` never touches the filesystem; resources
/// are loaded lazily on the first classification call.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    pub merges: ResourceLocation,
    pub vocab: ResourceLocation,
    pub model: ResourceLocation,
    pub threshold: f64,
    pub max_tokens: usize,
    pub use_model: bool,
}

impl DetectorConfig {
    /// Builds a config pointing at the three bundled data files under `dir`,
    /// with the default threshold, truncation limit, and `use_model = true`.
    pub fn from_data_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        DetectorConfig {
            merges: ResourceLocation::path(dir.join("merges.txt")),
            vocab: ResourceLocation::path(dir.join("vocab.json")),
            model: ResourceLocation::path(dir.join("model.json")),
            ..Default::default()
        }
    }

    /// Builds a config from the three resource bundles already held in
    /// memory, with the default threshold, truncation limit, and
    /// `use_model = true`. Useful for callers that embed the bundles (e.g.
    /// via `include_bytes!`) rather than shipping them as loose files.
    pub fn from_bytes(merges: Vec<u8>, vocab: Vec<u8>, model: Vec<u8>) -> Self {
        DetectorConfig {
            merges: ResourceLocation::Bytes(merges),
            vocab: ResourceLocation::Bytes(vocab),
            model: ResourceLocation::Bytes(model),
            ..Default::default()
        }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        DetectorConfig {
            merges: ResourceLocation::path("merges.txt"),
            vocab: ResourceLocation::path("vocab.json"),
            model: ResourceLocation::path("model.json"),
            threshold: DEFAULT_THRESHOLD,
            max_tokens: DEFAULT_MAX_TOKENS,
            use_model: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_threshold_matches_bundled_model_calibration() {
        assert_eq!(DetectorConfig::default().threshold, 0.83);
    }

    #[test]
    fn default_use_model_is_true() {
        assert!(DetectorConfig::default().use_model);
    }

    #[test]
    fn from_data_dir_joins_the_three_fixed_filenames() {
        let config = DetectorConfig::from_data_dir("/opt/commentcop");
        assert!(matches!(
            config.merges,
            ResourceLocation::Path(p) if p == PathBuf::from("/opt/commentcop/merges.txt")
        ));
        assert!(matches!(
            config.vocab,
            ResourceLocation::Path(p) if p == PathBuf::from("/opt/commentcop/vocab.json")
        ));
        assert!(matches!(
            config.model,
            ResourceLocation::Path(p) if p == PathBuf::from("/opt/commentcop/model.json")
        ));
    }

    #[test]
    fn from_bytes_holds_the_bundles_in_memory() {
        let config = DetectorConfig::from_bytes(b"#v\n".to_vec(), b"[]".to_vec(), br#"{"intercept":0,"coefficients":[]}"#.to_vec());
        assert!(matches!(config.merges, ResourceLocation::Bytes(_)));
        assert!(matches!(config.vocab, ResourceLocation::Bytes(_)));
        assert!(matches!(config.model, ResourceLocation::Bytes(_)));
    }
}
