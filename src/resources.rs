//! Resolves a [`crate::config::DetectorConfig`]'s three resource locations
//! (path or in-memory bytes) into a loaded [`Pipeline`], delegating the
//! actual parsing to each type's own `from_path`/`from_reader`.

use std::rc::Rc;

use crate::bpe::BpeRanks;
use crate::config::{DetectorConfig, ResourceLocation};
use crate::error::Error;
use crate::features::Vocabulary;
use crate::model::Model;

/// The three loaded artifacts that make up one classification pipeline.
/// Immutable once built. `ranks` is reference-counted
/// so a [`crate::tokenizer::RoBERTaTokenizer`] built over it can be owned
/// directly by a `Detector` without borrowing back into this struct.
pub struct Pipeline {
    pub ranks: Rc<BpeRanks>,
    pub vocabulary: Vocabulary,
    pub model: Model,
}

impl Pipeline {
    pub fn load(config: &DetectorConfig) -> Result<Self, Error> {
        let ranks = match &config.merges {
            ResourceLocation::Path(path) => BpeRanks::from_path(path)?,
            ResourceLocation::Bytes(bytes) => {
                BpeRanks::from_reader("<in-memory merges>", bytes.as_slice())?
            }
        };
        let vocabulary = match &config.vocab {
            ResourceLocation::Path(path) => Vocabulary::from_path(path)?,
            ResourceLocation::Bytes(bytes) => {
                Vocabulary::from_reader("<in-memory vocab>", bytes.as_slice())?
            }
        };
        let model = match &config.model {
            ResourceLocation::Path(path) => Model::from_path(path, config.threshold)?,
            ResourceLocation::Bytes(bytes) => {
                Model::from_reader("<in-memory model>", bytes.as_slice(), config.threshold)?
            }
        };

        tracing::debug!(
            vocab_size = vocabulary.len(),
            coefficients_len = model.coefficients_len(),
            "pipeline ready"
        );

        Ok(Pipeline {
            ranks: Rc::new(ranks),
            vocabulary,
            model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[test]
    fn load_fails_fast_on_missing_merges_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = DetectorConfig {
            merges: ResourceLocation::path(dir.path().join("nope-merges.txt")),
            vocab: ResourceLocation::path(dir.path().join("nope-vocab.json")),
            model: ResourceLocation::path(dir.path().join("nope-model.json")),
            ..Default::default()
        };
        let err = Pipeline::load(&config).unwrap_err();
        assert!(matches!(err, Error::ResourceLoadFailure { .. }));
    }

    #[test]
    fn load_succeeds_on_well_formed_bundle() {
        let dir = tempfile::tempdir().unwrap();

        let merges_path = dir.path().join("merges.txt");
        write!(File::create(&merges_path).unwrap(), "#version\nh e\n").unwrap();

        let vocab_path = dir.path().join("vocab.json");
        write!(File::create(&vocab_path).unwrap(), r#"["he", "llo"]"#).unwrap();

        let model_path = dir.path().join("model.json");
        write!(
            File::create(&model_path).unwrap(),
            r#"{{"intercept": 0.0, "coefficients": [1.0, 1.0, 0.0, 0.0]}}"#
        )
        .unwrap();

        let config = DetectorConfig {
            merges: ResourceLocation::path(merges_path),
            vocab: ResourceLocation::path(vocab_path),
            model: ResourceLocation::path(model_path),
            threshold: 0.83,
            ..Default::default()
        };

        let pipeline = Pipeline::load(&config).unwrap();
        assert_eq!(pipeline.vocabulary.len(), 2);
        assert_eq!(pipeline.ranks.len(), 1);
        assert_eq!(pipeline.model.coefficients_len(), 4);
    }

    #[test]
    fn load_succeeds_on_in_memory_bundle() {
        let config = DetectorConfig::from_bytes(
            b"#version\nh e\n".to_vec(),
            br#"["he", "llo"]"#.to_vec(),
            br#"{"intercept": 0.0, "coefficients": [1.0, 1.0, 0.0, 0.0]}"#.to_vec(),
        );

        let pipeline = Pipeline::load(&config).unwrap();
        assert_eq!(pipeline.vocabulary.len(), 2);
        assert_eq!(pipeline.ranks.len(), 1);
    }

    #[derive(Clone)]
    struct BufferWriter(Arc<Mutex<Vec<u8>>>);

    struct BufferGuard(Arc<Mutex<Vec<u8>>>);

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for BufferWriter {
        type Writer = BufferGuard;

        fn make_writer(&'a self) -> Self::Writer {
            BufferGuard(self.0.clone())
        }
    }

    impl Write for BufferGuard {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0
                .lock()
                .unwrap_or_else(|err| err.into_inner())
                .extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn from_path_wrappers_log_path_and_byte_count() {
        let dir = tempfile::tempdir().unwrap();
        let merges_path = dir.path().join("merges.txt");
        write!(File::create(&merges_path).unwrap(), "#version\nh e\n").unwrap();

        let buf = Arc::new(Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .without_time()
            .with_writer(BufferWriter(buf.clone()))
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            BpeRanks::from_path(&merges_path).unwrap();
        });

        let output =
            String::from_utf8(buf.lock().unwrap_or_else(|err| err.into_inner()).clone()).unwrap();
        assert!(output.contains("loaded BPE merge table"), "{output}");
        assert!(output.contains("bytes="), "{output}");
        assert!(output.contains("merges.txt"), "{output}");
    }
}
