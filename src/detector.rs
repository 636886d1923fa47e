//! Glue: for each comment batch, strip → tokenize → featurize → predict →
//! maybe report.

use std::rc::Rc;

use crate::comment::{group, CommentBatch, Trivium};
use crate::config::{DetectorConfig, ResourceLocation};
use crate::error::Error;
use crate::features::FeatureExtractor;
use crate::resources::Pipeline;
use crate::sign_stripper;
use crate::tokenizer::RoBERTaTokenizer;

/// The fixed rule key this detector reports under.
pub const RULE_KEY: &str = "S125";

/// The fixed issue message.
pub const MESSAGE: &str = "This block of commented-out lines of code should be removed.";

/// Stands in for the host's issue-reporting sink's journal side channel:
/// every non-Javadoc comment batch is recorded here regardless of
/// classification decision.
pub trait CommentJournal<T: Trivium> {
    fn record(&mut self, batch: &CommentBatch<'_, T>);
}

/// A no-op journal for callers (and tests) that don't need the side channel.
pub struct NullJournal;

impl<T: Trivium> CommentJournal<T> for NullJournal {
    fn record(&mut self, _batch: &CommentBatch<'_, T>) {}
}

/// A 0-based text span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSpan {
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

/// One reported finding: `(rule_key, file, text_span, message, cost)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub rule_key: &'static str,
    pub file: String,
    pub span: TextSpan,
    pub message: &'static str,
    pub cost: u32,
}

/// Glue over the classification pipeline: strip → tokenize → featurize →
/// predict → maybe report.
///
/// Single-threaded by convention: its `&mut self` API mirrors the host's
/// sequential, per-file traversal. Resources are loaded lazily on the
/// first [`Detector::classify`] call, never in [`Detector::new`].
pub struct Detector {
    config: DetectorConfig,
    pipeline: Option<Pipeline>,
    tokenizer: Option<RoBERTaTokenizer>,
}

impl Detector {
    /// Never touches the filesystem.
    pub fn new(config: DetectorConfig) -> Self {
        Detector {
            config,
            pipeline: None,
            tokenizer: None,
        }
    }

    fn ensure_pipeline(&mut self) -> Result<(), Error> {
        if self.pipeline.is_some() {
            return Ok(());
        }

        let pipeline = Pipeline::load(&self.config)?;
        self.tokenizer = Some(RoBERTaTokenizer::new(Rc::clone(&pipeline.ranks)));
        self.pipeline = Some(pipeline);
        Ok(())
    }

    /// Groups `trivia`, journals every batch, and classifies each one,
    /// emitting at most one [`Issue`] per batch.
    ///
    /// If `use_model` is `false` in this detector's config, a legacy
    /// heuristic path would run instead (out of scope here); this method
    /// returns an empty result without grouping or journaling.
    pub fn classify<T: Trivium>(
        &mut self,
        file: &str,
        trivia: &[T],
        journal: &mut impl CommentJournal<T>,
    ) -> Result<Vec<Issue>, Error> {
        if !self.config.use_model {
            return Ok(Vec::new());
        }

        let batches = group(trivia);
        let mut issues = Vec::with_capacity(batches.len());

        for batch in &batches {
            journal.record(batch);

            self.ensure_pipeline()?;
            let pipeline = self.pipeline.as_ref().expect("just ensured");
            let tokenizer = self.tokenizer.as_ref().expect("just ensured");

            let text = match sign_stripper::strip(batch) {
                Ok(text) => text,
                Err(err) => {
                    tracing::warn!(file, error = %err, "comment batch has an unrecognized prefix");
                    return Err(err);
                }
            };

            let tokens = tokenizer.tokenize(&text);
            let extractor = FeatureExtractor::new(&pipeline.vocabulary, self.config.max_tokens);
            let features = extractor.extract(&tokens);
            let prediction = pipeline.model.predict(&features)?;

            tracing::debug!(
                file,
                token_count = tokens.len(),
                decision = prediction.decision,
                "classified comment batch"
            );

            if prediction.decision {
                let first = batch.first();
                let last = batch.last();
                issues.push(Issue {
                    rule_key: RULE_KEY,
                    file: file.to_string(),
                    span: TextSpan {
                        start_line: first.start_line(),
                        start_col: first.start_col().saturating_sub(1),
                        end_line: last.end_line(),
                        end_col: last.end_col().saturating_sub(1),
                    },
                    message: MESSAGE,
                    cost: 0,
                });
            }
        }

        Ok(issues)
    }
}
