//! # commentcop
//!
//! A commented-out-code detector: decides, for each comment found in a
//! source file, whether it contains source code (and should be reported)
//! or is legitimate prose.
//!
//! The classification pipeline is linear and leaves-first:
//!
//! 1. [`comment`] groups comment trivia into batches and strips Javadoc.
//! 2. [`sign_stripper`] removes the comment delimiters (`//`, `/* */`, `/** */`).
//! 3. [`tokenizer`] runs a faithful port of the Hugging Face RoBERTa
//!    tokenizer: regex pre-tokenization, byte-to-visible-unicode
//!    remapping, and rank-driven BPE merges ([`bpe`], [`byte_encoder`]).
//! 4. [`features`] turns the token stream into a bag-of-vocabulary count
//!    vector plus two engineered features (semicolon count and frequency).
//! 5. [`model`] scores the feature vector with a logistic-regression model
//!    and thresholds the sigmoid into a decision.
//!
//! [`detector::Detector`] is the glue that drives all five stages end to
//! end over host-supplied comment trivia.
//!
//! ## Example
//!
//! ```no_run
//! use commentcop::{CommentJournal, Detector, DetectorConfig, NullJournal, Trivium};
//!
//! struct LineComment {
//!     line: u32,
//!     text: String,
//! }
//!
//! impl Trivium for LineComment {
//!     fn is_block(&self) -> bool { false }
//!     fn start_line(&self) -> u32 { self.line }
//!     fn start_col(&self) -> u32 { 1 }
//!     fn end_line(&self) -> u32 { self.line }
//!     fn end_col(&self) -> u32 { self.text.len() as u32 + 1 }
//!     fn text(&self) -> &str { &self.text }
//! }
//!
//! # fn main() -> Result<(), commentcop::Error> {
//! let config = DetectorConfig::from_data_dir("./data");
//! let mut detector = Detector::new(config);
//!
//! let trivia = vec![LineComment { line: 1, text: "// int x = 1;".to_string() }];
//! let issues = detector.classify("example.rs", &trivia, &mut NullJournal)?;
//! for issue in &issues {
//!     println!("{}: {}", issue.rule_key, issue.message);
//! }
//! # Ok(())
//! # }
//! ```

pub mod bpe;
pub mod byte_encoder;
pub mod comment;
pub mod config;
pub mod detector;
pub mod error;
pub mod features;
pub mod invariants;
pub mod model;
pub mod resources;
pub mod sign_stripper;
pub mod tokenizer;

pub use comment::{CommentBatch, CommentKind, Trivium};
pub use config::{DetectorConfig, ResourceLocation};
pub use detector::{CommentJournal, Detector, Issue, NullJournal, TextSpan, MESSAGE, RULE_KEY};
pub use error::Error;
pub use features::{FeatureExtractor, Vocabulary};
pub use model::{Model, Prediction};
pub use resources::Pipeline;
pub use tokenizer::{
    LevelCache, MemoCache, NoopListener, PassThroughCache, RoBERTaTokenizer, TokenizeListener,
};
