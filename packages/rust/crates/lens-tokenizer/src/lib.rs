#![allow(clippy::doc_markdown)]

//! lens-tokenizer - Language-aware tokenization for vault notes
//!
//! Turns raw note text into three parallel streams (lemmatized tokens,
//! named entities, noun chunks) with one pipeline per supported language,
//! and ranks any stream by frequency.
//!
//! # Example
//!
//! ```rust,ignore
//! use lens_tokenizer::{Tokenizer, TokenizerConfig, rank};
//!
//! let tokenizer = Tokenizer::new(&TokenizerConfig::default())?;
//! let analysis = tokenizer.analyze("Heute habe ich [[Rust]] gelernt.");
//! let top = rank(&analysis.streams.tokens);
//! ```

mod error;
mod language;
mod normalize;
mod pipeline;
mod rank;
mod segment;
mod stopwords;

pub use error::TokenizerError;
pub use language::{Language, LanguageClassifier, WhatlangClassifier};
pub use normalize::{is_joiner_only, normalize_note_text};
pub use pipeline::{Analysis, LanguagePipeline, Lemmatizer, TokenStreams, Tokenizer, TokenizerConfig};
pub use rank::{RankedItem, RankedList, rank};
pub use segment::{Segment, SegmentKind, segment};
pub use stopwords::{DOMAIN_STOP_WORDS, StopWords};
