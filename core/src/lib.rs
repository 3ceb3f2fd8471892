//! Document retrieval over a folder of pre-normalized text files.
//!
//! [`Normalizer`] turns raw text into stems, [`SearchEngine`] builds a
//! vocabulary, term-frequency vectors and IDF weights from a corpus directory
//! and ranks documents for a query. [`SharedEngine`] lets a service swap in a
//! rebuilt engine without blocking readers.

pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod normalizer;
pub mod shared;

pub use config::{EngineConfig, NormalizerConfig, DEFAULT_TOP_K};
pub use engine::{EngineStats, SearchEngine};
pub use error::{Error, Result};
pub use index::{DocId, DocumentRecord, ScoredDocument, TermFrequencies, TermId, Vocabulary};
pub use normalizer::{Language, Normalizer, Tokens};
pub use shared::SharedEngine;
