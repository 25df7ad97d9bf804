//! Word-level n-gram language modelling library.
//!
//! This crate provides:
//! - Sentence preprocessing with boundary and unknown-word markers
//! - N-gram counting and Laplace smoothing
//! - Probability lookup, sentence scoring and perplexity
//! - Greedy and seeded sampled sentence generation
//! - Corpus splitting helpers and an exploratory n-gram frequency utility
//!
//! The model itself performs no I/O: it takes a list of raw sentences.

/// Error type shared by every fallible operation.
pub mod error;

/// Core n-gram model, estimators and generation.
pub mod model;

/// Sentence splitting and train/test partitioning.
pub mod corpus;

/// Word tokenizer, stopwords and most-common n-gram counts.
///
/// Independent of the probability model.
pub mod analysis;

/// File helpers used by the binaries (corpus loading, listing).
pub mod io;

pub use error::{LmError, LmResult};
