//! Top-level module for the n-gram language model.
//!
//! Data flows one way:
//! raw sentences → `preprocess` → token stream → `freq_dist` → `smoothing`
//! → `LanguageModel` (scoring, generation).

/// Model construction parameters (`ModelConfig`).
pub mod config;

/// Zero-default frequency distributions and window counting.
pub mod freq_dist;

/// Generation request parameters (`GenerationInput`, `Decoding`).
pub mod generation_input;

/// Sentence generation state machine and decoders.
pub mod generator;

/// The trained model: probability lookup, scoring and generation.
pub mod language_model;

/// Bit masks over n-gram positions.
pub mod mask;

/// Sentence wrapping, reserved markers and singleton collapse.
pub mod preprocess;

/// Maximum-likelihood and Laplace estimators.
pub mod smoothing;

pub use config::ModelConfig;
pub use generation_input::{Decoding, GenerationInput};
pub use generator::{GeneratedSentence, GenerationState};
pub use language_model::LanguageModel;
