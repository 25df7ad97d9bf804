use serde::{Deserialize, Serialize};

use crate::error::{LmError, LmResult};

/// Highest supported order.
///
/// A resource limit: every model materialises its `2^n` masks at construction,
/// so order 16 already holds 65 536 of them. Each mask packs its positions in a `u32`.
pub const MAX_ORDER: usize = 16;

/// Default add-k constant.
pub const DEFAULT_LAPLACE: f64 = 1.0;

/// Construction parameters of a `LanguageModel`.
///
/// # Invariants (checked by `validate`)
/// - `1 <= order <= MAX_ORDER`
/// - `laplace` is finite and strictly positive
///
/// `laplace` is ignored by unigram models, which use plain relative frequencies.
///
/// Orders above `MAX_ORDER` are refused as a resource limit rather than a
/// modelling one: the mask set grows as `2^n`.
///
/// Deserialises from a query string; missing fields keep their default.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
	/// Number of tokens in an n-gram.
	pub order: usize,

	/// Constant added to every n-gram count (n > 1).
	pub laplace: f64,
}

impl Default for ModelConfig {
	fn default() -> Self {
		Self { order: 2, laplace: DEFAULT_LAPLACE }
	}
}

impl ModelConfig {
	/// Creates a configuration of order `order` with the default smoothing constant.
	pub fn with_order(order: usize) -> Self {
		Self { order, ..Self::default() }
	}

	/// Checks the invariants listed on the type.
	///
	/// # Errors
	/// Returns `LmError::Configuration` describing the first violated rule.
	pub fn validate(&self) -> LmResult<()> {
		if self.order < 1 {
			return Err(LmError::configuration("n must be >= 1"));
		}
		if self.order > MAX_ORDER {
			return Err(LmError::configuration(format!("n must be <= {MAX_ORDER}, got {}", self.order)));
		}
		if !self.laplace.is_finite() || self.laplace <= 0.0 {
			return Err(LmError::configuration(format!(
				"laplace must be a positive finite number, got {}",
				self.laplace
			)));
		}
		Ok(())
	}
}
