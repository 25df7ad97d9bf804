use thiserror::Error;

/// Errors produced by model construction, scoring and generation.
///
/// # Variants
/// - `Configuration`: the model or a request is set up in a way that cannot
///   produce probabilities (bad order, bad smoothing constant, empty vocabulary,
///   inconsistent generation bounds).
/// - `Input`: the data handed to an otherwise valid model is unusable
///   (wrong n-gram length, empty test set).
///
/// Failures never touch the model: it is immutable once built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LmError {
	#[error("configuration error: {0}")]
	Configuration(String),

	#[error("input error: {0}")]
	Input(String),
}

impl LmError {
	pub(crate) fn configuration(message: impl Into<String>) -> Self {
		LmError::Configuration(message.into())
	}

	pub(crate) fn input(message: impl Into<String>) -> Self {
		LmError::Input(message.into())
	}
}

pub type LmResult<T> = Result<T, LmError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_display() {
		assert_eq!(LmError::configuration("n must be >= 1").to_string(), "configuration error: n must be >= 1");
		assert_eq!(LmError::input("empty test set").to_string(), "input error: empty test set");
	}
}
