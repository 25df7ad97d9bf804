use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::error::{LmError, LmResult};

/// Default sentence delimiter.
pub const DEFAULT_DELIMITER: char = '.';

/// Splits raw text into sentences.
///
/// - Splits on `delimiter`
/// - Collapses inner whitespace (including newlines) to single spaces
/// - Drops empty entries
///
/// Example: `"The cat.\nThe dog. "` → `["The cat", "The dog"]`
pub fn split_sentences(text: &str, delimiter: char) -> Vec<String> {
	text.split(delimiter)
		.map(|sentence| sentence.split_whitespace().collect::<Vec<_>>().join(" "))
		.filter(|sentence| !sentence.is_empty())
		.collect()
}

/// Partitions sentences into a training and a test set.
///
/// Sentences are shuffled with a `StdRng` seeded by `seed`, then the first
/// `round(len * test_ratio)` go to the test set. Both halves keep the
/// shuffled order. The same seed always gives the same split.
///
/// # Errors
/// Returns `LmError::Configuration` if `test_ratio` is outside `[0, 1]`.
pub fn train_test_split<S: AsRef<str>>(
	sentences: &[S],
	test_ratio: f64,
	seed: u64,
) -> LmResult<(Vec<String>, Vec<String>)> {
	if !(0.0..=1.0).contains(&test_ratio) {
		return Err(LmError::configuration(format!("test_ratio must be between 0.0 and 1.0, got {test_ratio}")));
	}

	let mut shuffled: Vec<String> = sentences.iter().map(|s| s.as_ref().to_owned()).collect();
	shuffled.shuffle(&mut StdRng::seed_from_u64(seed));

	let test_len = (shuffled.len() as f64 * test_ratio).round() as usize;
	let train = shuffled.split_off(test_len);
	Ok((train, shuffled))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_split_sentences() {
		let sentences = split_sentences("The cat sat.\nThe   dog\nran. . ", DEFAULT_DELIMITER);
		assert_eq!(sentences, vec!["The cat sat", "The dog ran"]);
	}

	#[test]
	fn test_split_custom_delimiter() {
		assert_eq!(split_sentences("a b|c||d", '|'), vec!["a b", "c", "d"]);
		assert!(split_sentences("", '.').is_empty());
	}

	#[test]
	fn test_train_test_split() {
		let sentences: Vec<String> = (0..10).map(|i| format!("sentence {i}")).collect();
		let (train, test) = train_test_split(&sentences, 0.2, 1).unwrap();
		assert_eq!(train.len(), 8);
		assert_eq!(test.len(), 2);

		let mut all: Vec<String> = train.iter().chain(test.iter()).cloned().collect();
		all.sort();
		let mut expected = sentences.clone();
		expected.sort();
		assert_eq!(all, expected);

		assert_eq!(train_test_split(&sentences, 0.2, 1).unwrap(), (train, test));
	}

	#[test]
	fn test_train_test_split_bad_ratio() {
		assert!(matches!(train_test_split(&["a"], 1.5, 0), Err(LmError::Configuration(_))));
		assert!(matches!(train_test_split(&["a"], f64::NAN, 0), Err(LmError::Configuration(_))));
	}
}
