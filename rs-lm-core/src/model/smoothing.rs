use std::collections::HashMap;

use super::freq_dist::{FreqDist, count_windows};

/// How raw counts become probabilities.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Smoothing {
	/// `count(ngram) / count(prefix)`; used for unigrams.
	MaximumLikelihood,
	/// `(count(ngram) + λ) / (count(prefix) + λ·|V|)`
	Laplace(f64),
}

/// Smoothed probabilities of the n-grams observed during training.
///
/// Unseen n-grams are not stored: they are computed on demand by `Estimator`.
#[derive(Clone, Debug, Default)]
pub struct ProbabilityTable {
	entries: HashMap<Vec<String>, f64>,
}

impl ProbabilityTable {
	pub fn get(&self, ngram: &[String]) -> Option<f64> {
		self.entries.get(ngram).copied()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&[String], f64)> {
		self.entries.iter().map(|(ngram, p)| (ngram.as_slice(), *p))
	}
}

/// Converts n-gram counts into smoothed probabilities.
///
/// Both count tables come from the same token stream, so numerator and
/// denominator always agree on the vocabulary.
///
/// # Invariants
/// - `ngram_counts` holds windows of length `order`
/// - `context_counts` holds windows of length `order - 1` (the empty window for unigrams)
#[derive(Clone, Debug)]
pub struct Estimator {
	order: usize,
	smoothing: Smoothing,
	vocabulary_size: usize,
	ngram_counts: FreqDist<Vec<String>>,
	context_counts: FreqDist<Vec<String>>,
}

impl Estimator {
	/// Counts `tokens` for a model of order `order`.
	///
	/// Unigram models ignore `laplace` and use maximum likelihood.
	pub fn new(tokens: &[String], order: usize, laplace: f64, vocabulary_size: usize) -> Self {
		let smoothing = if order == 1 { Smoothing::MaximumLikelihood } else { Smoothing::Laplace(laplace) };
		Self {
			order,
			smoothing,
			vocabulary_size,
			ngram_counts: count_windows(tokens, order),
			context_counts: count_windows(tokens, order - 1),
		}
	}

	pub fn smoothing(&self) -> Smoothing {
		self.smoothing
	}

	/// Count of a full n-gram, `0` if unseen.
	pub fn ngram_count(&self, ngram: &[String]) -> usize {
		self.ngram_counts.get(ngram)
	}

	/// Count of a prefix, `0` if unseen.
	pub fn context_count(&self, prefix: &[String]) -> usize {
		self.context_counts.get(prefix)
	}

	/// Applies the smoothing formula to `ngram`, seen or not.
	///
	/// `ngram` must hold exactly `order` tokens.
	pub fn estimate(&self, ngram: &[String]) -> f64 {
		let count = self.ngram_count(ngram) as f64;
		let context = self.context_count(&ngram[..self.order - 1]) as f64;
		match self.smoothing {
			Smoothing::MaximumLikelihood => {
				if context == 0.0 { 0.0 } else { count / context }
			}
			Smoothing::Laplace(laplace) => (count + laplace) / (context + laplace * self.vocabulary_size as f64),
		}
	}

	/// Builds the table of every observed n-gram.
	pub fn table(&self) -> ProbabilityTable {
		let entries = self
			.ngram_counts
			.keys()
			.map(|ngram| (ngram.clone(), self.estimate(ngram)))
			.collect();
		ProbabilityTable { entries }
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::preprocess::preprocess;

	fn strings(tokens: &[&str]) -> Vec<String> {
		tokens.iter().map(|t| t.to_string()).collect()
	}

	fn vocabulary_size(tokens: &[String]) -> usize {
		tokens.iter().collect::<std::collections::HashSet<_>>().len()
	}

	#[test]
	fn test_unigram_relative_frequency() {
		let tokens = strings(&["a", "b", "a", "a"]);
		let estimator = Estimator::new(&tokens, 1, 1.0, 2);
		assert_eq!(estimator.smoothing(), Smoothing::MaximumLikelihood);
		assert_eq!(estimator.estimate(&strings(&["a"])), 0.75);
		assert_eq!(estimator.estimate(&strings(&["b"])), 0.25);
		assert_eq!(estimator.estimate(&strings(&["c"])), 0.0);
	}

	#[test]
	fn test_laplace_bigram() {
		let tokens = preprocess(&["the cat sat", "the dog sat"], 2);
		let v = vocabulary_size(&tokens);
		assert_eq!(v, 5);
		let estimator = Estimator::new(&tokens, 2, 1.0, v);
		// count(<s> the) = 2, count(<s>) = 2
		assert!((estimator.estimate(&strings(&["<s>", "the"])) - 3.0 / 7.0).abs() < 1e-12);
		// unseen continuation
		assert!((estimator.estimate(&strings(&["<s>", "sat"])) - 1.0 / 7.0).abs() < 1e-12);
		// unseen context
		assert!((estimator.estimate(&strings(&["nope", "sat"])) - 1.0 / 5.0).abs() < 1e-12);
	}

	#[test]
	fn test_laplace_constant() {
		let tokens = strings(&["<s>", "a", "b", "</s>", "<s>", "a", "b", "</s>"]);
		let estimator = Estimator::new(&tokens, 2, 0.5, 4);
		// (2 + 0.5) / (2 + 0.5 * 4)
		assert!((estimator.estimate(&strings(&["a", "b"])) - 2.5 / 4.0).abs() < 1e-12);
	}

	#[test]
	fn test_context_count_defaults_to_zero() {
		let tokens = strings(&["a", "b", "c"]);
		let estimator = Estimator::new(&tokens, 3, 1.0, 3);
		assert_eq!(estimator.context_count(&strings(&["a", "b"])), 1);
		assert_eq!(estimator.context_count(&strings(&["x", "y"])), 0);
	}

	#[test]
	fn test_table_holds_observed_ngrams() {
		let tokens = strings(&["a", "b", "a", "b"]);
		let estimator = Estimator::new(&tokens, 2, 1.0, 2);
		let table = estimator.table();
		assert_eq!(table.len(), 2);
		assert_eq!(table.get(&strings(&["a", "b"])), Some(estimator.estimate(&strings(&["a", "b"]))));
		assert_eq!(table.get(&strings(&["b", "b"])), None);
	}
}
