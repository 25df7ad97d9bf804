use super::config::ModelConfig;
use super::freq_dist::FreqDist;
use super::generation_input::{Decoding, GenerationInput};
use super::generator::{GeneratedSentence, SentenceGenerator};
use super::mask::{Mask, all_masks};
use super::preprocess::{UNKNOWN_TOKEN, preprocess, tokenize};
use super::smoothing::{Estimator, ProbabilityTable, Smoothing};
use crate::error::{LmError, LmResult};

/// A word-level n-gram language model.
///
/// Built once from a list of raw sentences and immutable afterwards, so a
/// single instance can be shared between threads for scoring and generation.
///
/// # Responsibilities
/// - Preprocess and count the training corpus
/// - Answer smoothed probabilities for any n-gram, seen or not
/// - Score held-out text (sentence probability, perplexity)
/// - Generate sentences greedily or by seeded sampling
///
/// # Invariants
/// - Vocabulary, count tables and probability table come from one token stream
/// - `sorted_vocabulary` holds the vocabulary keys in lexicographic order
/// - `masks` holds the `2^n` masks, all-ones first
#[derive(Clone, Debug)]
pub struct LanguageModel {
	config: ModelConfig,
	vocabulary: FreqDist<String>,
	sorted_vocabulary: Vec<String>,
	estimator: Estimator,
	table: ProbabilityTable,
	masks: Vec<Mask>,
}

impl LanguageModel {
	/// Trains a model of order `order` with the default smoothing constant.
	///
	/// # Errors
	/// Returns `LmError::Configuration` if `order` is out of range.
	pub fn new<S: AsRef<str>>(train_sentences: &[S], order: usize) -> LmResult<Self> {
		Self::with_config(train_sentences, &ModelConfig::with_order(order))
	}

	/// Trains a model with an explicit configuration.
	///
	/// An empty corpus is accepted and yields an empty vocabulary; every
	/// later query on such a model fails with `LmError::Configuration`.
	///
	/// # Errors
	/// Returns `LmError::Configuration` if `config` does not validate.
	pub fn with_config<S: AsRef<str>>(train_sentences: &[S], config: &ModelConfig) -> LmResult<Self> {
		config.validate()?;

		let tokens = preprocess(train_sentences, config.order);
		let vocabulary: FreqDist<String> = tokens.iter().cloned().collect();
		let mut sorted_vocabulary: Vec<String> = vocabulary.keys().cloned().collect();
		sorted_vocabulary.sort();

		let estimator = Estimator::new(&tokens, config.order, config.laplace, vocabulary.len());
		let table = estimator.table();

		if vocabulary.is_empty() {
			log::warn!("training corpus is empty, the model cannot answer queries");
		}
		log::info!(
			"trained {}-gram model: {} sentences, {} tokens, vocabulary {}, {} n-grams",
			config.order,
			train_sentences.len(),
			tokens.len(),
			vocabulary.len(),
			table.len()
		);

		Ok(Self {
			config: *config,
			vocabulary,
			sorted_vocabulary,
			estimator,
			table,
			masks: all_masks(config.order),
		})
	}

	pub fn config(&self) -> &ModelConfig {
		&self.config
	}

	pub fn order(&self) -> usize {
		self.config.order
	}

	pub fn smoothing(&self) -> Smoothing {
		self.estimator.smoothing()
	}

	/// Number of distinct tokens, markers included.
	pub fn vocabulary_size(&self) -> usize {
		self.vocabulary.len()
	}

	/// Vocabulary tokens in lexicographic order.
	pub fn vocabulary(&self) -> impl Iterator<Item = &str> {
		self.sorted_vocabulary.iter().map(String::as_str)
	}

	/// Training count of `token`, `0` if unknown.
	pub fn count(&self, token: &str) -> usize {
		self.vocabulary.get(token)
	}

	pub fn table(&self) -> &ProbabilityTable {
		&self.table
	}

	/// The `2^n` masks, all-ones first.
	///
	/// Not used by scoring; exposed for backoff-style extensions.
	pub fn masks(&self) -> &[Mask] {
		&self.masks
	}

	fn ensure_trained(&self) -> LmResult<()> {
		if self.vocabulary.is_empty() {
			return Err(LmError::configuration("the model was trained on an empty corpus"));
		}
		Ok(())
	}

	fn owned_tokens<S: AsRef<str>>(tokens: &[S], expected: usize, what: &str) -> LmResult<Vec<String>> {
		if tokens.len() != expected {
			return Err(LmError::input(format!("{what} must hold {expected} token(s), got {}", tokens.len())));
		}
		Ok(tokens.iter().map(|t| t.as_ref().to_owned()).collect())
	}

	/// Stored value when observed, smoothing formula otherwise.
	fn probability_of(&self, ngram: &[String]) -> f64 {
		self.table.get(ngram).unwrap_or_else(|| self.estimator.estimate(ngram))
	}

	/// Smoothed probability of `ngram`.
	///
	/// Unseen n-grams resolve through the smoothing formula, so this never
	/// misses. For `n > 1` the result is strictly positive.
	///
	/// # Errors
	/// - `LmError::Configuration` if the vocabulary is empty
	/// - `LmError::Input` if `ngram` does not hold exactly `n` tokens
	pub fn probability<S: AsRef<str>>(&self, ngram: &[S]) -> LmResult<f64> {
		self.ensure_trained()?;
		let ngram = Self::owned_tokens(ngram, self.order(), "n-gram")?;
		Ok(self.probability_of(&ngram))
	}

	/// Probability of every vocabulary token as continuation of `context`.
	///
	/// Tokens listed in `exclude` are skipped. Entries come in lexicographic order.
	///
	/// # Errors
	/// - `LmError::Configuration` if the vocabulary is empty
	/// - `LmError::Input` if `context` does not hold exactly `n-1` tokens
	pub fn continuation_distribution<S: AsRef<str>>(
		&self,
		context: &[S],
		exclude: &[&str],
	) -> LmResult<Vec<(&str, f64)>> {
		self.ensure_trained()?;
		let mut ngram = Self::owned_tokens(context, self.order() - 1, "context")?;
		ngram.push(String::new());

		let last = ngram.len() - 1;
		let mut distribution = Vec::with_capacity(self.sorted_vocabulary.len());
		for candidate in &self.sorted_vocabulary {
			if exclude.contains(&candidate.as_str()) {
				continue;
			}
			candidate.clone_into(&mut ngram[last]);
			distribution.push((candidate.as_str(), self.probability_of(&ngram)));
		}
		Ok(distribution)
	}

	/// Most probable continuation of `context`, skipping `exclude`.
	///
	/// Ties go to the lexicographically smallest token. Returns `None` when
	/// every vocabulary token is excluded.
	///
	/// # Errors
	/// Same as `continuation_distribution`.
	pub fn best_candidate<S: AsRef<str>>(&self, context: &[S], exclude: &[&str]) -> LmResult<Option<(&str, f64)>> {
		let mut best: Option<(&str, f64)> = None;
		for (candidate, p) in self.continuation_distribution(context, exclude)? {
			match best {
				Some((_, best_p)) if p <= best_p => (),
				_ => best = Some((candidate, p)),
			}
		}
		Ok(best)
	}

	/// Replaces tokens missing from the vocabulary with the unknown marker,
	/// when the vocabulary has one.
	fn map_unknown(&self, tokens: Vec<String>) -> Vec<String> {
		if !self.vocabulary.contains(UNKNOWN_TOKEN) {
			return tokens;
		}
		tokens
			.into_iter()
			.map(|token| if self.vocabulary.contains(&token) { token } else { UNKNOWN_TOKEN.to_owned() })
			.collect()
	}

	/// Natural log of the probability of one sentence, markers included.
	///
	/// The sentence is wrapped like training data; words outside the
	/// vocabulary count as the unknown marker.
	///
	/// # Errors
	/// `LmError::Configuration` if the vocabulary is empty.
	pub fn sentence_log_probability(&self, sentence: &str) -> LmResult<f64> {
		self.ensure_trained()?;
		let tokens = self.map_unknown(tokenize(&[sentence], self.order()));
		Ok(tokens.windows(self.order()).map(|ngram| self.probability_of(ngram).ln()).sum())
	}

	/// Probability of one sentence. See `sentence_log_probability`.
	pub fn sentence_probability(&self, sentence: &str) -> LmResult<f64> {
		Ok(self.sentence_log_probability(sentence)?.exp())
	}

	/// Perplexity of held-out sentences.
	///
	/// The sentences are preprocessed like training data (same order, singleton
	/// collapse), then words outside the vocabulary count as the unknown marker.
	/// The geometric mean of inverse probabilities is computed in log space.
	///
	/// Returns `f64::INFINITY` if some n-gram has probability zero, which only a
	/// unigram model without unknown marker can produce.
	///
	/// # Errors
	/// - `LmError::Configuration` if the vocabulary is empty
	/// - `LmError::Input` if the test set yields no n-gram
	pub fn perplexity<S: AsRef<str>>(&self, test_sentences: &[S]) -> LmResult<f64> {
		self.ensure_trained()?;
		let tokens = self.map_unknown(preprocess(test_sentences, self.order()));

		let mut negative_log_sum = 0.0;
		let mut ngrams = 0usize;
		for ngram in tokens.windows(self.order()) {
			let p = self.probability_of(ngram);
			if p <= 0.0 {
				log::warn!("n-gram {ngram:?} has probability 0, perplexity is infinite");
				return Ok(f64::INFINITY);
			}
			negative_log_sum -= p.ln();
			ngrams += 1;
		}

		if ngrams == 0 {
			return Err(LmError::input("perplexity is undefined over an empty test set"));
		}

		let perplexity = (negative_log_sum / ngrams as f64).exp();
		log::debug!("perplexity {perplexity:.4} over {ngrams} n-grams");
		Ok(perplexity)
	}

	/// Generates sentences as described by `input`.
	///
	/// # Errors
	/// `LmError::Configuration` if the vocabulary is empty.
	pub fn generate(&self, input: &GenerationInput) -> LmResult<Vec<GeneratedSentence>> {
		self.ensure_trained()?;
		SentenceGenerator::new(self, input).run()
	}

	/// Greedily generates `count` sentences of `min_len..=max_len` tokens.
	///
	/// Deterministic: the same model and arguments always give the same output.
	///
	/// # Errors
	/// `LmError::Configuration` on an empty vocabulary, a `count` above
	/// `MAX_COUNT` or inconsistent bounds.
	pub fn generate_sentences(&self, count: usize, min_len: usize, max_len: usize) -> LmResult<Vec<GeneratedSentence>> {
		let mut input = GenerationInput::new(count)?;
		input.set_length_bounds(min_len, max_len)?;
		self.generate(&input)
	}

	/// Runs `input` with seeded sampling, whatever its `decoding` says.
	///
	/// # Errors
	/// `LmError::Configuration` if the vocabulary is empty.
	pub fn sample_sentences(&self, input: &GenerationInput, seed: u64) -> LmResult<Vec<GeneratedSentence>> {
		let mut input = input.clone();
		input.decoding = Decoding::Sampled(seed);
		self.generate(&input)
	}
}
