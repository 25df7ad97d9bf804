//! End-to-end behaviour of the language model.

use std::sync::Arc;
use std::thread;

use rs_lm_core::LmError;
use rs_lm_core::analysis::{StopWords, most_common_ngrams};
use rs_lm_core::corpus::{split_sentences, train_test_split};
use rs_lm_core::model::preprocess::{END_TOKEN, START_TOKEN, UNKNOWN_TOKEN, preprocess};
use rs_lm_core::model::{Decoding, GenerationInput, LanguageModel, ModelConfig};

const TEXT: &str = "The cat sat on the mat. The dog sat on the mat. The cat ate the fish. \
	The dog ate the fish. A cat saw the dog. A dog saw the cat. The fish saw the cat.";

fn training() -> Vec<String> {
	split_sentences(&TEXT.to_lowercase(), '.')
}

#[test]
fn test_frequent_word_beats_singleton() {
	let model = LanguageModel::new(&["the cat sat", "the dog sat"], 2).unwrap();
	let vocabulary: Vec<&str> = model.vocabulary().collect();
	assert!(vocabulary.contains(&START_TOKEN));
	assert!(vocabulary.contains(&END_TOKEN));
	assert!(vocabulary.contains(&UNKNOWN_TOKEN));
	assert!(!vocabulary.contains(&"cat"));
	assert_eq!(model.vocabulary_size(), 5);

	let the = model.probability(&["<s>", "the"]).unwrap();
	let cat = model.probability(&["<s>", "cat"]).unwrap();
	assert!(the > cat, "{the} <= {cat}");
}

#[test]
fn test_preprocessing_round_trip() {
	let sentences = training();
	for order in 1..5 {
		assert_eq!(preprocess(&sentences, order), preprocess(&sentences, order));
	}
}

#[test]
fn test_empty_corpus_boundary() {
	let empty: Vec<String> = Vec::new();
	assert!(preprocess(&empty, 3).is_empty());

	let model = LanguageModel::new(&empty, 3).unwrap();
	assert_eq!(model.vocabulary_size(), 0);
	let err = model.perplexity(&["the cat sat"]).unwrap_err();
	assert!(matches!(err, LmError::Configuration(_) | LmError::Input(_)));
}

#[test]
fn test_perplexity_prefers_training_distribution() {
	let sentences = training();
	for order in 2..4 {
		let model = LanguageModel::new(&sentences, order).unwrap();
		let own = model.perplexity(&sentences).unwrap();
		let unrelated = model
			.perplexity(&["quantum flux engines hum loudly", "purple zebras dance quietly"])
			.unwrap();
		assert!(own.is_finite(), "order {order}: {own}");
		assert!(own < unrelated, "order {order}: own {own}, unrelated {unrelated}");
	}
}

#[test]
fn test_held_out_perplexity_is_finite() {
	let sentences = training();
	let (train, test) = train_test_split(&sentences, 0.3, 11).unwrap();
	assert!(!test.is_empty());
	for order in 2..5 {
		let model = LanguageModel::new(&train, order).unwrap();
		let perplexity = model.perplexity(&test).unwrap();
		assert!(perplexity.is_finite() && perplexity >= 1.0, "order {order}: {perplexity}");
	}
}

#[test]
fn test_laplace_constant_changes_estimates() {
	let sentences = training();
	let add_one = LanguageModel::new(&sentences, 2).unwrap();
	let add_small = LanguageModel::with_config(&sentences, &ModelConfig { order: 2, laplace: 0.01 }).unwrap();

	// less smoothing keeps more mass on observed bigrams
	let seen = ["the", "cat"];
	assert!(add_small.probability(&seen).unwrap() > add_one.probability(&seen).unwrap());
	let unseen = ["mat", "cat"];
	assert!(add_small.probability(&unseen).unwrap() < add_one.probability(&unseen).unwrap());
}

#[test]
fn test_generation_is_idempotent() {
	let model = LanguageModel::new(&training(), 3).unwrap();
	let first = model.generate_sentences(5, 2, 12).unwrap();
	let second = model.generate_sentences(5, 2, 12).unwrap();
	assert_eq!(first, second);
	for sentence in &first {
		let words = sentence.text.split_whitespace().count();
		assert!((2..=12).contains(&words));
		assert!(sentence.probability > 0.0 && sentence.probability <= 1.0);
	}
}

#[test]
fn test_sampling_differs_by_seed() {
	let model = LanguageModel::new(&training(), 2).unwrap();
	let runs: Vec<Vec<String>> = (0..8)
		.map(|seed| {
			let mut input = GenerationInput::new(6).unwrap();
			input.decoding = Decoding::Sampled(seed);
			model.generate(&input).unwrap().into_iter().map(|s| s.text).collect()
		})
		.collect();
	assert!(runs.iter().any(|run| run != &runs[0]));
}

#[test]
fn test_shared_model_across_threads() {
	let model = Arc::new(LanguageModel::new(&training(), 2).unwrap());
	let expected_perplexity = model.perplexity(&training()).unwrap();
	let expected_sentences = model.generate_sentences(2, 1, 8).unwrap();

	let handles: Vec<_> = (0..4)
		.map(|_| {
			let model = Arc::clone(&model);
			thread::spawn(move || (model.perplexity(&training()).unwrap(), model.generate_sentences(2, 1, 8).unwrap()))
		})
		.collect();

	for handle in handles {
		let (perplexity, sentences) = handle.join().unwrap();
		assert_eq!(perplexity, expected_perplexity);
		assert_eq!(sentences, expected_sentences);
	}
}

#[test]
fn test_analysis_is_independent_of_the_model() {
	let top = most_common_ngrams(&training(), 1, &StopWords::english(), 3);
	assert_eq!(top[0], (vec!["cat".to_string()], 5));
	assert_eq!(top[1], (vec!["dog".to_string()], 4));
}
