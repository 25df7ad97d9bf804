use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use super::generation_input::{Decoding, GenerationInput};
use super::language_model::LanguageModel;
use super::preprocess::{END_TOKEN, START_TOKEN, UNKNOWN_TOKEN};
use crate::error::LmResult;

/// One generated sentence and the product of the probabilities of its choices.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct GeneratedSentence {
	pub text: String,
	pub probability: f64,
}

/// Lifecycle of a single generation run.
///
/// `Seeded → Extending` on the first choice, `Extending → Extending` while
/// tokens are appended, `→ Terminated` on the end marker, on `max_len`, or
/// when no candidate is left.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerationState {
	Seeded,
	Extending,
	Terminated,
}

/// Runs generation requests against one model.
///
/// Greedy runs hold no random generator. Sampled runs own a `StdRng` seeded
/// from the request, so two runs with the same seed agree.
pub(crate) struct SentenceGenerator<'m> {
	model: &'m LanguageModel,
	input: &'m GenerationInput,
	rng: Option<StdRng>,
}

impl<'m> SentenceGenerator<'m> {
	pub(crate) fn new(model: &'m LanguageModel, input: &'m GenerationInput) -> Self {
		let rng = match input.decoding {
			Decoding::Greedy => None,
			Decoding::Sampled(seed) => Some(StdRng::seed_from_u64(seed)),
		};
		Self { model, input, rng }
	}

	/// Produces `input.count()` sentences, one run after the other.
	pub(crate) fn run(&mut self) -> LmResult<Vec<GeneratedSentence>> {
		let mut sentences = Vec::new();
		for _ in 0..self.input.count() {
			sentences.push(self.generate_one()?);
		}
		Ok(sentences)
	}

	/// Tokens that may not be chosen once `produced` tokens exist.
	fn exclusions(&self, produced: usize) -> Vec<&'static str> {
		let mut exclude = vec![START_TOKEN];
		if produced < self.input.min_len() {
			exclude.push(END_TOKEN);
		}
		if self.input.exclude_unknown {
			exclude.push(UNKNOWN_TOKEN);
		}
		exclude
	}

	fn choose(&mut self, context: &[String], exclude: &[&str]) -> LmResult<Option<(&'m str, f64)>> {
		let model = self.model;
		match self.rng.as_mut() {
			None => model.best_candidate(context, exclude),
			Some(rng) => Ok(sample(rng, model.continuation_distribution(context, exclude)?)),
		}
	}

	fn generate_one(&mut self) -> LmResult<GeneratedSentence> {
		let order = self.model.order();
		let mut context = vec![START_TOKEN.to_owned(); order - 1];
		let mut words: Vec<&str> = Vec::new();
		let mut probability = 1.0;
		let mut state = GenerationState::Seeded;

		while state != GenerationState::Terminated {
			if words.len() >= self.input.max_len() {
				state = GenerationState::Terminated;
				continue;
			}

			let exclude = self.exclusions(words.len());
			state = match self.choose(&context, &exclude)? {
				None => GenerationState::Terminated,
				Some((token, p)) => {
					probability *= p;
					if token == END_TOKEN {
						GenerationState::Terminated
					} else {
						words.push(token);
						if !context.is_empty() {
							context.remove(0);
							context.push(token.to_owned());
						}
						GenerationState::Extending
					}
				}
			};
		}

		let text = words.join(" ");
		log::debug!("generated {:?} (p = {probability:e})", text);
		Ok(GeneratedSentence { text, probability })
	}
}

/// Draws one entry proportionally to its weight.
///
/// Weights need not sum to one: excluded tokens leave a hole that is
/// renormalised away here.
fn sample<'a>(rng: &mut StdRng, distribution: Vec<(&'a str, f64)>) -> Option<(&'a str, f64)> {
	let total: f64 = distribution.iter().map(|(_, p)| p).sum();
	if distribution.is_empty() || total <= 0.0 {
		return None;
	}

	let mut r = rng.random_range(0.0..total);
	let mut fallback = None;
	for (token, p) in distribution {
		if r < p {
			return Some((token, p));
		}
		r -= p;
		fallback = Some((token, p));
	}

	// Rounding can leave `r` just above the last bucket
	fallback
}
