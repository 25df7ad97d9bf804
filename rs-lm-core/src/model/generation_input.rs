use crate::error::{LmError, LmResult};

/// How the next token is chosen at each generation step.
///
/// # Variants
/// - `Greedy`: always take the most probable continuation; ties go to the
///   lexicographically smallest token. Repeated runs are identical.
/// - `Sampled(seed)`: draw the continuation from the smoothed distribution
///   with a random generator seeded by `seed`. Identical seeds give identical runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Decoding {
	#[default]
	Greedy,
	Sampled(u64),
}

/// Most sentences a single request may ask for.
pub const MAX_COUNT: usize = 10_000;

/// Parameters of a generation request.
///
/// # Invariants
/// - `count <= MAX_COUNT`
/// - `1 <= max_len`
/// - `min_len <= max_len`
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationInput {
	/// Number of sentences to produce.
	count: usize,

	/// Token selection strategy.
	pub decoding: Decoding,

	/// Never emit the unknown marker.
	pub exclude_unknown: bool,

	/// The end marker is suppressed until this many tokens are produced.
	min_len: usize,

	/// Generation stops after this many tokens.
	max_len: usize,
}

impl Default for GenerationInput {
	fn default() -> Self {
		Self { count: 1, decoding: Decoding::Greedy, exclude_unknown: false, min_len: 1, max_len: 20 }
	}
}

impl GenerationInput {
	/// Greedy input producing `count` sentences with the default bounds.
	///
	/// # Errors
	/// Returns `LmError::Configuration` if `count > MAX_COUNT`.
	pub fn new(count: usize) -> LmResult<Self> {
		let mut input = Self::default();
		input.set_count(count)?;
		Ok(input)
	}

	pub fn count(&self) -> usize {
		self.count
	}

	/// Sets the number of sentences to produce.
	///
	/// # Errors
	/// Returns `LmError::Configuration` if `count > MAX_COUNT`.
	pub fn set_count(&mut self, count: usize) -> LmResult<()> {
		if count > MAX_COUNT {
			return Err(LmError::configuration(format!("count must be <= {MAX_COUNT}, got {count}")));
		}
		self.count = count;
		Ok(())
	}

	pub fn min_len(&self) -> usize {
		self.min_len
	}

	pub fn max_len(&self) -> usize {
		self.max_len
	}

	/// Sets both length bounds.
	///
	/// # Errors
	/// Returns `LmError::Configuration` if `max_len == 0` or `min_len > max_len`.
	pub fn set_length_bounds(&mut self, min_len: usize, max_len: usize) -> LmResult<()> {
		if max_len == 0 {
			return Err(LmError::configuration("max_len must be >= 1"));
		}
		if min_len > max_len {
			return Err(LmError::configuration(format!(
				"min_len ({min_len}) must not exceed max_len ({max_len})"
			)));
		}
		self.min_len = min_len;
		self.max_len = max_len;
		Ok(())
	}
}
