use super::preprocess::UNKNOWN_TOKEN;

/// A binary pattern over the `n` positions of an n-gram.
///
/// Position `0` is the most significant of the `n` low bits, so enumerating
/// `0..2^n` lists patterns in the same order as the cartesian product of
/// `{0, 1}` taken `n` times.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Mask {
	bits: u32,
	len: usize,
}

impl Mask {
	/// Whether position `i` is kept.
	pub fn is_set(&self, i: usize) -> bool {
		i < self.len && (self.bits >> (self.len - 1 - i)) & 1 == 1
	}

	pub fn positions(&self) -> Vec<bool> {
		(0..self.len).map(|i| self.is_set(i)).collect()
	}

	/// Number of kept positions.
	pub fn kept(&self) -> usize {
		self.bits.count_ones() as usize
	}

	/// Replaces masked-out positions of `ngram` with the unknown marker.
	pub fn apply<S: AsRef<str>>(&self, ngram: &[S]) -> Vec<String> {
		ngram
			.iter()
			.enumerate()
			.map(|(i, token)| if self.is_set(i) { token.as_ref().to_owned() } else { UNKNOWN_TOKEN.to_owned() })
			.collect()
	}
}

/// All `2^n` masks of length `n`, all-ones first.
pub(crate) fn all_masks(n: usize) -> Vec<Mask> {
	(0..1u32 << n).rev().map(|bits| Mask { bits, len: n }).collect()
}
