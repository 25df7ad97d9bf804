//! Exploratory corpus statistics.
//!
//! Consumes the same raw sentences as the model but tokenizes them on its own
//! (words, numbers and punctuation split apart, lowercased). Nothing here
//! feeds the probability model.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::freq_dist::{FreqDist, count_windows};

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"\p{L}+(?:['’]\p{L}+)*|\p{N}+(?:[.,]\p{N}+)*|[^\s\p{L}\p{N}]").expect("valid word pattern")
});

const ENGLISH_STOPWORDS: &[&str] = &[
	"a", "about", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be", "because", "been", "but",
	"by", "can", "could", "did", "do", "does", "for", "from", "had", "has", "have", "he", "her", "his", "how",
	"i", "if", "in", "into", "is", "it", "its", "me", "my", "no", "not", "of", "on", "or", "our", "she", "so",
	"than", "that", "the", "their", "them", "then", "there", "these", "they", "this", "to", "up", "was", "we",
	"were", "what", "when", "which", "who", "will", "with", "would", "you", "your",
];

/// Splits text into lowercased words, numbers and single punctuation marks.
pub fn word_tokenize(text: &str) -> Vec<String> {
	WORD_RE.find_iter(text).map(|m| m.as_str().to_lowercase()).collect()
}

/// A set of words ignored by `most_common_ngrams`.
///
/// Passed explicitly so different analyses can use different lists.
#[derive(Clone, Debug, Default)]
pub struct StopWords {
	words: HashSet<String>,
}

impl StopWords {
	pub fn new<I, S>(words: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		Self { words: words.into_iter().map(|w| w.as_ref().to_lowercase()).collect() }
	}

	/// A short list of common English function words.
	pub fn english() -> Self {
		Self::new(ENGLISH_STOPWORDS)
	}

	pub fn contains(&self, word: &str) -> bool {
		self.words.contains(word)
	}

	/// Stopwords and punctuation-only tokens.
	pub fn is_noise(&self, token: &str) -> bool {
		self.contains(token) || !token.chars().any(char::is_alphanumeric)
	}
}

/// Most frequent `k`-grams of words across `sentences`, stopwords removed.
///
/// Windows never cross a sentence boundary. Ties are ordered by n-gram.
pub fn most_common_ngrams<S: AsRef<str>>(
	sentences: &[S],
	k: usize,
	stopwords: &StopWords,
	limit: usize,
) -> Vec<(Vec<String>, usize)> {
	let mut counts = FreqDist::new();
	for sentence in sentences {
		let words: Vec<String> = word_tokenize(sentence.as_ref())
			.into_iter()
			.filter(|token| !stopwords.is_noise(token))
			.collect();
		if k > 0 {
			counts.merge(&count_windows(&words, k));
		}
	}
	counts.most_common(limit)
}
