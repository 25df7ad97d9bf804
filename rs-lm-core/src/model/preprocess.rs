use super::freq_dist::FreqDist;

/// Start-of-sentence marker, repeated `n-1` times (once for unigrams).
pub const START_TOKEN: &str = "<s>";

/// End-of-sentence marker, appended once.
pub const END_TOKEN: &str = "</s>";

/// Replaces tokens seen exactly once in the training stream.
pub const UNKNOWN_TOKEN: &str = "<UNK>";

/// Returns `true` for the three reserved markers.
pub fn is_marker(token: &str) -> bool {
	token == START_TOKEN || token == END_TOKEN || token == UNKNOWN_TOKEN
}

/// Number of start markers a sentence receives for a model of order `order`.
pub fn padding(order: usize) -> usize {
	order.saturating_sub(1).max(1)
}

/// Wraps a raw sentence with its start and end markers.
///
/// Example (`order = 3`): `"the cat"` → `"<s> <s> the cat </s>"`
pub fn wrap_sentence(sentence: &str, order: usize) -> String {
	let mut wrapped = String::with_capacity(sentence.len() + 16);
	for _ in 0..padding(order) {
		wrapped.push_str(START_TOKEN);
		wrapped.push(' ');
	}
	wrapped.push_str(sentence);
	wrapped.push(' ');
	wrapped.push_str(END_TOKEN);
	wrapped
}

/// Wraps every sentence and splits the joined text on whitespace.
///
/// No token is replaced; used to score text against an existing vocabulary.
pub fn tokenize<S: AsRef<str>>(sentences: &[S], order: usize) -> Vec<String> {
	sentences
		.iter()
		.map(|sentence| wrap_sentence(sentence.as_ref(), order))
		.collect::<Vec<_>>()
		.join(" ")
		.split_whitespace()
		.map(str::to_owned)
		.collect()
}

/// Replaces every token occurring exactly once with `UNKNOWN_TOKEN`.
///
/// Reserved markers are never replaced, so a corpus made of one sentence
/// still keeps its boundaries.
pub fn collapse_singletons(tokens: Vec<String>) -> Vec<String> {
	let counts: FreqDist<String> = tokens.iter().cloned().collect();
	tokens
		.into_iter()
		.map(|token| {
			if counts.get(&token) == 1 && !is_marker(&token) {
				UNKNOWN_TOKEN.to_owned()
			} else {
				token
			}
		})
		.collect()
}

/// Turns raw sentences into the flat token stream a model is trained on.
///
/// - Wraps each sentence (`n-1` start markers, or 1 when `n == 1`, then one end marker)
/// - Joins and splits on whitespace
/// - Collapses singletons into `UNKNOWN_TOKEN`
///
/// Zero sentences yield zero tokens.
pub fn preprocess<S: AsRef<str>>(sentences: &[S], order: usize) -> Vec<String> {
	collapse_singletons(tokenize(sentences, order))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn strings(tokens: &[&str]) -> Vec<String> {
		tokens.iter().map(|t| t.to_string()).collect()
	}

	#[test]
	fn test_wrap_sentence_padding() {
		assert_eq!(wrap_sentence("a b", 1), "<s> a b </s>");
		assert_eq!(wrap_sentence("a b", 2), "<s> a b </s>");
		assert_eq!(wrap_sentence("a b", 4), "<s> <s> <s> a b </s>");
	}

	#[test]
	fn test_preprocess_collapses_singletons() {
		let tokens = preprocess(&["the cat sat", "the dog sat"], 2);
		assert_eq!(
			tokens,
			strings(&["<s>", "the", "<UNK>", "sat", "</s>", "<s>", "the", "<UNK>", "sat", "</s>"])
		);
	}

	#[test]
	fn test_markers_survive_single_sentence() {
		let tokens = preprocess(&["hello world"], 3);
		assert_eq!(tokens, strings(&["<s>", "<s>", "<UNK>", "<UNK>", "</s>"]));
	}

	#[test]
	fn test_extra_whitespace_is_ignored() {
		let tokens = tokenize(&["  a\tb  ", "a b"], 2);
		assert_eq!(tokens, strings(&["<s>", "a", "b", "</s>", "<s>", "a", "b", "</s>"]));
	}

	#[test]
	fn test_empty_input_yields_no_tokens() {
		let empty: [&str; 0] = [];
		assert!(preprocess(&empty, 3).is_empty());
	}

	#[test]
	fn test_preprocess_is_repeatable() {
		let corpus = ["a b c", "a c", "b b d"];
		assert_eq!(preprocess(&corpus, 3), preprocess(&corpus, 3));
	}

	#[test]
	fn test_non_marker_tokens_occur_twice() {
		let tokens = preprocess(&["x y z y", "z w q", "x"], 2);
		let counts: FreqDist<String> = tokens.iter().cloned().collect();
		for (token, count) in counts.iter() {
			if !is_marker(token) {
				assert!(count >= 2, "{token} occurs {count} time(s)");
			}
		}
	}
}
