use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::ops::Range;
use std::sync::mpsc;
use std::thread;

/// Streams with at least this many windows are counted on several threads.
pub const PARALLEL_THRESHOLD: usize = 50_000;

/// A count-by-key map where absent keys count as zero.
///
/// # Invariants
/// - Every stored count is strictly positive
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FreqDist<K: Eq + Hash> {
	counts: HashMap<K, usize>,
}

impl<K: Eq + Hash> Default for FreqDist<K> {
	fn default() -> Self {
		Self { counts: HashMap::new() }
	}
}

impl<K: Eq + Hash> FreqDist<K> {
	/// Creates an empty distribution.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records one occurrence of `key`.
	pub fn increment(&mut self, key: K) {
		self.add(key, 1);
	}

	/// Records `occurrence` occurrences of `key`. Adding zero is a no-op.
	pub fn add(&mut self, key: K, occurrence: usize) {
		if occurrence == 0 {
			return;
		}
		*self.counts.entry(key).or_insert(0) += occurrence;
	}

	/// Returns the count of `key`, `0` when it was never seen.
	pub fn get<Q>(&self, key: &Q) -> usize
	where
		K: Borrow<Q>,
		Q: Eq + Hash + ?Sized,
	{
		self.counts.get(key).copied().unwrap_or(0)
	}

	pub fn contains<Q>(&self, key: &Q) -> bool
	where
		K: Borrow<Q>,
		Q: Eq + Hash + ?Sized,
	{
		self.counts.contains_key(key)
	}

	/// Number of distinct keys.
	pub fn len(&self) -> usize {
		self.counts.len()
	}

	pub fn is_empty(&self) -> bool {
		self.counts.is_empty()
	}

	/// Sum of all counts.
	pub fn total(&self) -> usize {
		self.counts.values().sum()
	}

	pub fn keys(&self) -> impl Iterator<Item = &K> {
		self.counts.keys()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&K, usize)> {
		self.counts.iter().map(|(key, count)| (key, *count))
	}

	/// Merges another distribution into this one, summing counts.
	///
	/// Used to combine partial counts built on separate threads.
	pub fn merge(&mut self, other: &Self)
	where
		K: Clone,
	{
		for (key, occurrence) in &other.counts {
			*self.counts.entry(key.clone()).or_insert(0) += *occurrence;
		}
	}

	/// Returns up to `limit` entries, most frequent first.
	///
	/// Ties are ordered by key so the result is reproducible.
	pub fn most_common(&self, limit: usize) -> Vec<(K, usize)>
	where
		K: Ord + Clone,
	{
		let mut entries: Vec<(K, usize)> = self.counts.iter().map(|(k, c)| (k.clone(), *c)).collect();
		entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
		entries.truncate(limit);
		entries
	}
}

impl<K: Eq + Hash> FromIterator<K> for FreqDist<K> {
	fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
		let mut dist = Self::new();
		for key in iter {
			dist.increment(key);
		}
		dist
	}
}

/// Counts the windows of length `k` starting at positions in `starts`.
fn count_range(tokens: &[String], k: usize, starts: Range<usize>) -> FreqDist<Vec<String>> {
	let mut dist = FreqDist::new();
	for i in starts {
		dist.increment(tokens[i..i + k].to_vec());
	}
	dist
}

/// Counts every contiguous window of length `k` in `tokens` (sliding by one).
///
/// - `k == 0` yields the empty window once per position, i.e. a single key
///   `[]` counted `tokens.len()` times. It is the context of a unigram.
/// - `k > tokens.len()` yields an empty distribution.
///
/// Long streams are split into `num_cpus` chunks counted on scoped threads
/// and merged; the result does not depend on the split.
pub fn count_windows(tokens: &[String], k: usize) -> FreqDist<Vec<String>> {
	if k == 0 {
		let mut dist = FreqDist::new();
		dist.add(Vec::new(), tokens.len());
		return dist;
	}
	if tokens.len() < k {
		return FreqDist::new();
	}

	let windows = tokens.len() - k + 1;
	if windows < PARALLEL_THRESHOLD {
		return count_range(tokens, k, 0..windows);
	}

	let chunks = num_cpus::get().max(1);
	let chunk_size = windows.div_ceil(chunks);
	log::debug!("counting {windows} windows of length {k} in {chunks} chunks");

	let (tx, rx) = mpsc::channel();
	thread::scope(|scope| {
		for start in (0..windows).step_by(chunk_size) {
			let tx = tx.clone();
			let end = (start + chunk_size).min(windows);
			scope.spawn(move || {
				// The receiver lives past the scope
				let _ = tx.send(count_range(tokens, k, start..end));
			});
		}
	});
	drop(tx);

	let mut dist = FreqDist::new();
	for partial in rx.iter() {
		dist.merge(&partial);
	}
	dist
}
