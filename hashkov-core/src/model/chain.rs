use std::collections::{HashMap, HashSet};

use log::debug;
use rand::Rng;
use rand::seq::IndexedRandom;

/// Key of the state every sample starts from.
pub const SENTINEL: &str = "";

/// Folds a token into the key it is stored under.
pub(crate) fn fold(token: &str) -> String {
	token.to_lowercase()
}

/// A first-order Markov chain over tokens.
///
/// The chain maps a state key (a lowercased token, or [`SENTINEL`]) to the
/// ordered list of tokens observed right after it, in their original case.
///
/// # Invariants
/// - Duplicates in a successor list are kept: they are the transition weights.
/// - Every first token of a trained sample is listed under [`SENTINEL`].
/// - Lookups always fold the token; stored successors are never folded.
/// - Training only appends, nothing is ever removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkovChain {
	memory: HashMap<String, Vec<String>>,
}

impl MarkovChain {
	/// Creates an empty chain.
	pub fn new() -> Self {
		Self { memory: HashMap::new() }
	}

	/// Wraps an existing transition table, e.g. one restored by a caller.
	pub fn from_memory(memory: HashMap<String, Vec<String>>) -> Self {
		Self { memory }
	}

	/// The raw transition table.
	pub fn memory(&self) -> &HashMap<String, Vec<String>> {
		&self.memory
	}

	pub fn into_memory(self) -> HashMap<String, Vec<String>> {
		self.memory
	}

	/// Number of states with at least one recorded successor.
	pub fn len(&self) -> usize {
		self.memory.len()
	}

	pub fn is_empty(&self) -> bool {
		self.memory.is_empty()
	}

	/// Successors recorded for `token`, looked up case-insensitively.
	pub fn successors(&self, token: &str) -> Option<&[String]> {
		self.memory.get(&fold(token)).map(Vec::as_slice)
	}

	/// Trains the chain with a list of samples, each one a sequence of tokens.
	///
	/// Training is cumulative: previous transitions are kept and new ones are
	/// appended in order.
	pub fn train<I, S, T>(&mut self, samples: I)
	where
		I: IntoIterator<Item = S>,
		S: IntoIterator<Item = T>,
		T: AsRef<str>,
	{
		let mut count = 0usize;
		for sample in samples {
			self.train_sample(sample);
			count += 1;
		}
		debug!("trained {} samples, {} states", count, self.memory.len());
	}

	/// Trains the chain with a single sample.
	///
	/// An empty sample records nothing.
	pub fn train_sample<S, T>(&mut self, sample: S)
	where
		S: IntoIterator<Item = T>,
		T: AsRef<str>,
	{
		let mut key = SENTINEL.to_owned();
		for token in sample {
			let token = token.as_ref();
			self.memory.entry(key).or_default().push(token.to_owned());
			key = fold(token);
		}
	}

	/// Samples the chain.
	///
	/// # Parameters
	/// - `length`: maximum number of tokens drawn after the start.
	/// - `start`: token to start from, kept verbatim as the first element of
	///   the result. `None` starts from [`SENTINEL`], which is not emitted.
	/// - `rng`: random source used for each draw.
	///
	/// # Returns
	/// The walk, stopped early when the current token has no successor.
	/// Each draw is uniform over the successor list, so repeated successors
	/// are proportionally more likely.
	pub fn sample<R: Rng + ?Sized>(&self, length: usize, start: Option<&str>, rng: &mut R) -> Vec<String> {
		let mut sequence = Vec::new();
		let mut current = match start {
			Some(token) => {
				sequence.push(token.to_owned());
				token.to_owned()
			}
			None => SENTINEL.to_owned(),
		};

		let mut remaining = length;
		while remaining > 0 {
			let Some(next) = self.successors(&current).and_then(|successors| successors.choose(rng)) else {
				// Chain's over
				break;
			};
			sequence.push(next.clone());
			current = next.clone();
			remaining -= 1;
		}

		debug!("sampled {} tokens out of {} requested", length - remaining, length);
		sequence
	}

	/// The keys a walk can currently start from: every folded token with at
	/// least one successor, plus [`SENTINEL`] once anything was trained.
	pub fn get_possible_starts(&self) -> HashSet<&str> {
		self.memory.keys().map(String::as_str).collect()
	}

	/// Appends every successor list of `other` after the matching list of
	/// this chain.
	///
	/// Merging the chain trained on corpus B into the chain trained on corpus
	/// A gives the chain trained on A then B.
	pub fn merge(&mut self, other: &Self) {
		for (key, successors) in &other.memory {
			self.memory
				.entry(key.clone())
				.or_default()
				.extend(successors.iter().cloned());
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn memory(entries: &[(&str, &[&str])]) -> HashMap<String, Vec<String>> {
		entries
			.iter()
			.map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
			.collect()
	}

	#[test]
	fn memory_is_populated_in_order() {
		let mut chain = MarkovChain::new();
		chain.train([["a", "b", "c"]]);
		assert_eq!(chain.memory(), &memory(&[("", &["a"]), ("a", &["b"]), ("b", &["c"])]));

		chain.train([["a", "a", "c", "d", "b"]]);
		assert_eq!(
			chain.memory(),
			&memory(&[
				("", &["a", "a"]),
				("a", &["b", "a", "c"]),
				("b", &["c"]),
				("c", &["d"]),
				("d", &["b"]),
			])
		);
	}

	#[test]
	fn keys_are_folded_and_successors_keep_case() {
		let mut chain = MarkovChain::new();
		chain.train([vec!["Hello", "World"], vec!["HELLO", "there"]]);
		assert_eq!(
			chain.memory(),
			&memory(&[("", &["Hello", "HELLO"]), ("hello", &["World", "there"])])
		);
		assert_eq!(chain.successors("hElLo").map(<[String]>::len), Some(2));
	}

	#[test]
	fn sentinel_counts_samples() {
		let mut chain = MarkovChain::new();
		let samples = vec![vec!["x", "y"], vec!["y"], vec![], vec!["z", "x", "y"]];
		chain.train(samples);
		assert_eq!(chain.successors(SENTINEL).unwrap().len(), 3);
		let starts = chain.get_possible_starts();
		assert_eq!(starts, HashSet::from(["", "x", "z"]));
	}

	#[test]
	fn single_path_sampling_stops_at_the_end() {
		let mut chain = MarkovChain::new();
		chain.train([["a", "b", "c"]]);
		let mut rng = StdRng::seed_from_u64(7);
		assert_eq!(chain.sample(3, None, &mut rng), vec!["a", "b", "c"]);
		assert_eq!(chain.sample(100, None, &mut rng), vec!["a", "b", "c"]);
		assert_eq!(chain.sample(2, None, &mut rng), vec!["a", "b"]);
		assert!(chain.sample(0, None, &mut rng).is_empty());
	}

	#[test]
	fn huge_lengths_are_bounded_by_the_table() {
		let mut chain = MarkovChain::new();
		chain.train([["a", "b", "c"]]);
		let mut rng = StdRng::seed_from_u64(3);
		assert_eq!(chain.sample(usize::MAX, None, &mut rng), vec!["a", "b", "c"]);
		assert_eq!(chain.sample(1usize << 60, None, &mut rng), vec!["a", "b", "c"]);
		assert_eq!(chain.sample(usize::MAX, Some("B"), &mut rng), vec!["B", "c"]);
	}

	#[test]
	fn sampling_from_a_start_token_keeps_it_verbatim() {
		let mut chain = MarkovChain::new();
		chain.train([["Rust", "is", "fun"]]);
		let mut rng = StdRng::seed_from_u64(1);
		assert_eq!(chain.sample(5, Some("RUST"), &mut rng), vec!["RUST", "is", "fun"]);
		assert_eq!(chain.sample(5, Some("unknown"), &mut rng), vec!["unknown"]);
	}

	#[test]
	fn sampling_only_follows_recorded_transitions() {
		let mut chain = MarkovChain::new();
		chain.train([
			vec!["the", "cat", "sat", "on", "the", "mat"],
			vec!["the", "dog", "sat", "on", "the", "cat"],
		]);
		let mut rng = StdRng::seed_from_u64(42);
		for _ in 0..50 {
			let walk = chain.sample(10, None, &mut rng);
			assert!(!walk.is_empty() && walk.len() <= 10);
			assert_eq!(walk[0], "the");
			for pair in walk.windows(2) {
				assert!(chain.successors(&pair[0]).unwrap().contains(&pair[1]));
			}
		}
	}

	#[test]
	fn merge_matches_sequential_training() {
		let first = vec![vec!["a", "b"], vec!["b", "a"]];
		let second = vec![vec!["a", "c"], vec!["B", "d"]];

		let mut sequential = MarkovChain::new();
		sequential.train(first.clone());
		sequential.train(second.clone());

		let mut merged = MarkovChain::new();
		merged.train(first);
		let mut other = MarkovChain::new();
		other.train(second);
		merged.merge(&other);

		assert_eq!(merged, sequential);
	}
}
