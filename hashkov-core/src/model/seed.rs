use log::debug;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::chain::{MarkovChain, fold};

/// Prefix the hashtag stage puts in front of every tag name.
pub const HASHTAG_MARKER: &str = "#_";

/// Turns a hashtag (`"Rust"` or `"#Rust"`) into the substring it appears as
/// in trained keys (`"#_rust"`).
pub fn anchor_for(hashtag: &str) -> String {
	let folded = fold(hashtag);
	let bare = folded.strip_prefix('#').unwrap_or(&folded);
	format!("{HASHTAG_MARKER}{bare}")
}

/// Picks a random start key containing the anchor derived from `hashtag`.
///
/// Returns `None` when no key is eligible; callers decide whether to fall
/// back to the sentinel or to report it.
pub fn select_seed<'a, R: Rng + ?Sized>(chain: &'a MarkovChain, hashtag: &str, rng: &mut R) -> Option<&'a str> {
	let anchor = anchor_for(hashtag);
	let mut eligible: Vec<&str> = chain
		.get_possible_starts()
		.into_iter()
		.filter(|key| key.contains(&anchor))
		.collect();
	// Key order must not depend on the hash map for seeded runs to repeat.
	eligible.sort_unstable();
	debug!("{} eligible seeds for {}", eligible.len(), anchor);
	eligible.choose(rng).copied()
}
