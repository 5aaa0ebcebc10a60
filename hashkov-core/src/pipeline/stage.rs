use std::collections::HashSet;
use std::num::NonZeroUsize;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{HashkovError, Result};

/// The standard ASCII punctuation set, used by the punctuation stripper
/// and by the hashtag shape rule.
pub const ASCII_PUNCTUATION: &str = r##"!"#$%&'()*+,-./:;<=>?@[\]^_`{|}~"##;

lazy_static! {
	static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();

	static ref MENTION: Regex = Regex::new(r"@\w+").unwrap();

	/// John Gruber's "improved liberal, accurate regex pattern for matching URLs".
	static ref URL: Regex = Regex::new(
		r#"(?i)\b((?:[a-z][\w-]+:(?:/{1,3}|[a-z0-9%])|www\d{0,3}[.]|[a-z0-9.\-]+[.][a-z]{2,4}/)(?:[^\s()<>]+|\(([^\s()<>]+|(\([^\s()<>]+\)))*\))+(?:\(([^\s()<>]+|(\([^\s()<>]+\)))*\)|[^\s`!()\[\]{};:'".,<>?«»“”‘’]))"#
	).unwrap();

	/// A `#` anchored on whitespace or start of text, followed by a tag that
	/// starts with anything but punctuation, a digit or whitespace, or by an
	/// underscore and a word character.
	static ref HASHTAG: Regex = Regex::new(&format!(
		r"(\s+|^)#(([^{}0-9\s][_\w]*)|(_\w+))",
		regex::escape(ASCII_PUNCTUATION)
	)).unwrap();
}

/// Result of running one unit of text through a stage or a pipeline.
///
/// A stage either rewrites the unit (`Unit`) or fans it out into several
/// units (`Units`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Processed {
	Unit(String),
	Units(Vec<String>),
}

impl Processed {
	/// Flattens the result into a sequence; a single unit becomes a
	/// one-element sequence.
	pub fn into_vec(self) -> Vec<String> {
		match self {
			Processed::Unit(unit) => vec![unit],
			Processed::Units(units) => units,
		}
	}

	/// Returns the unit if no fan-out happened.
	pub fn as_unit(&self) -> Option<&str> {
		match self {
			Processed::Unit(unit) => Some(unit),
			Processed::Units(_) => None,
		}
	}
}

/// A single text transformation.
///
/// The set of stages is closed: every variant carries only its own
/// configuration and is immutable once built.
///
/// # Variants
/// - `Whitespace`: collapses runs of whitespace into a single space.
/// - `Punctuation`: deletes every character of the set.
/// - `Mention`: removes `@name` mentions.
/// - `Url`: removes URLs, leaving the surrounding whitespace.
/// - `Hashtag`: rewrites `#tag` into `#_tag`.
/// - `Replace`: substitutes every occurrence of `from` with `to`.
/// - `Tokenize`: splits into chunks of `width` words (fan-out).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
	Whitespace,
	Punctuation(HashSet<char>),
	Mention,
	Url,
	Hashtag,
	Replace { from: String, to: String },
	Tokenize(NonZeroUsize),
}

impl Stage {
	/// Punctuation stripper over the standard ASCII punctuation set.
	pub fn punctuation() -> Self {
		Self::punctuation_from(ASCII_PUNCTUATION)
	}

	/// Punctuation stripper over a custom set of characters.
	pub fn punctuation_from(chars: &str) -> Self {
		Stage::Punctuation(chars.chars().collect())
	}

	/// Generic replacer.
	///
	/// # Errors
	/// Returns an error if `from` is empty.
	pub fn replace(from: &str, to: &str) -> Result<Self> {
		if from.is_empty() {
			return Err(HashkovError::InvalidStage("replace source must not be empty".to_owned()));
		}
		Ok(Stage::Replace { from: from.to_owned(), to: to.to_owned() })
	}

	/// N-gram tokenizer grouping `width` words per token.
	///
	/// # Errors
	/// Returns an error if `width` is 0.
	pub fn tokenize(width: usize) -> Result<Self> {
		NonZeroUsize::new(width)
			.map(Stage::Tokenize)
			.ok_or_else(|| HashkovError::InvalidStage("tokenizer width must be >= 1".to_owned()))
	}

	/// Short stable name, used in logs and configuration.
	pub fn name(&self) -> &'static str {
		match self {
			Stage::Whitespace => "whitespace",
			Stage::Punctuation(_) => "punctuation",
			Stage::Mention => "mention",
			Stage::Url => "url",
			Stage::Hashtag => "hashtag",
			Stage::Replace { .. } => "replace",
			Stage::Tokenize(_) => "tokenize",
		}
	}

	/// Runs the stage on one unit of text.
	///
	/// Never fails on text input: a stage that finds nothing to do returns
	/// the unit unchanged.
	pub fn process(&self, unit: &str) -> Processed {
		match self {
			Stage::Whitespace => Processed::Unit(WHITESPACE.replace_all(unit, " ").into_owned()),
			Stage::Punctuation(set) => {
				Processed::Unit(unit.chars().filter(|c| !set.contains(c)).collect())
			}
			Stage::Mention => Processed::Unit(MENTION.replace_all(unit, "").into_owned()),
			Stage::Url => Processed::Unit(URL.replace_all(unit, "").into_owned()),
			Stage::Hashtag => Processed::Unit(HASHTAG.replace_all(unit, "${1}#_${2}").into_owned()),
			Stage::Replace { from, to } => Processed::Unit(unit.replace(from.as_str(), to)),
			Stage::Tokenize(width) => {
				let words: Vec<&str> = unit.split_whitespace().collect();
				Processed::Units(words.chunks(width.get()).map(|chunk| chunk.join(" ")).collect())
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn unit(stage: &Stage, text: &str) -> String {
		match stage.process(text) {
			Processed::Unit(u) => u,
			Processed::Units(units) => panic!("unexpected fan-out: {units:?}"),
		}
	}

	#[test]
	fn whitespace_collapses_runs() {
		assert_eq!(unit(&Stage::Whitespace, "a \t\n b\n\nc"), "a b c");
		assert_eq!(unit(&Stage::Whitespace, "plain"), "plain");
	}

	#[test]
	fn punctuation_default_set() {
		assert_eq!(unit(&Stage::punctuation(), "Hey, you... what?! #tag @me"), "Hey you what tag me");
	}

	#[test]
	fn punctuation_custom_set() {
		let stage = Stage::punctuation_from(",!");
		assert_eq!(unit(&stage, "Hey, you... what?!"), "Hey you... what?");
	}

	#[test]
	fn mention_is_removed_with_its_at_sign() {
		assert_eq!(
			unit(&Stage::Mention, "Hello @otheruser i'm mentioning you"),
			"Hello  i'm mentioning you"
		);
		assert_eq!(unit(&Stage::Mention, "mail me @ home"), "mail me @ home");
	}

	#[test]
	fn url_is_removed_and_whitespace_left() {
		let text = "text with http://www.twitter.com/ a few https://en.wikipedia.org/wiki/Twitter urls";
		assert_eq!(unit(&Stage::Url, text), "text with  a few  urls");
	}

	#[test]
	fn url_without_scheme() {
		assert_eq!(unit(&Stage::Url, "see www.example.com now"), "see  now");
		assert_eq!(unit(&Stage::Url, "see example.com/page now"), "see  now");
	}

	#[test]
	fn hashtag_rewrites_valid_tags() {
		let text = "#Text #with #hashtags we don't #_want #pony2012";
		let expected = "#_Text #_with #_hashtags we don't #__want #_pony2012";
		assert_eq!(unit(&Stage::Hashtag, text), expected);
	}

	#[test]
	fn hashtag_leaves_non_tags_untouched() {
		let text = "We are # 1 #$notAHashtag #!orThis #123 #123abc middle#hash";
		assert_eq!(unit(&Stage::Hashtag, text), text);
	}

	#[test]
	fn replace_substitutes_every_occurrence() {
		let stage = Stage::replace("&amp;", "&").unwrap();
		assert_eq!(unit(&stage, "salt &amp; pepper &amp; oil"), "salt & pepper & oil");
	}

	#[test]
	fn replace_rejects_empty_source() {
		assert!(matches!(Stage::replace("", "x"), Err(HashkovError::InvalidStage(_))));
	}

	#[test]
	fn tokenize_groups_words() {
		let stage = Stage::tokenize(2).unwrap();
		assert_eq!(
			stage.process("one two three four five"),
			Processed::Units(vec!["one two".into(), "three four".into(), "five".into()])
		);
		assert_eq!(stage.process("   "), Processed::Units(vec![]));
	}

	#[test]
	fn tokenize_rejects_zero_width() {
		assert!(Stage::tokenize(0).is_err());
	}
}
