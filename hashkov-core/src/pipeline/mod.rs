//! Composable text pipeline.
//!
//! A `Pipeline` owns an ordered list of `Stage`s and runs each unit of text
//! through them in order. A stage may fan a unit out into several units;
//! every one of them then goes independently through the remaining stages
//! and the results are flattened into a single sequence, however many
//! fan-out stages are chained.

mod stage;

pub use stage::{ASCII_PUNCTUATION, Processed, Stage};

use std::num::NonZeroUsize;

use log::trace;

/// Word pairs: the tokenizer width used by the tweet pipeline.
const WORD_PAIRS: NonZeroUsize = NonZeroUsize::new(2).unwrap();

/// An ordered chain of stages.
///
/// Built once, then reused for every unit of text. An empty pipeline is the
/// identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pipeline {
	stages: Vec<Stage>,
}

impl Pipeline {
	/// Creates an empty pipeline.
	pub fn new() -> Self {
		Self { stages: Vec::new() }
	}

	/// Appends a stage, builder style.
	pub fn then(mut self, stage: Stage) -> Self {
		self.stages.push(stage);
		self
	}

	/// Appends a stage in place.
	pub fn push(&mut self, stage: Stage) {
		self.stages.push(stage);
	}

	/// The pipeline used for social media posts: strips URLs and mentions,
	/// normalizes whitespace and hashtags, then groups words by pairs.
	pub fn tweets() -> Self {
		Self::new()
			.then(Stage::Url)
			.then(Stage::Mention)
			.then(Stage::Whitespace)
			.then(Stage::Hashtag)
			.then(Stage::Tokenize(WORD_PAIRS))
	}

	pub fn stages(&self) -> &[Stage] {
		&self.stages
	}

	pub fn len(&self) -> usize {
		self.stages.len()
	}

	pub fn is_empty(&self) -> bool {
		self.stages.is_empty()
	}

	/// Runs one unit of text through every stage.
	///
	/// # Behavior
	/// - While no fan-out happened, the single unit is handed from stage to stage.
	/// - After a fan-out, each unit goes through the next stage on its own and
	///   the outputs are concatenated in order; the result stays a sequence.
	pub fn process(&self, unit: &str) -> Processed {
		let mut current = Processed::Unit(unit.to_owned());
		for stage in &self.stages {
			current = match current {
				Processed::Unit(unit) => stage.process(&unit),
				Processed::Units(units) => Processed::Units(
					units
						.iter()
						.flat_map(|unit| stage.process(unit).into_vec())
						.collect(),
				),
			};
			trace!("stage {} -> {:?}", stage.name(), current);
		}
		current
	}

	/// Runs one unit through the pipeline and returns the resulting token
	/// sequence, ready to be fed to a chain.
	pub fn tokens(&self, unit: &str) -> Vec<String> {
		self.process(unit).into_vec()
	}

	/// Like [`Pipeline::tokens`], but `None` when the unit yields nothing to
	/// train on (no token, or only empty ones).
	///
	/// Every training path goes through this, so a blank unit never records
	/// an empty successor under the sentinel.
	pub fn sample(&self, unit: &str) -> Option<Vec<String>> {
		let tokens = self.tokens(unit);
		if tokens.iter().all(String::is_empty) {
			None
		} else {
			Some(tokens)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_pipeline_is_identity() {
		let pipeline = Pipeline::new();
		assert_eq!(pipeline.process("  As is  "), Processed::Unit("  As is  ".to_owned()));
	}

	#[test]
	fn whitespace_then_punctuation() {
		let pipeline = Pipeline::new().then(Stage::Whitespace).then(Stage::punctuation());
		let result = pipeline.process("Text,  with...\n all kinds\tof\n\t  problems!!");
		assert_eq!(result, Processed::Unit("Text with all kinds of problems".to_owned()));
	}

	#[test]
	fn tokenizer_fans_out_through_remaining_stages() {
		let pipeline = Pipeline::new()
			.then(Stage::Whitespace)
			.then(Stage::tokenize(2).unwrap())
			.then(Stage::punctuation());
		let result = pipeline.process("Text,  that, is,\n gonna be split up... \t by a tokenizer!!");
		assert_eq!(
			result.into_vec(),
			vec!["Text that", "is gonna", "be split", "up by", "a tokenizer"]
		);
	}

	#[test]
	fn double_tokenization_flattens() {
		let pipeline = Pipeline::new()
			.then(Stage::Whitespace)
			.then(Stage::tokenize(4).unwrap())
			.then(Stage::punctuation())
			.then(Stage::tokenize(2).unwrap());
		let text = "Text,  that, is,\n gonna be split up... \t by a tokenizer!! extra word";
		assert_eq!(
			pipeline.tokens(text),
			vec!["Text that", "is gonna", "be split", "up by", "a tokenizer", "extra word"]
		);
	}

	#[test]
	fn mention_then_whitespace() {
		let pipeline = Pipeline::new().then(Stage::Mention).then(Stage::Whitespace);
		assert_eq!(
			pipeline.process("Hello @otheruser i'm mentioning you").as_unit(),
			Some("Hello i'm mentioning you")
		);
	}

	#[test]
	fn url_then_whitespace() {
		let pipeline = Pipeline::new().then(Stage::Url).then(Stage::Whitespace);
		let text = "text with http://www.twitter.com/ a few https://en.wikipedia.org/wiki/Twitter urls";
		assert_eq!(pipeline.process(text).as_unit(), Some("text with a few urls"));
	}

	#[test]
	fn tweet_pipeline() {
		let tokens = Pipeline::tweets().tokens("Loving #rust today @ferris https://rust-lang.org see");
		assert_eq!(tokens, vec!["Loving #_rust", "today see"]);
	}

	#[test]
	fn fan_out_of_nothing_stays_empty() {
		let pipeline = Pipeline::new().then(Stage::tokenize(3).unwrap()).then(Stage::Whitespace);
		assert_eq!(pipeline.process(" \n "), Processed::Units(vec![]));
		assert!(pipeline.tokens("").is_empty());
	}

	#[test]
	fn blank_units_are_not_samples() {
		let pipeline = Pipeline::new().then(Stage::Mention).then(Stage::Whitespace);
		assert_eq!(pipeline.sample("@only_a_mention"), None);
		assert_eq!(pipeline.sample("real post"), Some(vec!["real post".to_owned()]));
		assert_eq!(Pipeline::tweets().sample("   "), None);
	}
}
