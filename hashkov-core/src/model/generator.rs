use std::path::Path;

use log::{debug, info, warn};
use rand::Rng;

use super::chain::MarkovChain;
use super::composer::compose;
use super::generation_input::{GenerationInput, StartSeed};
use super::seed::select_seed;
use crate::error::{HashkovError, Result};
use crate::io::read_file;
use crate::pipeline::Pipeline;

/// High-level generator tying a pipeline to a chain.
///
/// # Responsibilities
/// - Turn raw units of text into token samples and train the chain with them
/// - Resolve the start seed of a generation
/// - Sample the chain and compose a message within the character budget
///
/// The chain is not synchronized: callers sharing a generator between
/// threads wrap it in a lock.
#[derive(Debug, Clone)]
pub struct Generator {
	pipeline: Pipeline,
	chain: MarkovChain,
}

impl Default for Generator {
	/// A generator over an empty chain using [`Pipeline::tweets`].
	fn default() -> Self {
		Self::new(Pipeline::tweets())
	}
}

impl Generator {
	/// Creates a generator with an empty chain.
	pub fn new(pipeline: Pipeline) -> Self {
		Self::with_chain(pipeline, MarkovChain::new())
	}

	/// Creates a generator around an existing chain, e.g. one loaded from disk.
	pub fn with_chain(pipeline: Pipeline, chain: MarkovChain) -> Self {
		Self { pipeline, chain }
	}

	pub fn pipeline(&self) -> &Pipeline {
		&self.pipeline
	}

	pub fn chain(&self) -> &MarkovChain {
		&self.chain
	}

	pub fn chain_mut(&mut self) -> &mut MarkovChain {
		&mut self.chain
	}

	/// Replaces the chain, keeping the pipeline.
	pub fn set_chain(&mut self, chain: MarkovChain) {
		self.chain = chain;
	}

	/// Creates a `GenerationInput` with default values.
	pub fn make_generation_input(&self) -> GenerationInput {
		GenerationInput::default()
	}

	/// Runs every unit through the pipeline and trains the chain with the
	/// resulting token sequences.
	///
	/// Units that produce no token are skipped.
	///
	/// # Returns
	/// The number of samples actually trained.
	pub fn train<I, S>(&mut self, units: I) -> usize
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut trained = 0;
		for unit in units {
			let Some(tokens) = self.pipeline.sample(unit.as_ref()) else {
				warn!("skipping unit without tokens: {:?}", unit.as_ref());
				continue;
			};
			self.chain.train_sample(&tokens);
			trained += 1;
		}
		debug!("trained {} samples, chain has {} states", trained, self.chain.len());
		trained
	}

	/// Trains on a text file, one unit per line; blank lines are ignored.
	pub fn train_file<P: AsRef<Path>>(&mut self, filepath: P) -> Result<usize> {
		let units = read_file(&filepath)?;
		let trained = self.train(&units);
		info!("trained {} of {} lines from {}", trained, units.len(), filepath.as_ref().display());
		Ok(trained)
	}

	/// Generates one message.
	///
	/// # Returns
	/// - `Ok(String)`: the composed message, possibly empty.
	/// - `Err(NoEligibleSeed)`: a hashtag seed was asked for and no trained
	///   token contains it.
	pub fn generate<R: Rng + ?Sized>(&self, input: &GenerationInput, rng: &mut R) -> Result<String> {
		let start = match &input.start_seed {
			StartSeed::Sentinel => None,
			StartSeed::Custom(token) => Some(token.as_str()),
			StartSeed::Hashtag(hashtag) => Some(
				select_seed(&self.chain, hashtag, rng)
					.ok_or_else(|| HashkovError::NoEligibleSeed(hashtag.clone()))?,
			),
		};

		let tokens = self.chain.sample(input.length, start, rng);
		Ok(compose(&tokens, input.budget))
	}
}
