use std::path::{Path, PathBuf};
use std::thread;

use log::info;

use super::chain::MarkovChain;
use crate::error::Result;
use crate::io::{build_output_path, list_files, read_file};
use crate::pipeline::Pipeline;

/// Extension of raw corpus files, one unit of text per line.
pub const CORPUS_EXTENSION: &str = "dat";

/// Extension of the chain cached next to a corpus.
pub const CACHE_EXTENSION: &str = "bin";

/// Path of the corpus called `name` in `dir`.
pub fn corpus_path<P: AsRef<Path>>(dir: P, name: &str) -> PathBuf {
	dir.as_ref().join(format!("{name}.{CORPUS_EXTENSION}"))
}

/// Names of the corpora found in `dir`, sorted.
pub fn list_corpora<P: AsRef<Path>>(dir: P) -> Result<Vec<String>> {
	Ok(list_files(dir, CORPUS_EXTENSION)?)
}

impl MarkovChain {
	/// Loads a chain for a corpus file if a binary exists next to it,
	/// otherwise builds it from the raw file and writes the binary.
	///
	/// - `filepath` is the corpus: one unit of text per line.
	/// - The binary is `<stem>.bin` in the same folder.
	///
	/// # Notes
	/// The binary does not record the pipeline it was built with; delete it
	/// after changing the pipeline.
	pub fn from_corpus<P: AsRef<Path>>(filepath: P, pipeline: &Pipeline) -> Result<Self> {
		let binary_data_path = build_output_path(&filepath, CACHE_EXTENSION)?;
		if binary_data_path.exists() {
			info!("using cached chain {}", binary_data_path.display());
			return Self::load(binary_data_path);
		}

		let lines = read_file(&filepath)?;
		info!("training on {} lines from {}", lines.len(), filepath.as_ref().display());
		let chain = Self::train_parallel(&lines, pipeline);
		chain.save(&binary_data_path)?;
		Ok(chain)
	}

	/// Runs every line through the pipeline and trains a chain, in parallel.
	///
	/// # Behavior
	/// - Splits the lines into chunks (CPU cores * factor).
	/// - Each chunk is piped and trained into a partial chain on its own thread.
	/// - Lines without tokens are skipped, as in [`crate::Generator::train`].
	/// - Partial chains are merged in chunk order, so the result is the same as
	///   training the lines one after the other.
	pub fn train_parallel(lines: &[String], pipeline: &Pipeline) -> Self {
		if lines.is_empty() {
			return Self::new();
		}

		let cpus = num_cpus::get();
		let factor = 8;
		let chunks = cpus * factor;
		let chunk_size = lines.len().div_ceil(chunks);

		thread::scope(|scope| {
			let handles: Vec<_> = lines
				.chunks(chunk_size)
				.map(|chunk| {
					scope.spawn(move || {
						let mut partial_chain = MarkovChain::new();
						partial_chain.train(chunk.iter().filter_map(|line| pipeline.sample(line)));
						partial_chain
					})
				})
				.collect();

			let mut final_chain = MarkovChain::new();
			for handle in handles {
				match handle.join() {
					Ok(partial_chain) => final_chain.merge(&partial_chain),
					Err(panic) => std::panic::resume_unwind(panic),
				}
			}
			final_chain
		})
	}
}
