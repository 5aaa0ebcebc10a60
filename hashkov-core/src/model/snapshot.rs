use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::info;
use serde::Serialize;

use super::chain::MarkovChain;
use crate::error::{HashkovError, Result};

/// Version tag written in front of every encoded chain.
pub const FORMAT_VERSION: u32 = 1;

/// Extension of named snapshots. Distinct from the corpus cache extension,
/// so saving a snapshot never replaces the cache of a corpus.
pub const SNAPSHOT_EXTENSION: &str = "chain";

/// Path of the snapshot called `name` in `dir`.
pub fn snapshot_path<P: AsRef<Path>>(dir: P, name: &str) -> PathBuf {
	dir.as_ref().join(format!("{name}.{SNAPSHOT_EXTENSION}"))
}

/// On-disk layout: the version tag followed by the plain transition table.
#[derive(Serialize)]
struct Snapshot<'a> {
	version: u32,
	memory: &'a HashMap<String, Vec<String>>,
}

impl MarkovChain {
	/// Encodes the chain with `postcard`.
	pub fn encode(&self) -> Result<Vec<u8>> {
		let snapshot = Snapshot { version: FORMAT_VERSION, memory: self.memory() };
		Ok(postcard::to_stdvec(&snapshot)?)
	}

	/// Decodes a chain previously produced by [`MarkovChain::encode`].
	///
	/// # Errors
	/// - `UnsupportedVersion` if the tag is not [`FORMAT_VERSION`].
	/// - `Codec` if the bytes are not a valid snapshot.
	pub fn decode(bytes: &[u8]) -> Result<Self> {
		let (version, rest): (u32, &[u8]) = postcard::take_from_bytes(bytes)?;
		if version != FORMAT_VERSION {
			return Err(HashkovError::UnsupportedVersion { found: version, expected: FORMAT_VERSION });
		}
		let memory: HashMap<String, Vec<String>> = postcard::from_bytes(rest)?;
		Ok(Self::from_memory(memory))
	}

	/// Writes the encoded chain to `filepath`.
	pub fn save<P: AsRef<Path>>(&self, filepath: P) -> Result<()> {
		let bytes = self.encode()?;
		std::fs::write(&filepath, bytes)?;
		info!("saved chain with {} states to {}", self.len(), filepath.as_ref().display());
		Ok(())
	}

	/// Reads a chain saved with [`MarkovChain::save`].
	pub fn load<P: AsRef<Path>>(filepath: P) -> Result<Self> {
		let bytes = std::fs::read(&filepath)?;
		let chain = Self::decode(&bytes)?;
		info!("loaded chain with {} states from {}", chain.len(), filepath.as_ref().display());
		Ok(chain)
	}
}
