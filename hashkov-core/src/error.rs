use thiserror::Error;

/// Errors raised by the hashkov engine.
///
/// Sampling dead-ends and composer exhaustion are not errors: they show up
/// as a shorter sequence or an empty string.
#[derive(Error, Debug)]
pub enum HashkovError {
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("snapshot codec error: {0}")]
	Codec(#[from] postcard::Error),

	#[error("configuration error: {0}")]
	Config(#[from] serde_json::Error),

	#[error("unsupported snapshot version {found} (expected {expected})")]
	UnsupportedVersion { found: u32, expected: u32 },

	#[error("invalid stage: {0}")]
	InvalidStage(String),

	#[error("no eligible seed for anchor '{0}'")]
	NoEligibleSeed(String),
}

pub type Result<T> = std::result::Result<T, HashkovError>;
