//! Configuration of a generation run.
//!
//! Read from a JSON file; every field has a default, so `{}` is a valid
//! configuration.

use std::env;
use std::path::{Component, Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::generation_input::{DEFAULT_BUDGET, DEFAULT_LENGTH, GenerationInput};
use crate::pipeline::{Pipeline, Stage};

/// Environment variable holding the path of the configuration file.
pub const CONFIG_ENV: &str = "HASHKOV_CONFIG";

/// Description of one pipeline stage, tagged by `"stage"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum StageConfig {
	Whitespace,
	Punctuation {
		/// Characters to delete; the ASCII punctuation set when absent.
		#[serde(default)]
		chars: Option<String>,
	},
	Mention,
	Url,
	Hashtag,
	Replace { from: String, to: String },
	Tokenize { width: usize },
}

impl StageConfig {
	/// Builds the stage, validating its parameters.
	pub fn build(&self) -> Result<Stage> {
		match self {
			StageConfig::Whitespace => Ok(Stage::Whitespace),
			StageConfig::Punctuation { chars: None } => Ok(Stage::punctuation()),
			StageConfig::Punctuation { chars: Some(chars) } => Ok(Stage::punctuation_from(chars)),
			StageConfig::Mention => Ok(Stage::Mention),
			StageConfig::Url => Ok(Stage::Url),
			StageConfig::Hashtag => Ok(Stage::Hashtag),
			StageConfig::Replace { from, to } => Stage::replace(from, to),
			StageConfig::Tokenize { width } => Stage::tokenize(*width),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashkovConfig {
	pub pipeline: Vec<StageConfig>,
	pub length: usize,
	pub budget: usize,
	pub data_dir: String,
}

impl Default for HashkovConfig {
	fn default() -> Self {
		Self {
			pipeline: vec![
				StageConfig::Url,
				StageConfig::Mention,
				StageConfig::Whitespace,
				StageConfig::Hashtag,
				StageConfig::Tokenize { width: 2 },
			],
			length: DEFAULT_LENGTH,
			budget: DEFAULT_BUDGET,
			data_dir: "./data".to_owned(),
		}
	}
}

impl HashkovConfig {
	/// Reads a configuration file.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let contents = std::fs::read_to_string(&path)?;
		let config = serde_json::from_str(&contents)?;
		info!("loaded configuration from {}", path.as_ref().display());
		Ok(config)
	}

	/// Reads the file named by [`CONFIG_ENV`], or returns the defaults when
	/// the variable is not set.
	pub fn from_env() -> Result<Self> {
		match env::var_os(CONFIG_ENV) {
			Some(path) => Self::load(path),
			None => Ok(Self::default()),
		}
	}

	/// Builds the configured pipeline.
	///
	/// # Errors
	/// Returns `InvalidStage` for the first stage with invalid parameters.
	pub fn build_pipeline(&self) -> Result<Pipeline> {
		let mut pipeline = Pipeline::new();
		for stage in &self.pipeline {
			pipeline.push(stage.build()?);
		}
		Ok(pipeline)
	}

	/// The data directory. A bare current directory (`"."`, `"./"` or `""`)
	/// resolves to the absolute working directory.
	pub fn data_path(&self) -> PathBuf {
		let dir = Path::new(&self.data_dir);
		if dir.components().all(|component| component == Component::CurDir) {
			if let Ok(current) = env::current_dir() {
				return current;
			}
		}
		dir.to_path_buf()
	}

	/// Generation parameters with the configured length and budget.
	pub fn generation_input(&self) -> GenerationInput {
		GenerationInput { length: self.length, budget: self.budget, ..GenerationInput::default() }
	}
}
