//! Hashtag-driven text generation library.
//!
//! This crate provides a small generative text engine:
//! - A composable pipeline cleaning and tokenizing social media posts
//! - A first-order Markov chain trained on the resulting token sequences
//! - Seeded generation of messages within a character budget
//! - Versioned persistence of trained chains
//!
//! Fetching posts and publishing messages are left to the caller.

/// Error type shared by the whole crate.
pub mod error;

/// JSON configuration of pipelines and generation parameters.
pub mod config;

/// Text stages and the pipeline running them.
pub mod pipeline;

/// Markov chain, seed selection, composition and the `Generator` facade.
pub mod model;

/// I/O utilities (file loading, path helpers).
mod io;

pub use error::{HashkovError, Result};
pub use model::chain::MarkovChain;
pub use model::generation_input::{GenerationInput, StartSeed};
pub use model::generator::Generator;
pub use pipeline::{Pipeline, Processed, Stage};
