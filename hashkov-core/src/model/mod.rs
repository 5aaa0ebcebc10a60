//! Markov chain generation.
//!
//! This module provides:
//! - The first-order transition table and its sampler (`MarkovChain`)
//! - Versioned persistence of a chain and bulk training from corpus files
//! - Seed selection from a hashtag
//! - Message composition within a character budget
//! - A high-level generation interface (`Generator`)

/// First-order Markov chain over tokens: training, sampling, merging.
pub mod chain;

/// Corpus files: naming, listing and parallel training behind a binary cache.
pub mod corpus;

/// `postcard` encoding of a chain behind a format version tag.
pub mod snapshot;

/// Picks a start token containing a normalized hashtag.
pub mod seed;

/// Greedy assembly of sampled tokens into a bounded message.
pub mod composer;

/// Generation parameters and start seed strategy.
pub mod generation_input;

/// High-level interface tying a pipeline to a chain.
pub mod generator;
