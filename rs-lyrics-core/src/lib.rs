//! Word-level Markov-chain lyrics generation library.
//!
//! This crate provides:
//! - Tokenization of songs with explicit start, end and line-break markers
//! - Unigram and bigram transition tables, built sequentially or in parallel
//! - Random-walk generation with a reproducible random source
//! - Corpus loading, binary caching and TOML configuration
//!
//! Tables are immutable once built and can be shared freely between threads.

/// Transition tables and generation.
pub mod model;

/// Training corpus loading and normalization.
pub mod corpus;

/// TOML configuration.
pub mod config;

/// Error and result types.
pub mod error;

/// I/O utilities (file loading, binary cache, path helpers).
pub mod io;

pub use error::{LyricsError, Result};
