//! Error types for rs-lyrics-core.

use crate::model::context::Context;

/// Result type alias using [`LyricsError`].
pub type Result<T> = std::result::Result<T, LyricsError>;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum LyricsError {
	/// The walk reached a context the table has never seen.
	///
	/// Only possible with a table built from another corpus or a corrupted one.
	#[error("no transition recorded for context {0}")]
	MissingContext(Context),

	/// The context exists but has no successor (empty corpus).
	#[error("context {0} has no successor to sample")]
	EmptyTransitions(Context),

	/// The walk did not reach the end marker within the step cap.
	#[error("generation exceeded {0} steps without reaching the end marker")]
	StepLimit(usize),

	/// Invalid caller-provided value.
	#[error("invalid input: {0}")]
	InvalidInput(String),

	/// I/O error.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),

	/// Binary (postcard) encoding error.
	#[error("serialization: {0}")]
	Serialization(#[from] postcard::Error),

	/// TOML configuration error.
	#[error("config: {0}")]
	Config(#[from] toml::de::Error),
}
