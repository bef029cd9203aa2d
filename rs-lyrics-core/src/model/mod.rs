//! Top-level module for the Markov lyrics model.
//!
//! - Tokens and sentinels (`Token`)
//! - Context windows (`Order`, `Context`)
//! - The transition table (`TransitionTable`)
//! - Generation parameters (`GenerationInput`)
//! - The random walk and the high-level interface (`Generator`)

/// Token enumeration, tokenization and rendering.
pub mod token;

/// Context windows used as transition table keys.
pub mod context;

/// Immutable map from context to observed successors.
///
/// Built in one pass (or in parallel) from a corpus.
pub mod transition_table;

/// Generation parameters: order, retries, step cap.
pub mod generation_input;

/// Random walk over a table, and a generator owning both tables of a corpus.
pub mod generator;
