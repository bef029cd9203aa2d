use std::collections::HashMap;
use std::path::Path;
use std::sync::mpsc;
use std::thread;

use log::debug;
use serde::{Deserialize, Serialize};

use super::context::{Context, Order};
use super::token::{Token, tokenize};
use crate::error::{LyricsError, Result};
use crate::io::{read_binary, write_binary};

/// Sparse transition table of a word-level Markov chain.
///
/// Maps every observed context to the tokens that followed it, in
/// observation order and with repetitions kept. A successor seen three
/// times appears three times, so uniform sampling over the sequence is
/// frequency-weighted sampling.
///
/// # Invariants
/// - Every key has the table's `order`.
/// - The start context is always present, possibly with no successor.
/// - Every token of a training stream except the final `End` is the last
///   token of at least one key.
/// - There is no public mutator: a table is only obtained finished, from
///   [`TransitionTable::build`], [`TransitionTable::build_parallel`] or
///   [`TransitionTable::load`].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TransitionTable {
	order: Order,
	transitions: HashMap<Context, Vec<Token>>,
}

impl TransitionTable {
	/// Table with only the start context, mapped to nothing.
	fn empty(order: Order) -> Self {
		Self {
			order,
			transitions: HashMap::from([(order.start_context(), Vec::new())]),
		}
	}

	/// Builds the table of `order` from a corpus, in a single pass.
	///
	/// Each document is tokenized (see [`tokenize`]) and a window of
	/// `order.size()` tokens slides across the stream; the token after each
	/// window is appended to that window's entry.
	///
	/// An empty corpus yields a table whose start context has no successor.
	pub fn build<S: AsRef<str>>(order: Order, documents: &[S]) -> Self {
		let mut table = Self::empty(order);
		for document in documents {
			table.add_document(document.as_ref());
		}
		debug!(
			"built {} table (window of {}): {} documents, {} contexts",
			order,
			order.size(),
			documents.len(),
			table.transitions.len()
		);
		table
	}

	/// Same table as [`TransitionTable::build`], computed on worker threads.
	///
	/// # Behavior
	/// - Splits the corpus into contiguous chunks (CPU cores * factor).
	/// - Builds one partial table per chunk on its own thread.
	/// - Merges partial tables back in chunk order, so successor sequences
	///   keep the corpus order.
	///
	/// # Errors
	/// Returns an error if a worker thread died before sending its table.
	pub fn build_parallel<S: AsRef<str>>(order: Order, documents: &[S]) -> Result<Self> {
		if documents.is_empty() {
			return Ok(Self::empty(order));
		}

		let cpus = num_cpus::get();
		let factor = 8;
		let chunks = cpus * factor;
		let chunk_size = documents.len().div_ceil(chunks);

		let (tx, rx) = mpsc::channel();
		let mut expected = 0;
		for (index, chunk) in documents.chunks(chunk_size).enumerate() {
			let tx = tx.clone();
			let chunk: Vec<String> = chunk.iter().map(|d| d.as_ref().to_owned()).collect();
			expected += 1;

			thread::spawn(move || {
				let partial = Self::build(order, chunk.as_slice());
				// The receiver outlives every sender.
				let _ = tx.send((index, partial));
			});
		}
		drop(tx);

		let mut partials: Vec<(usize, Self)> = rx.iter().collect();
		if partials.len() != expected {
			return Err(LyricsError::InvalidInput(format!(
				"{} of {} table builders did not finish",
				expected - partials.len(),
				expected
			)));
		}
		partials.sort_by_key(|(index, _)| *index);

		let mut table = Self::empty(order);
		for (_, partial) in partials {
			table.merge(partial)?;
		}
		debug!(
			"merged {} partial {} tables into {} contexts",
			expected,
			order,
			table.transitions.len()
		);
		Ok(table)
	}

	/// Table from raw entries, bypassing the builder.
	#[cfg(test)]
	pub(crate) fn from_transitions(order: Order, entries: Vec<(Context, Vec<Token>)>) -> Self {
		Self { order, transitions: entries.into_iter().collect() }
	}

	/// Appends the transitions of one document.
	fn add_document(&mut self, document: &str) {
		let mut context = self.order.start_context();
		for next in tokenize(document).into_iter().skip(1) {
			self.transitions.entry(context.clone()).or_default().push(next.clone());
			context = context.advance(next);
		}
	}

	/// Appends every successor sequence of `other` after this table's own.
	///
	/// # Errors
	/// Returns an error if the orders differ.
	fn merge(&mut self, other: Self) -> Result<()> {
		if self.order != other.order {
			return Err(LyricsError::InvalidInput(format!(
				"order mismatch: self={}, other={}",
				self.order, other.order
			)));
		}

		for (context, successors) in other.transitions {
			self.transitions.entry(context).or_default().extend(successors);
		}

		Ok(())
	}

	/// Context size of this table.
	pub fn order(&self) -> Order {
		self.order
	}

	/// Context every walk on this table starts from.
	pub fn start_context(&self) -> Context {
		self.order.start_context()
	}

	/// Successors recorded for `context`, in observation order.
	pub fn get(&self, context: &Context) -> Option<&[Token]> {
		self.transitions.get(context).map(Vec::as_slice)
	}

	/// Number of distinct contexts.
	pub fn context_count(&self) -> usize {
		self.transitions.len()
	}

	/// Total number of recorded transitions.
	pub fn transition_count(&self) -> usize {
		self.transitions.values().map(Vec::len).sum()
	}

	/// Writes the table to `path` (postcard).
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		write_binary(self, path)
	}

	/// Reads a table written by [`TransitionTable::save`].
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		read_binary(path)
	}
}
