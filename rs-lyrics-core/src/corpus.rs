//! Training corpus: an ordered list of song lyrics.

use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{LyricsError, Result};
use crate::io::{list_files, read_binary, read_text, write_binary};

/// Line separating two songs in a single-file corpus.
pub const DOCUMENT_SEPARATOR: &str = "---";

/// Text clean-up applied to every document before tokenization.
///
/// The transition table never normalizes by itself; this is a caller policy.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
	/// Keep the text as written.
	#[default]
	None,
	/// Lowercase every character.
	Lowercase,
	/// Lowercase and drop ASCII punctuation except apostrophes.
	StripPunctuation,
}

impl Normalization {
	/// Applies the policy to one document. Line structure is preserved.
	pub fn apply(self, document: &str) -> String {
		match self {
			Normalization::None => document.to_owned(),
			Normalization::Lowercase => document.to_lowercase(),
			Normalization::StripPunctuation => document
				.to_lowercase()
				.chars()
				.filter(|c| !c.is_ascii_punctuation() || *c == '\'')
				.collect(),
		}
	}
}

/// Ordered collection of raw documents.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Corpus {
	documents: Vec<String>,
}

impl Corpus {
	/// Wraps documents as-is. Validation is up to the caller.
	pub fn new(documents: Vec<String>) -> Self {
		Self { documents }
	}

	/// Reads every `*.txt` file of `dir`, in file-name order, one song per file.
	///
	/// Blank files are skipped.
	pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
		let dir = dir.as_ref();
		let mut corpus = Self::default();
		for file in list_files(dir, "txt")? {
			let text = read_text(dir.join(&file))?;
			corpus.push_checked(text, &file);
		}
		info!("loaded {} songs from {}", corpus.len(), dir.display());
		Ok(corpus)
	}

	/// Reads a single text file holding several songs separated by
	/// [`DOCUMENT_SEPARATOR`] lines.
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
		let path = path.as_ref();
		let text = read_text(path)?;
		let corpus = Self::parse(&text, &path.display().to_string());
		info!("loaded {} songs from {}", corpus.len(), path.display());
		Ok(corpus)
	}

	/// Reads a corpus from a directory ([`Corpus::from_dir`]) or a file
	/// ([`Corpus::from_file`]).
	pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
		let path = path.as_ref();
		if path.is_dir() {
			Self::from_dir(path)
		} else if path.is_file() {
			Self::from_file(path)
		} else {
			Err(LyricsError::InvalidInput(format!(
				"corpus not found: {}",
				path.display()
			)))
		}
	}

	/// Splits the content of a single-file corpus into songs.
	fn parse(text: &str, origin: &str) -> Self {
		let mut corpus = Self::default();
		let mut current: Vec<&str> = Vec::new();
		let mut index = 0;
		for line in text.lines() {
			if line.trim() == DOCUMENT_SEPARATOR {
				corpus.push_checked(current.join("\n"), &format!("{origin}#{index}"));
				current.clear();
				index += 1;
			} else {
				current.push(line);
			}
		}
		corpus.push_checked(current.join("\n"), &format!("{origin}#{index}"));
		corpus
	}

	fn push_checked(&mut self, document: String, origin: &str) {
		if document.trim().is_empty() {
			warn!("skipping empty song {origin}");
			return;
		}
		self.documents.push(document);
	}

	/// Returns a copy with `normalization` applied to every document.
	pub fn normalized(&self, normalization: Normalization) -> Self {
		Self {
			documents: self.documents.iter().map(|d| normalization.apply(d)).collect(),
		}
	}

	pub fn documents(&self) -> &[String] {
		&self.documents
	}

	pub fn len(&self) -> usize {
		self.documents.len()
	}

	pub fn is_empty(&self) -> bool {
		self.documents.is_empty()
	}

	/// Writes the corpus to `path` (postcard).
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		write_binary(self, path)
	}

	/// Reads a corpus written by [`Corpus::save`].
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		read_binary(path)
	}
}
