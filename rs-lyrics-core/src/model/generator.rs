use std::collections::HashSet;
use std::path::Path;

use log::{debug, info, warn};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::context::Order;
use super::generation_input::GenerationInput;
use super::token::{Token, render, tokenize};
use super::transition_table::TransitionTable;
use crate::corpus::{Corpus, Normalization};
use crate::error::{LyricsError, Result};
use crate::io::{build_output_path, read_binary, write_binary};

/// Random walk over `table`, from its start context to the end marker.
///
/// At each step one successor of the current context is drawn uniformly
/// (duplicates make this frequency-weighted), emitted, and the context
/// window slides forward by one token. Drawing `End` stops the walk; `End`
/// itself is not emitted.
///
/// # Errors
/// - [`LyricsError::MissingContext`] if a context has no entry. Never happens
///   for a table walked with its own training corpus; not retried.
/// - [`LyricsError::EmptyTransitions`] if an entry has no successor (table
///   built from an empty corpus).
/// - [`LyricsError::StepLimit`] once `max_steps` draws did not reach `End`.
pub fn walk<R: Rng + ?Sized>(
	table: &TransitionTable,
	rng: &mut R,
	max_steps: Option<usize>,
) -> Result<Vec<Token>> {
	let mut context = table.start_context();
	let mut emitted = Vec::new();
	let mut steps = 0;

	loop {
		if let Some(limit) = max_steps {
			if steps >= limit {
				return Err(LyricsError::StepLimit(limit));
			}
		}

		let successors = table
			.get(&context)
			.ok_or_else(|| LyricsError::MissingContext(context.clone()))?;
		let next = successors
			.choose(rng)
			.ok_or_else(|| LyricsError::EmptyTransitions(context.clone()))?
			.clone();
		steps += 1;

		if next == Token::End {
			break;
		}
		emitted.push(next.clone());
		context = context.advance(next);
	}

	debug!("{} walk finished after {} steps", table.order(), steps);
	Ok(emitted)
}

/// Generates one song as text. See [`walk`] and [`render`].
pub fn generate<R: Rng + ?Sized>(
	table: &TransitionTable,
	rng: &mut R,
	max_steps: Option<usize>,
) -> Result<String> {
	Ok(render(&walk(table, rng, max_steps)?))
}

/// Summary of a loaded generator.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct GeneratorStats {
	pub songs: usize,
	pub unigram_contexts: usize,
	pub bigram_contexts: usize,
	pub transitions: usize,
}

/// High-level generator for one corpus.
///
/// # Responsibilities
/// - Own the unigram and bigram tables of a corpus
/// - Cache them on disk next to the corpus
/// - Generate songs, retrying when a training song comes out verbatim
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Generator {
	normalization: Normalization,
	unigram: TransitionTable,
	bigram: TransitionTable,
	/// Training songs, rendered the way generated songs are.
	songs: HashSet<String>,
}

impl Generator {
	/// Builds both tables from a corpus, without normalization.
	pub fn new(corpus: &Corpus) -> Result<Self> {
		Self::with_normalization(corpus, Normalization::None)
	}

	/// Builds both tables from `corpus` after applying `normalization`.
	pub fn with_normalization(corpus: &Corpus, normalization: Normalization) -> Result<Self> {
		let corpus = corpus.normalized(normalization);
		let documents = corpus.documents();

		Ok(Self {
			normalization,
			unigram: TransitionTable::build_parallel(Order::Unigram, documents)?,
			bigram: TransitionTable::build_parallel(Order::Bigram, documents)?,
			songs: documents.iter().map(|d| render(&tokenize(d))).collect(),
		})
	}

	/// Loads the generator of the corpus at `path` (directory or file).
	///
	/// # Behavior
	/// - Uses `<path>.bin` if it exists and was built with the same normalization.
	/// - Otherwise reads the corpus, builds the tables and writes `<path>.bin`.
	///
	/// # Notes
	/// - The cache is not checked against the corpus content; delete the
	///   `.bin` file after editing the songs.
	pub fn from_path<P: AsRef<Path>>(path: P, normalization: Normalization) -> Result<Self> {
		let path = path.as_ref();
		let binary_data_path = build_output_path(path, "bin")?;

		if binary_data_path.exists() {
			let cached: Self = read_binary(&binary_data_path)?;
			if cached.normalization == normalization {
				info!("loaded cached model {}", binary_data_path.display());
				return Ok(cached);
			}
			info!(
				"cached model {} uses {:?} normalization, rebuilding with {:?}",
				binary_data_path.display(),
				cached.normalization,
				normalization
			);
		}

		let corpus = Corpus::from_path(path)?;
		let generator = Self::with_normalization(&corpus, normalization)?;
		generator.save(&binary_data_path)?;
		info!("wrote model cache {}", binary_data_path.display());
		Ok(generator)
	}

	/// Writes the generator to `path` (postcard).
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		write_binary(self, path)
	}

	/// Reads a generator written by [`Generator::save`].
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		read_binary(path)
	}

	/// Table of the given order.
	pub fn table(&self, order: Order) -> &TransitionTable {
		match order {
			Order::Unigram => &self.unigram,
			Order::Bigram => &self.bigram,
		}
	}

	pub fn normalization(&self) -> Normalization {
		self.normalization
	}

	/// `true` if `text` is a training song, as rendered by generation.
	pub fn is_training_song(&self, text: &str) -> bool {
		self.songs.contains(text)
	}

	/// Generates a song, avoiding training songs if possible.
	///
	/// # Behavior
	/// - Walks the table of `input.order`.
	/// - If the result is a training song, walks again, up to `input.nb_try` times.
	/// - Returns the first new song, or the last attempt.
	pub fn generate<R: Rng + ?Sized>(&self, input: &GenerationInput, rng: &mut R) -> Result<String> {
		let table = self.table(input.order);
		let mut song = generate(table, rng, input.max_steps())?;
		let mut nb_try = input.nb_try;

		while nb_try > 0 && self.is_training_song(&song) {
			song = generate(table, rng, input.max_steps())?;
			nb_try -= 1;
		}

		if input.nb_try > 0 && self.is_training_song(&song) {
			warn!("still reproducing a training song after {} retries", input.nb_try);
		}
		Ok(song)
	}

	pub fn stats(&self) -> GeneratorStats {
		GeneratorStats {
			songs: self.songs.len(),
			unigram_contexts: self.unigram.context_count(),
			bigram_contexts: self.bigram.context_count(),
			transitions: self.unigram.transition_count(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::context::Context;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	const COWBOY: &str = "Some people call me the space cowboy\nyeah";

	fn corpus(songs: &[&str]) -> Corpus {
		Corpus::new(songs.iter().map(|s| s.to_string()).collect())
	}

	#[test]
	fn single_path_reproduced_for_any_seed() {
		for order in Order::ALL {
			let table = TransitionTable::build(order, &[COWBOY]);
			for seed in 0..20 {
				let mut rng = StdRng::seed_from_u64(seed);
				let song = generate(&table, &mut rng, None).unwrap();
				assert_eq!(song, "Some people call me the space cowboy\nyeah\n");
			}
		}
	}

	#[test]
	fn walk_excludes_end_marker() {
		let table = TransitionTable::build(Order::Unigram, &["hey jude"]);
		let tokens = walk(&table, &mut StdRng::seed_from_u64(1), None).unwrap();
		assert_eq!(tokens, vec![Token::word("hey"), Token::word("jude"), Token::LineBreak]);
	}

	#[test]
	fn same_seed_same_song() {
		let songs = [
			"na na na na\nhey hey hey\ngoodbye",
			"hey you\nout there in the cold\nna na",
			"goodbye blue sky\ngoodbye\nna na na",
		];
		for order in Order::ALL {
			let table = TransitionTable::build(order, &songs);
			for seed in 0..10 {
				let a = generate(&table, &mut StdRng::seed_from_u64(seed), Some(1000)).unwrap();
				let b = generate(&table, &mut StdRng::seed_from_u64(seed), Some(1000)).unwrap();
				assert_eq!(a, b);
			}
		}
	}

	#[test]
	fn bigram_only_uses_seen_pairs() {
		let songs = ["a b c", "x b y"];
		let table = TransitionTable::build(Order::Bigram, &songs);
		for seed in 0..30 {
			let song = generate(&table, &mut StdRng::seed_from_u64(seed), None).unwrap();
			assert!(song == "a b c\n" || song == "x b y\n", "unexpected {song:?}");
		}
	}

	#[test]
	fn empty_corpus_cannot_generate() {
		let empty: [&str; 0] = [];
		let table = TransitionTable::build(Order::Unigram, &empty);
		let err = generate(&table, &mut StdRng::seed_from_u64(0), None).unwrap_err();
		assert!(matches!(err, LyricsError::EmptyTransitions(Context::Unigram(Token::Start))));
	}

	#[test]
	fn missing_context_is_fatal() {
		let table = TransitionTable::from_transitions(
			Order::Unigram,
			vec![(Context::Unigram(Token::Start), vec![Token::word("orphan")])],
		);
		let err = generate(&table, &mut StdRng::seed_from_u64(0), None).unwrap_err();
		assert!(matches!(
			err,
			LyricsError::MissingContext(Context::Unigram(Token::Word(ref w))) if w == "orphan"
		));
	}

	#[test]
	fn step_cap() {
		let table = TransitionTable::build(Order::Unigram, &[COWBOY]);
		let mut rng = StdRng::seed_from_u64(0);
		// 8 words + 2 line breaks + end marker
		assert!(matches!(generate(&table, &mut rng, Some(10)), Err(LyricsError::StepLimit(10))));
		assert!(generate(&table, &mut rng, Some(11)).is_ok());
	}

	#[test]
	fn retries_avoid_training_songs() {
		let generator = Generator::new(&corpus(&["a x b", "c x d"])).unwrap();
		let mut input = GenerationInput::new(Order::Unigram);
		input.nb_try = 200;
		let mut rng = StdRng::seed_from_u64(3);
		for _ in 0..10 {
			let song = generator.generate(&input, &mut rng).unwrap();
			assert!(song == "a x d\n" || song == "c x b\n", "unexpected {song:?}");
			assert!(!generator.is_training_song(&song));
		}
	}

	#[test]
	fn retries_exhausted_returns_last_attempt() {
		let generator = Generator::new(&corpus(&[COWBOY])).unwrap();
		let mut input = GenerationInput::new(Order::Bigram);
		input.nb_try = 3;
		let song = generator.generate(&input, &mut StdRng::seed_from_u64(9)).unwrap();
		assert!(generator.is_training_song(&song));
	}

	#[test]
	fn normalization_flows_into_tables() {
		let generator =
			Generator::with_normalization(&corpus(&["Hello, World!"]), Normalization::StripPunctuation)
				.unwrap();
		let song = generator
			.generate(&GenerationInput::new(Order::Unigram), &mut StdRng::seed_from_u64(0))
			.unwrap();
		assert_eq!(song, "hello world\n");
		assert_eq!(generator.normalization(), Normalization::StripPunctuation);
	}

	#[test]
	fn stats_count_both_tables() {
		let generator = Generator::new(&corpus(&["a b", "a c"])).unwrap();
		let stats = generator.stats();
		assert_eq!(stats.songs, 2);
		// start, a, b, c, line break
		assert_eq!(stats.unigram_contexts, 5);
		// (_, start), (start, a), (a, b), (a, c), (b, lb), (c, lb)
		assert_eq!(stats.bigram_contexts, 6);
		// 2 songs * (2 words + line break + end)
		assert_eq!(stats.transitions, 8);
	}

	#[test]
	fn from_path_writes_and_reuses_cache() {
		let dir = std::env::temp_dir().join(format!("rs-lyrics-gen-{}", std::process::id()));
		let _ = std::fs::remove_dir_all(&dir);
		let songs = dir.join("songs");
		std::fs::create_dir_all(&songs).unwrap();
		std::fs::write(songs.join("a.txt"), "Ob-la-di ob-la-da").unwrap();

		let built = Generator::from_path(&songs, Normalization::None).unwrap();
		assert!(dir.join("songs.bin").exists());

		// Cache is used even once the songs are gone.
		std::fs::remove_file(songs.join("a.txt")).unwrap();
		let cached = Generator::from_path(&songs, Normalization::None).unwrap();
		assert_eq!(cached.table(Order::Bigram), built.table(Order::Bigram));

		// A different normalization rebuilds from the (now empty) corpus.
		let rebuilt = Generator::from_path(&songs, Normalization::Lowercase).unwrap();
		assert_eq!(rebuilt.stats().songs, 0);

		std::fs::remove_dir_all(&dir).unwrap();
	}

	#[test]
	fn dir_and_file_corpora_keep_separate_caches() {
		let dir = std::env::temp_dir().join(format!("rs-lyrics-gen-both-{}", std::process::id()));
		let _ = std::fs::remove_dir_all(&dir);
		std::fs::create_dir_all(dir.join("songs")).unwrap();
		std::fs::write(dir.join("songs").join("a.txt"), "alpha beta").unwrap();
		std::fs::write(dir.join("songs.txt"), "gamma delta\n---\ngamma delta").unwrap();

		let input = GenerationInput::new(Order::Bigram);
		for _ in 0..2 {
			// Second round reads both caches back.
			let from_dir = Generator::from_path(dir.join("songs"), Normalization::None).unwrap();
			let from_file = Generator::from_path(dir.join("songs.txt"), Normalization::None).unwrap();

			let mut rng = StdRng::seed_from_u64(4);
			assert_eq!(from_dir.generate(&input, &mut rng).unwrap(), "alpha beta\n");
			assert_eq!(from_file.generate(&input, &mut rng).unwrap(), "gamma delta\n");
			assert_eq!(from_file.stats().songs, 1);
			assert_eq!(from_file.stats().transitions, 8);
		}
		assert!(dir.join("songs.bin").exists());
		assert!(dir.join("songs.txt.bin").exists());

		std::fs::remove_dir_all(&dir).unwrap();
	}
}
