//! TOML configuration shared by the binaries.

use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::corpus::Normalization;
use crate::error::Result;
use crate::io::{normalize_folder, read_text};
use crate::model::context::Order;
use crate::model::generation_input::{DEFAULT_MAX_STEPS, GenerationInput};

/// Settings read from `rs-lyrics.toml`.
///
/// Every field is optional in the file.
///
/// ```toml
/// data_dir = "./data"
/// corpus = "songs"
/// order = "bigram"
/// nb_try = 5
/// max_steps = 10000   # 0 disables the cap
/// seed = 42           # omit for a random seed per call
/// normalization = "lowercase"
///
/// [server]
/// host = "127.0.0.1"
/// port = 5000
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
	/// Directory holding the corpora.
	pub data_dir: String,
	/// Corpus loaded at startup, relative to `data_dir`.
	pub corpus: String,
	pub order: Order,
	pub nb_try: usize,
	pub max_steps: usize,
	pub seed: Option<u64>,
	pub normalization: Normalization,
	pub server: ServerConfig,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
	pub host: String,
	pub port: u16,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			data_dir: "./data".to_owned(),
			corpus: "songs".to_owned(),
			order: Order::Bigram,
			nb_try: 5,
			max_steps: DEFAULT_MAX_STEPS,
			seed: None,
			normalization: Normalization::None,
			server: ServerConfig::default(),
		}
	}
}

impl Default for ServerConfig {
	fn default() -> Self {
		Self { host: "127.0.0.1".to_owned(), port: 5000 }
	}
}

impl Config {
	/// Parses a TOML document.
	pub fn from_toml_str(text: &str) -> Result<Self> {
		Ok(toml::from_str(text)?)
	}

	/// Reads `path`, or returns the defaults if it does not exist.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let path = path.as_ref();
		if !path.exists() {
			info!("no config at {}, using defaults", path.display());
			return Ok(Self::default());
		}
		let config = Self::from_toml_str(&read_text(path)?)?;
		info!("loaded config {}", path.display());
		Ok(config)
	}

	/// Resolved data directory.
	pub fn data_path(&self) -> PathBuf {
		normalize_folder(&self.data_dir)
	}

	/// Path of a corpus inside the data directory.
	pub fn corpus_path(&self, name: &str) -> PathBuf {
		self.data_path().join(name)
	}

	/// Generation parameters described by this config.
	pub fn generation_input(&self) -> Result<GenerationInput> {
		let mut input = GenerationInput::new(self.order);
		input.nb_try = self.nb_try;
		input.set_max_steps(if self.max_steps == 0 { None } else { Some(self.max_steps) })?;
		Ok(input)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::LyricsError;

	#[test]
	fn empty_file_is_default() {
		assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
	}

	#[test]
	fn full_file() {
		let config = Config::from_toml_str(
			r#"
			data_dir = "lyrics"
			corpus = "beatles.txt"
			order = "unigram"
			nb_try = 2
			max_steps = 0
			seed = 42
			normalization = "strip_punctuation"

			[server]
			port = 8080
			"#,
		)
		.unwrap();

		assert_eq!(config.corpus_path(&config.corpus), PathBuf::from("lyrics/beatles.txt"));
		assert_eq!(config.order, Order::Unigram);
		assert_eq!(config.seed, Some(42));
		assert_eq!(config.normalization, Normalization::StripPunctuation);
		assert_eq!(config.server.host, "127.0.0.1");
		assert_eq!(config.server.port, 8080);

		let input = config.generation_input().unwrap();
		assert_eq!(input.order, Order::Unigram);
		assert_eq!(input.nb_try, 2);
		assert_eq!(input.max_steps(), None);
	}

	#[test]
	fn bad_order_is_a_config_error() {
		assert!(matches!(
			Config::from_toml_str("order = \"trigram\""),
			Err(LyricsError::Config(_))
		));
	}

	#[test]
	fn missing_file_is_default() {
		let config = Config::load("/definitely/not/rs-lyrics.toml").unwrap();
		assert_eq!(config, Config::default());
		assert_eq!(config.generation_input().unwrap().max_steps(), Some(DEFAULT_MAX_STEPS));
	}
}
