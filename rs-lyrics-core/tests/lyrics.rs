use rand::SeedableRng;
use rand::rngs::StdRng;

use rs_lyrics_core::LyricsError;
use rs_lyrics_core::corpus::Corpus;
use rs_lyrics_core::model::context::{Context, Order};
use rs_lyrics_core::model::generation_input::GenerationInput;
use rs_lyrics_core::model::generator::{Generator, generate};
use rs_lyrics_core::model::token::Token;
use rs_lyrics_core::model::transition_table::TransitionTable;

fn w(s: &str) -> Token {
	Token::word(s)
}

#[test]
fn space_cowboy_unigram_table() {
	let table = TransitionTable::build(Order::Unigram, &["Some people call me the space cowboy yeah"]);
	let words = ["Some", "people", "call", "me", "the", "space", "cowboy", "yeah"];

	assert_eq!(table.get(&Context::Unigram(Token::Start)), Some(&[w("Some")][..]));
	for pair in words.windows(2) {
		assert_eq!(table.get(&Context::Unigram(w(pair[0]))), Some(&[w(pair[1])][..]));
	}
	assert_eq!(table.get(&Context::Unigram(w("yeah"))), Some(&[Token::LineBreak][..]));
	assert_eq!(table.get(&Context::Unigram(Token::LineBreak)), Some(&[Token::End][..]));
}

#[test]
fn space_cowboy_bigram_table() {
	let table = TransitionTable::build(Order::Bigram, &["Some people call me the space cowboy yeah"]);

	assert_eq!(table.get(&Context::Bigram(None, Token::Start)), Some(&[w("Some")][..]));
	assert_eq!(
		table.get(&Context::Bigram(Some(Token::Start), w("Some"))),
		Some(&[w("people")][..])
	);
	assert_eq!(table.get(&Context::Unigram(Token::Start)), None);
}

#[test]
fn shared_first_word_is_counted_twice() {
	let table = TransitionTable::build(Order::Unigram, &["Come together", "Come sail away"]);
	assert_eq!(table.get(&Context::Unigram(Token::Start)), Some(&[w("Come"), w("Come")][..]));
}

#[test]
fn corpus_to_song_end_to_end() {
	let corpus = Corpus::new(vec![
		"Hey Jude\ndon't make it bad".to_owned(),
		"Hey you\ndon't tell me there's no hope at all".to_owned(),
	]);
	let generator = Generator::new(&corpus).unwrap();

	let mut input = GenerationInput::new(Order::Bigram);
	input.nb_try = 0;
	for seed in 0..10 {
		let song = generator.generate(&input, &mut StdRng::seed_from_u64(seed)).unwrap();
		assert!(song.starts_with("Hey "));
		assert!(song.ends_with('\n'));
		assert_eq!(song.lines().count(), 2);
	}
}

#[test]
fn saved_table_still_generates() {
	let table = TransitionTable::build(Order::Unigram, &["only start"]);
	let path = std::env::temp_dir().join(format!("rs-lyrics-it-{}.bin", std::process::id()));
	table.save(&path).unwrap();
	let loaded = TransitionTable::load(&path).unwrap();
	std::fs::remove_file(&path).unwrap();

	let song = generate(&loaded, &mut StdRng::seed_from_u64(5), None).unwrap();
	assert_eq!(song, "only start\n");

	assert!(matches!(
		TransitionTable::load("/definitely/not/a/table.bin"),
		Err(LyricsError::Io(_))
	));
}
