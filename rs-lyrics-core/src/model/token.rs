use std::fmt;

use serde::{Deserialize, Serialize};

/// A single unit of a token stream.
///
/// Document structure is part of the model: sentinels are variants of their
/// own, so a real word spelled `<N>` can never be mistaken for a line break.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Token {
	/// A whitespace-delimited word, kept verbatim.
	Word(String),
	/// End of a line.
	LineBreak,
	/// Beginning of a document.
	Start,
	/// End of a document.
	End,
}

impl Token {
	/// Builds a `Word` token.
	pub fn word(text: &str) -> Self {
		Token::Word(text.to_owned())
	}
}

impl fmt::Display for Token {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Token::Word(w) => write!(f, "{w:?}"),
			Token::LineBreak => write!(f, "<N>"),
			Token::Start => write!(f, "<START>"),
			Token::End => write!(f, "<END>"),
		}
	}
}

/// Turns one document into its token stream.
///
/// # Behavior
/// - Starts with `Start` and finishes with `End`.
/// - Lines are split on `\n` / `\r\n`; every line is followed by a `LineBreak`,
///   the last one included.
/// - Words are split on any whitespace. Blank lines produce a lone `LineBreak`.
///
/// No case folding or punctuation handling happens here; see
/// [`Normalization`](crate::corpus::Normalization).
pub fn tokenize(document: &str) -> Vec<Token> {
	let mut tokens = vec![Token::Start];
	for line in document.lines() {
		tokens.extend(line.split_whitespace().map(Token::word));
		tokens.push(Token::LineBreak);
	}
	tokens.push(Token::End);
	tokens
}

/// Renders emitted tokens as human-readable text.
///
/// Words of a line are joined by one space, each `LineBreak` becomes `\n`.
/// `Start` and `End` are never part of an output and are skipped.
pub fn render(tokens: &[Token]) -> String {
	let mut text = String::new();
	let mut line_start = true;
	for token in tokens {
		match token {
			Token::Word(w) => {
				if !line_start {
					text.push(' ');
				}
				text.push_str(w);
				line_start = false;
			}
			Token::LineBreak => {
				text.push('\n');
				line_start = true;
			}
			Token::Start | Token::End => (),
		}
	}
	text
}
