use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::token::Token;
use crate::error::LyricsError;

/// Number of preceding tokens used as context.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Order {
	/// One preceding token.
	Unigram,
	/// Two preceding tokens.
	#[default]
	Bigram,
}

impl Order {
	/// Both orders, unigram first.
	pub const ALL: [Order; 2] = [Order::Unigram, Order::Bigram];

	/// Context a walk starts from: `Start`, or `(None, Start)`.
	pub fn start_context(self) -> Context {
		match self {
			Order::Unigram => Context::Unigram(Token::Start),
			Order::Bigram => Context::Bigram(None, Token::Start),
		}
	}

	/// Window size.
	pub fn size(self) -> usize {
		match self {
			Order::Unigram => 1,
			Order::Bigram => 2,
		}
	}
}

impl fmt::Display for Order {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Order::Unigram => write!(f, "unigram"),
			Order::Bigram => write!(f, "bigram"),
		}
	}
}

impl FromStr for Order {
	type Err = LyricsError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"unigram" | "1" => Ok(Order::Unigram),
			"bigram" | "2" => Ok(Order::Bigram),
			other => Err(LyricsError::InvalidInput(format!(
				"order must be 'unigram' or 'bigram', got '{other}'"
			))),
		}
	}
}

/// Key of a transition table entry.
///
/// `Bigram(None, t)` is the window at the very beginning of a stream, where
/// there is no token before `t`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Context {
	Unigram(Token),
	Bigram(Option<Token>, Token),
}

impl Context {
	/// Order this context belongs to.
	pub fn order(&self) -> Order {
		match self {
			Context::Unigram(_) => Order::Unigram,
			Context::Bigram(_, _) => Order::Bigram,
		}
	}

	/// Slides the window forward by one token.
	pub fn advance(self, next: Token) -> Self {
		match self {
			Context::Unigram(_) => Context::Unigram(next),
			Context::Bigram(_, last) => Context::Bigram(Some(last), next),
		}
	}
}

impl fmt::Display for Context {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Context::Unigram(t) => write!(f, "({t})"),
			Context::Bigram(None, t) => write!(f, "(_, {t})"),
			Context::Bigram(Some(p), t) => write!(f, "({p}, {t})"),
		}
	}
}
