use std::fmt::Display;
use std::str::CharIndices;

use rust_decimal::Decimal;

use super::error::{LexicalError, LexicalErrorType};
use super::token::{Token, TokenKind};
use crate::environment::prelude::Registry;
use crate::utils::prelude::SrcSpan;

pub type LexResult = std::result::Result<Token, LexicalError>;

/// Characters of an in-memory formula paired with their byte offsets.
pub type SourceChars<'s> = std::iter::Map<CharIndices<'s>, fn((usize, char)) -> (u32, char)>;

fn with_u32_index((idx, ch): (usize, char)) -> (u32, char) {
	(idx as u32, ch)
}

/// Single-pass scanner. Function names are checked against the registry
/// while scanning, so an unknown name never reaches the parser.
#[derive(Debug)]
pub struct Lexer<'r, T: Iterator<Item = (u32, char)>> {
	position: u32,
	end: u32,
	ch: Option<char>,
	input: T,
	registry: &'r Registry,
	finished: bool,
}

impl<'r, T: Iterator<Item = (u32, char)>> Display for Lexer<'r, T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f,
			"Lexer {{\n\tposition: {},\n\tch: {:?},\n\tfinished: {}\n}}",
			self.position, self.ch, self.finished
		)
	}
}

impl<'r, 's> Lexer<'r, SourceChars<'s>> {
	pub fn for_source(src: &'s str, registry: &'r Registry) -> Self {
		Lexer::new(src.char_indices().map(with_u32_index as fn((usize, char)) -> (u32, char)), registry)
	}
}

impl<'r, T: Iterator<Item = (u32, char)>> Lexer<'r, T> {
	pub fn new(input: T, registry: &'r Registry) -> Self {
		let mut lexer = Self {
			position: 0,
			end: 0,
			ch: None,
			input,
			registry,
			finished: false,
		};

		lexer.next_char();

		lexer
	}

	pub fn position(&self) -> u32 {
		self.position
	}

	pub fn next_token(&mut self) -> LexResult {
		loop {
			let ch = match self.ch {
				Some(ch) => ch,
				None => {
					let at = self.position;
					return Ok(Token::new(TokenKind::Eof, "", SrcSpan::empty(at)));
				}
			};

			return match ch {
				' ' | '\t' => {
					self.next_char();
					continue;
				},
				'0'..='9' => self.lex_number(),
				'!' => Ok(self.lex_with_equals(TokenKind::Not, TokenKind::NotEqual)),
				'>' => Ok(self.lex_with_equals(TokenKind::GreaterThan, TokenKind::GreaterThanOrEqual)),
				'<' => Ok(self.lex_with_equals(TokenKind::LessThan, TokenKind::LessThanOrEqual)),
				'{' => self.lex_identifier(),
				'a'..='z' | 'A'..='Z' => self.lex_function(),
				c => match TokenKind::from_symbol(c) {
					Some(kind) => Ok(self.eat_one_char(kind)),
					None => Err(LexicalError {
						error: LexicalErrorType::UnrecognizedToken { tok: c },
						location: self.current_span(),
					})
				}
			};
		}
	}

	fn next_char(&mut self) -> Option<char> {
		let ch = self.ch;

		if let Some(c) = ch {
			self.end = self.position + c.len_utf8() as u32;
		}

		match self.input.next() {
			Some((pos, c)) => {
				self.position = pos;
				self.ch = Some(c);
			},
			None => {
				self.position = self.end;
				self.ch = None;
			}
		}

		ch
	}

	/// Span of the character under the cursor; empty at end of input.
	fn current_span(&self) -> SrcSpan {
		let width = self.ch.map_or(0, |c| c.len_utf8() as u32);

		SrcSpan::from(self.position, self.position + width)
	}

	fn eat_one_char(&mut self, kind: TokenKind) -> Token {
		let start_pos = self.position;
		let text = self.next_char().map(String::from).unwrap_or_default();
		let end_pos = self.position;

		Token::new(kind, text, SrcSpan::from(start_pos, end_pos))
	}

	/// `!`, `>` and `<` turn into their two-character form when followed by `=`.
	fn lex_with_equals(&mut self, single: TokenKind, with_equals: TokenKind) -> Token {
		let start_pos = self.position;
		let mut text = self.next_char().map(String::from).unwrap_or_default();

		let kind = if self.ch == Some('=') {
			text.push('=');
			self.next_char();
			with_equals
		} else {
			single
		};

		Token::new(kind, text, SrcSpan::from(start_pos, self.position))
	}

	fn lex_number(&mut self) -> LexResult {
		let start_pos = self.position;

		let mut value = String::new();
		let mut has_period = false;

		while let Some(ch) = self.ch {
			match ch {
				'0'..='9' => value.push(ch),
				'.' if has_period => {
					return Err(LexicalError {
						error: LexicalErrorType::MultipleFloatingPoints,
						location: self.current_span(),
					});
				},
				'.' => {
					has_period = true;
					value.push(ch);
				},
				_ => break
			}

			self.next_char();
		}

		let end_pos = self.position;

		if value.ends_with('.') {
			return Err(LexicalError {
				error: LexicalErrorType::MissingDigitAfterPeriod { found: self.ch },
				location: SrcSpan::from(end_pos - 1, end_pos),
			});
		}

		if Decimal::from_str_exact(&value).is_err() {
			return Err(LexicalError {
				error: LexicalErrorType::NumberOutOfRange { literal: value },
				location: SrcSpan::from(start_pos, end_pos),
			});
		}

		Ok(Token::new(TokenKind::Number, value, SrcSpan::from(start_pos, end_pos)))
	}

	fn lex_identifier(&mut self) -> LexResult {
		self.next_char(); // skip `{`

		let start_pos = self.position;

		match self.ch {
			Some(ch) if ch.is_ascii_alphabetic() || ch == '_' => {},
			found => return Err(LexicalError {
				error: LexicalErrorType::InvalidIdentifierStart { found },
				location: self.current_span(),
			})
		}

		let mut name = String::new();

		while let Some(ch) = self.ch {
			if !(ch.is_ascii_alphanumeric() || ch == '_') {
				break;
			}

			name.push(ch);
			self.next_char();
		}

		let end_pos = self.position;

		if self.ch != Some('}') {
			return Err(LexicalError {
				error: LexicalErrorType::MissingIdentifierEnd { found: self.ch },
				location: self.current_span(),
			});
		}

		self.next_char(); // skip `}`

		Ok(Token::new(TokenKind::Identifier, name, SrcSpan::from(start_pos, end_pos)))
	}

	fn lex_function(&mut self) -> LexResult {
		let start_pos = self.position;
		let mut name = String::new();

		while let Some(ch) = self.ch {
			if !(ch.is_ascii_alphabetic() || ch == '.') {
				break;
			}

			name.push(ch.to_ascii_uppercase());
			self.next_char();
		}

		let end_pos = self.position;

		if !self.registry.contains(&name) {
			return Err(LexicalError {
				error: LexicalErrorType::UnknownFunction { name },
				location: SrcSpan::from(start_pos, end_pos),
			});
		}

		Ok(Token::new(TokenKind::Function, name, SrcSpan::from(start_pos, end_pos)))
	}
}

impl<'r, T: Iterator<Item = (u32, char)>> Iterator for Lexer<'r, T> {
	type Item = LexResult;

	/// Yields tokens up to and including the end-of-input token, or up to
	/// the first error; nothing after that.
	fn next(&mut self) -> Option<Self::Item> {
		if self.finished {
			return None;
		}

		let token = self.next_token();

		if matches!(&token, Ok(tok) if tok.is(TokenKind::Eof)) || token.is_err() {
			self.finished = true;
		}

		Some(token)
	}
}

/// Scans `src` into tokens, always terminated by an end-of-input token.
pub fn scan(src: &str, registry: &Registry) -> Result<Vec<Token>, LexicalError> {
	let tokens = Lexer::for_source(src, registry).collect::<Result<Vec<Token>, LexicalError>>()?;

	log::trace!("scanned {} tokens from {src:?}", tokens.len());

	Ok(tokens)
}
