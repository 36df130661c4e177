use super::error::{LexicalError, LexicalErrorType};
use super::token::Token;
use std::fmt::Display;
use crate::utils::prelude::SrcSpan;

pub type Spanned = (u32, Token, u32);
pub type LexResult = std::result::Result<Spanned, LexicalError>;

pub fn str_to_keyword(word: &str) -> Option<Token> {
	Some(match word {
		"let" => Token::Let,
		"routine" => Token::Routine,
		"return" => Token::Return,
		"for" => Token::For,
		_ => return None
	})
}

/// Pull-based tokenizer over `(byte offset, char)` pairs.
///
/// Each call to [`Lexer::next_token`] yields one spanned token. Used as an
/// iterator it is fused: it stops after the first `Eof` or the first error.
#[derive(Debug)]
pub struct Lexer<T: Iterator<Item = (u32, char)>> {
	position: u32,
	next_position: u32,
	ch: Option<char>,
	next_ch: Option<char>,
	input: T,
	finished: bool,
}

impl<T: Iterator<Item = (u32, char)>> Display for Lexer<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f,
			"Lexer {{\n\tposition: {},\n\tnext_position: {},\n\tch: {:?}, next_ch: {:?}\n}}",
			self.position, self.next_position, self.ch, self.next_ch
		)
	}
}

impl<T: Iterator<Item = (u32, char)>> Lexer<T> {
	pub fn new(input: T) -> Self {
        let mut lexer = Self {
            position: 0,
            next_position: 0,
            ch: None,
			next_ch: None,
            input,
			finished: false,
        };

        lexer.next_char();
        lexer.next_char();

        lexer
    }

    pub fn next_token(&mut self) -> LexResult {
		self.skip_whitespace();

		let span = match self.ch {
			Some(ch) => match ch {
				'+' => self.eat_one_char(Token::Plus),
				'-' => self.eat_one_char(Token::Minus),
				'*' => self.eat_one_char(Token::Mult),
				'/' => self.eat_one_char(Token::Div),
				'=' => self.eat_one_char(Token::Assign),
				';' => self.eat_one_char(Token::Semicolon),
				'^' => self.eat_one_char(Token::Caret),
				'[' => self.eat_one_char(Token::LSBracket),
				']' => self.eat_one_char(Token::RSBracket),
				',' => self.eat_one_char(Token::Comma),
				'<' => self.eat_relational(Token::LessThan, Token::LessThanOrEqual),
				'>' => self.eat_relational(Token::GreaterThan, Token::GreaterThanOrEqual),
				'a'..='z' | 'A'..='Z' | '_' => self.lex_ident(),
				'0'..='9' => self.lex_number(),
				c => {
					let start = self.position;
					return Err(LexicalError {
						error: LexicalErrorType::UnrecognizedCharacter { ch: c },
						location: SrcSpan::from(start, start + c.len_utf8() as u32),
					});
				}
			},
			None => (self.position, Token::Eof, self.position)
		};

		Ok(span)
    }

	fn next_char(&mut self) -> Option<char> {
		let ch = self.ch;

		let next = match self.input.next() {
			Some((pos, ch)) => {
				self.position = self.next_position;
				self.next_position = pos;

				Some(ch)
			},
			None => {
				self.position = self.next_position;
				self.next_position += self.next_ch.map_or(0, |c| c.len_utf8() as u32);

				None
			}
		};

		self.ch = self.next_ch;
		self.next_ch = next;

		ch
	}

	fn skip_whitespace(&mut self) {
		while matches!(self.ch, Some(ch) if ch.is_whitespace()) {
			self.next_char();
		}
	}

	fn eat_one_char(&mut self, token: Token) -> Spanned {
		let start_pos = self.position;
		self.next_char();
		let end_pos = self.position;

		(start_pos, token, end_pos)
	}

	// `<` / `<=` and `>` / `>=`
	fn eat_relational(&mut self, single: Token, with_equals: Token) -> Spanned {
		if self.next_ch == Some('=') {
			let start_pos = self.position;
			self.next_char();
			self.next_char();

			(start_pos, with_equals, self.position)
		} else {
			self.eat_one_char(single)
		}
	}

	fn lex_ident(&mut self) -> Spanned {
        let start_pos = self.position;
		let mut ident = String::new();

		while let Some(ch) = self.ch {
			if !(ch.is_ascii_alphanumeric() || ch == '_') {
				break;
			}

			ident.push(ch);
			self.next_char();
		}

        let end_pos = self.position;

		match str_to_keyword(&ident) {
			Some(keyword) => (start_pos, keyword, end_pos),
			None => (start_pos, Token::Ident(ident), end_pos)
		}
	}

	fn lex_number(&mut self) -> Spanned {
		let start_pos = self.position;
		let mut value = String::new();

		self.take_digits(&mut value);

		if self.ch == Some('.') {
			value.push('.');
			self.next_char();
			self.take_digits(&mut value);
		}

		let end_pos = self.position;

		// digits with at most one period always parse, `1.` included
		let value = value.parse::<f64>().unwrap_or_default();

		(start_pos, Token::Number(value), end_pos)
	}

	fn take_digits(&mut self, value: &mut String) {
		while let Some(ch) = self.ch {
			if !ch.is_ascii_digit() {
				break;
			}

			value.push(ch);
			self.next_char();
		}
	}
}

impl<T: Iterator<Item = (u32, char)>> Iterator for Lexer<T> {
	type Item = LexResult;

	fn next(&mut self) -> Option<Self::Item> {
		if self.finished {
			return None;
		}

		let token = self.next_token();

		if matches!(token, Ok((_, Token::Eof, _)) | Err(_)) {
			self.finished = true;
		}

		Some(token)
	}
}

/// Tokenizes source text held in memory.
pub fn tokenize(src: &str) -> Lexer<impl Iterator<Item = (u32, char)> + '_> {
	Lexer::new(src.char_indices().map(|(i, c)| (i as u32, c)))
}
