use crate::lexer::prelude::{LexResult, LexicalError, Lexer, Spanned, Token};
use super::error::{parse_error, unexpected, ParseError, ParseErrorType};
use super::ast::{Identifier, Program};

pub trait Parse<T: Iterator<Item = LexResult>>
    where Self: Sized,
{
    fn parse(parser: &mut Parser<T>) -> Result<Self, ParseError>;
}

/// Recursive-descent parser with a single token of lookahead.
///
/// There is no error recovery: the first mismatch aborts the whole parse.
pub struct Parser<T: Iterator<Item = LexResult>> {
    pub current_token: Spanned,
    pub lex_error: Option<LexicalError>,

    last_end: u32,
    tokens: T,
}

impl<T: Iterator<Item = LexResult>> Parser<T> {
    pub fn new(input: T) -> Self {
        let mut parser = Self {
            current_token: (0, Token::Eof, 0),
            lex_error: None,

            last_end: 0,
            tokens: input,
        };

        parser.step();

        parser
    }

    pub fn step(&mut self) {
        let _ = self.next_token();
    }

    /// Advances and hands back the token that was current.
    ///
    /// A lexical error ends the stream: it is stashed for [`Parser::parse`]
    /// and the parser sees `Eof` from there on.
    pub fn next_token(&mut self) -> Spanned {
        let next = match self.tokens.next() {
            Some(Ok(token)) => token,
            Some(Err(err)) => {
                let at = err.location.start;
                let _ = self.lex_error.get_or_insert(err);

                (at, Token::Eof, at)
            },
            None => (self.last_end, Token::Eof, self.last_end)
        };

        self.last_end = next.2;

        std::mem::replace(&mut self.current_token, next)
    }

    pub fn is(&self, token: &Token) -> bool {
        self.current_token.1 == *token
    }

    pub fn parse(&mut self) -> Result<Program, ParseError> {
        let program = Program::parse(self);

        if let Some(error) = self.lex_error {
            return parse_error(
                ParseErrorType::LexError { error },
                error.location
            );
        }

        program
    }

    pub fn expect_one(&mut self, token: Token) -> Result<(u32, u32), ParseError> {
        if self.is(&token) {
            let (start, _, end) = self.next_token();

            Ok((start, end))
        } else {
            let expected = format!("`{}`", token.as_literal());

            unexpected(&self.current_token, &[expected.as_str()])
        }
    }

    pub fn expect_ident(&mut self) -> Result<Identifier, ParseError> {
        if !matches!(self.current_token.1, Token::Ident(_)) {
            return unexpected(&self.current_token, &["an Identifier"]);
        }

        match self.next_token() {
            (start, Token::Ident(value), end) => Ok(Identifier::from((start, value, end))),
            spanned => unexpected(&spanned, &["an Identifier"])
        }
    }
}

pub fn parse_program(src: &str) -> Result<Program, ParseError> {
    let lexer = Lexer::new(src.char_indices().map(|(i, c)| (i as u32, c)));
    let mut parser = Parser::new(lexer);

    parser.parse()
}

pub fn parse_program_from_stream(stream: impl Iterator<Item = char>) -> Result<Program, ParseError> {
    let lexer = Lexer::new(stream
        .scan(0, |pos, c| {
            *pos += c.len_utf8() as u32;
            Some((*pos - c.len_utf8() as u32, c))
        })
    );
    let mut parser = Parser::new(lexer);

    parser.parse()
}

