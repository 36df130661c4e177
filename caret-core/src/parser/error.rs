use thiserror::Error;

use crate::{lexer::prelude::{LexicalError, Token, TokenKind}, utils::prelude::SrcSpan};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseErrorType {
    #[error("unexpected `{token}`, expected one of: {}", .expected.join(", "))]
    UnexpectedToken {
        token: Token,
        expected: Vec<String>,
    },
    #[error("{error}")]
    LexError { error: LexicalError },
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{error} at {span}")]
pub struct ParseError {
    pub error: ParseErrorType,
    pub span: SrcSpan
}

impl ParseError {
    pub fn details(&self) -> (&'static str, Vec<String>) {
        match &self.error {
            ParseErrorType::UnexpectedToken { token, expected } => {
                let found = match token.kind() {
                    TokenKind::Number => "a Number".to_string(),
                    TokenKind::Identifier => format!("the identifier `{}`", token.as_literal()),
                    TokenKind::Eof => "the end of file".to_string(),
                    TokenKind::Keyword => format!("the keyword `{}`", token.as_literal()),
                    _ => format!("`{}`", token.as_literal())
                };

                let messages = std::iter::once(format!("Found {found}, expected one of: "))
                    .chain(expected.iter().map(|s| format!("- {s}")))
                    .collect();

                ("Not expected this", messages)
            },
            ParseErrorType::LexError { error } => error.details()
        }
    }

    /// Whether the failure came from the lexer rather than from the grammar.
    pub fn is_lexical(&self) -> bool {
        matches!(self.error, ParseErrorType::LexError { .. })
    }
}

pub fn parse_error<T>(error: ParseErrorType, span: SrcSpan) -> Result<T, ParseError> {
    Err(ParseError { error, span })
}

pub fn unexpected<T>(spanned: &(u32, Token, u32), expected: &[&str]) -> Result<T, ParseError> {
    let (start, token, end) = spanned;

    parse_error(
        ParseErrorType::UnexpectedToken {
            token: token.clone(),
            expected: expected.iter().map(|s| s.to_string()).collect(),
        },
        SrcSpan { start: *start, end: *end }
    )
}
