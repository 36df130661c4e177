use std::fmt::Display;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // [a-zA-Z_][a-zA-Z0-9_]*
    Ident(String),
    // digits [. digits]
    Number(f64),

    // Keywords
    Let, // let
    Routine, // routine
    Return, // return
    For, // for

    // Operators
    Plus, // +
    Minus, // -
    Mult, // *
    Div, // /
    LessThan, // <
    GreaterThan, // >
    LessThanOrEqual, // <=
    GreaterThanOrEqual, // >=
    Assign, // =

    // Delimiters
    Semicolon, // ;
    Caret, // ^
    LSBracket, // [
    RSBracket, // ]
    Comma, // ,

    Eof,
}

/// Coarse classification of a token, the `kind` half of the `{kind, text}` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Number,
    Identifier,
    Keyword,
    Operator,
    Delimiter,
    BlockDelimiter,
    ArgStart,
    ArgEnd,
    Comma,
    Eof,
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Ident(_) => TokenKind::Identifier,
            Token::Number(_) => TokenKind::Number,
            Token::Let
            | Token::Routine
            | Token::Return
            | Token::For => TokenKind::Keyword,
            Token::Plus
            | Token::Minus
            | Token::Mult
            | Token::Div
            | Token::LessThan
            | Token::GreaterThan
            | Token::LessThanOrEqual
            | Token::GreaterThanOrEqual
            | Token::Assign => TokenKind::Operator,
            Token::Semicolon => TokenKind::Delimiter,
            Token::Caret => TokenKind::BlockDelimiter,
            Token::LSBracket => TokenKind::ArgStart,
            Token::RSBracket => TokenKind::ArgEnd,
            Token::Comma => TokenKind::Comma,
            Token::Eof => TokenKind::Eof,
        }
    }

    pub fn is_reserved_word(&self) -> bool {
        self.kind() == TokenKind::Keyword
    }

    pub fn is_operator(&self) -> bool {
        self.kind() == TokenKind::Operator
    }

    /// Operators accepted between two terms of an expression.
    pub fn is_additive(&self) -> bool {
        matches!(
            self,
            Token::Plus
            | Token::Minus
            | Token::LessThan
            | Token::GreaterThan
            | Token::LessThanOrEqual
            | Token::GreaterThanOrEqual
        )
    }

    /// Operators accepted between two factors of a term.
    pub fn is_multiplicative(&self) -> bool {
        matches!(self, Token::Mult | Token::Div)
    }

    pub fn as_literal(&self) -> String {
        match self {
            Token::Ident(value) => value.clone(),
            Token::Number(value) => format!("{}", value),

            Token::Let => "let".to_string(),
            Token::Routine => "routine".to_string(),
            Token::Return => "return".to_string(),
            Token::For => "for".to_string(),

            Token::Plus => "+".to_string(),
            Token::Minus => "-".to_string(),
            Token::Mult => "*".to_string(),
            Token::Div => "/".to_string(),
            Token::LessThan => "<".to_string(),
            Token::GreaterThan => ">".to_string(),
            Token::LessThanOrEqual => "<=".to_string(),
            Token::GreaterThanOrEqual => ">=".to_string(),
            Token::Assign => "=".to_string(),

            Token::Semicolon => ";".to_string(),
            Token::Caret => "^".to_string(),
            Token::LSBracket => "[".to_string(),
            Token::RSBracket => "]".to_string(),
            Token::Comma => ",".to_string(),

            Token::Eof => "end of file".to_string(),
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_literal())
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            TokenKind::Number => "NUMBER",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Keyword => "KEYWORD",
            TokenKind::Operator => "OPERATOR",
            TokenKind::Delimiter => "DELIMITER",
            TokenKind::BlockDelimiter => "BLOCK_DELIMITER",
            TokenKind::ArgStart => "ARG_START",
            TokenKind::ArgEnd => "ARG_END",
            TokenKind::Comma => "COMMA",
            TokenKind::Eof => "EOF",
        };

        write!(f, "{kind}")
    }
}
