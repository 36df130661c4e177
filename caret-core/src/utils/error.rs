use std::path::{Path, PathBuf};

use termcolor::Buffer;
use thiserror::Error;

use crate::{
    eval::prelude::RuntimeError,
    lexer::prelude::LexicalError,
    parser::prelude::{ParseError, ParseErrorType},
};
use super::{
    diagnostic::{Diagnostic, Label, Location},
    src_span::SrcSpan
};

/// Failure of any pipeline stage, carrying what is needed to render it.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("failed to tokenize source code")]
    Lex {
        path: PathBuf,
        src: String,
        error: LexicalError
    },
    #[error("failed to parse source code")]
    Parse {
        path: PathBuf,
        src: String,
        error: ParseError
    },
    #[error("program failed at runtime")]
    Runtime {
        path: PathBuf,
        src: String,
        error: RuntimeError
    },
    #[error("IO operation failed")]
    StdIo {
        path: PathBuf,
        err: std::io::ErrorKind
    }
}

impl Error {
    /// Splits a lexical failure out of a parse failure.
    pub fn from_parse(path: PathBuf, src: String, error: ParseError) -> Self {
        match error.error {
            ParseErrorType::LexError { error } => Error::Lex { path, src, error },
            _ => Error::Parse { path, src, error }
        }
    }

    pub fn pretty_string(&self) -> String {
        let mut nocolor = Buffer::no_color();

        if let Err(err) = self.pretty(&mut nocolor) {
            return format!("{self}: {err}");
        }

        String::from_utf8_lossy(&nocolor.into_inner()).into_owned()
    }

    pub fn pretty(&self, buf: &mut Buffer) -> std::io::Result<()> {
        use std::io::Write;

        for diagnostic in self.to_diagnostics() {
            diagnostic.write(buf)?;
            writeln!(buf)?;
        }

        Ok(())
    }

    pub fn to_diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            Error::Lex { path, src, error } => {
                let (label, extra) = error.details();

                vec![located("Syntax error", extra.join("\n"), src, path, label, error.location)]
            },
            Error::Parse { path, src, error } => {
                let (label, extra) = error.details();

                vec![located("Syntax error", extra.join("\n"), src, path, label, error.span)]
            },
            Error::Runtime { path, src, error } => {
                let (title, extra) = error.details();
                let label = error.error.to_string();

                vec![located(title, extra.join("\n"), src, path, &label, error.location)]
            },
            Error::StdIo { path, err } => {
                vec![Diagnostic {
                    title: "Standard IO error".into(),
                    text: format!("Could not read `{}`: {err}", path.display()),
                    location: None,
                }]
            }
        }
    }
}

fn located<'a>(
    title: &str,
    text: String,
    src: &'a str,
    path: &Path,
    label: &str,
    span: SrcSpan
) -> Diagnostic<'a> {
    Diagnostic {
        title: title.into(),
        text,
        location: Some(Location {
            src,
            path: path.to_path_buf(),
            label: Label {
                text: Some(label.to_string()),
                span,
            },
            extra_labels: vec![],
        }),
    }
}
