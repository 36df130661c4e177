use thiserror::Error;

use crate::utils::prelude::SrcSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LexicalErrorType {
    #[error("unrecognized character `{ch}`")]
    UnrecognizedCharacter { ch: char },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{error} at {location}")]
pub struct LexicalError {
    pub error: LexicalErrorType,
    pub location: SrcSpan
}

impl LexicalError {
    pub fn details(&self) -> (&'static str, Vec<String>) {
        match self.error {
            LexicalErrorType::UnrecognizedCharacter { ch } => {
                ("Unrecognized character", vec![format!("`{}` does not start any token", ch.escape_debug())])
            }
        }
    }
}
