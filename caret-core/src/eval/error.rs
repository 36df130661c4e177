use thiserror::Error;

use crate::{
    environment::prelude::{EnvironmentError, ValueType},
    lexer::prelude::Token,
    utils::prelude::SrcSpan
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeErrorType {
    #[error("variable `{name}` is not declared")]
    UndeclaredVariable { name: String },
    #[error("variable `{name}` is already declared in this scope")]
    DuplicateDeclaration { name: String },
    #[error("`{name}` is not a routine")]
    UndefinedRoutine { name: String },
    #[error("unknown operator `{operator}`")]
    UnknownOperator { operator: Token },
    #[error("`return` outside of a routine")]
    ReturnOutsideRoutine,
    #[error("operator `{operator}` expects a Number, got {value_type}")]
    InvalidOperand {
        operator: Token,
        value_type: ValueType,
    },
}

impl From<EnvironmentError> for RuntimeErrorType {
    fn from(value: EnvironmentError) -> Self {
        match value {
            EnvironmentError::UndeclaredVariable { name } => Self::UndeclaredVariable { name },
            EnvironmentError::DuplicateDeclaration { name } => Self::DuplicateDeclaration { name },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{error} at {location}")]
pub struct RuntimeError {
    pub error: RuntimeErrorType,
    pub location: SrcSpan
}

impl RuntimeError {
    pub fn new(error: impl Into<RuntimeErrorType>, location: SrcSpan) -> Self {
        Self {
            error: error.into(),
            location
        }
    }

    pub fn details(&self) -> (&'static str, Vec<String>) {
        match &self.error {
            RuntimeErrorType::UndeclaredVariable { name } => (
                "Variable not declared",
                vec![format!("Variable `{name}` is not declared in this scope or any enclosing one.")]
            ),
            RuntimeErrorType::DuplicateDeclaration { name } => (
                "Multiple declarations",
                vec![format!("Variable `{name}` was declared multiple times in the same scope.")]
            ),
            RuntimeErrorType::UndefinedRoutine { name } => (
                "Undefined routine",
                vec![format!("`{name}` does not name a routine.")]
            ),
            RuntimeErrorType::UnknownOperator { operator } => (
                "Unknown operator",
                vec![format!("`{operator}` is not a binary operator.")]
            ),
            RuntimeErrorType::ReturnOutsideRoutine => (
                "Return outside of routine",
                vec!["`return` is only allowed inside a routine body.".to_string()]
            ),
            RuntimeErrorType::InvalidOperand { operator, value_type } => (
                "Invalid operand",
                vec![format!("`{operator}` expects a Number, but got `{value_type}`")]
            ),
        }
    }
}
