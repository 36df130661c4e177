use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvironmentError {
    #[error("variable `{name}` is not declared")]
    UndeclaredVariable { name: String },
    #[error("variable `{name}` is already declared in this scope")]
    DuplicateDeclaration { name: String },
}
