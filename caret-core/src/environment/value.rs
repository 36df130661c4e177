use std::{fmt::Display, rc::Rc};

use crate::parser::prelude::Statement;

use super::environment::FrameId;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number {
        value: f64
    },
    Boolean {
        value: bool
    },
    Routine(Routine),
    /// Result of a routine that finished without `return`.
    Nothing,
}

/// A routine together with the frame it was declared in.
#[derive(Debug, Clone, PartialEq)]
pub struct Routine {
    pub name: String,
    pub params: Rc<[String]>,
    pub body: Rc<[Statement]>,
    pub env: FrameId,
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number { value } => write!(f, "{value}"),
            Value::Boolean { value } => write!(f, "{value}"),
            Value::Routine(routine) => write!(f, "<routine {}[{}]>", routine.name, routine.params.join(", ")),
            Value::Nothing => write!(f, "nothing")
        }
    }
}

impl Value {
    pub fn _type(&self) -> ValueType {
        match self {
            Self::Number { .. } => ValueType::Number,
            Self::Boolean { .. } => ValueType::Boolean,
            Self::Routine(_) => ValueType::Routine,
            Self::Nothing => ValueType::Nothing
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Number { value } => *value != 0.0 && !value.is_nan(),
            Self::Boolean { value } => *value,
            Self::Routine(_) => true,
            Self::Nothing => false
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number { value } => Some(*value),
            _ => None
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number { value }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean { value }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Number,
    Boolean,
    Routine,
    Nothing
}

impl Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Number => "Number",
            Self::Boolean => "Boolean",
            Self::Routine => "Routine",
            Self::Nothing => "Nothing"
        };

        write!(f, "{name}")
    }
}
