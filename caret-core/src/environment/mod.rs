pub mod environment;
pub mod error;
pub mod value;

pub mod prelude {
    pub use super::{
        environment::*,
        error::*,
        value::*
    };
}

#[cfg(test)]
mod tests;
