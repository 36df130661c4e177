pub mod profiler;

pub mod prelude {
    pub use super::profiler::*;
}

#[cfg(test)]
mod tests;
