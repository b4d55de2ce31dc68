pub mod sql_normalizer;
pub use sql_normalizer::*;
