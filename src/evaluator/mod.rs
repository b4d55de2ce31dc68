pub mod clause_category;
pub use clause_category::*;

pub mod partial_score;
pub use partial_score::*;

pub mod keywords;
pub use keywords::*;

pub mod hardness;
pub use hardness::*;

mod matching;

pub mod evaluator;
pub use evaluator::*;
