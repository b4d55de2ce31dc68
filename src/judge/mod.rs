pub mod turn_evaluation;
pub use turn_evaluation::*;

pub mod sql_judge;
pub use sql_judge::*;
