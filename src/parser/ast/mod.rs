pub mod operators;
pub use operators::*;

pub mod literal;
pub use literal::*;

pub mod column_unit;
pub use column_unit::*;

pub mod value_unit;
pub use value_unit::*;

pub mod operand;
pub use operand::*;

pub mod condition;
pub use condition::*;

pub mod from_clause;
pub use from_clause::*;

pub mod select;
pub use select::*;

pub mod group_by;
pub use group_by::*;

pub mod order_by;
pub use order_by::*;

pub mod limit_parser;
pub use limit_parser::*;

pub mod query;
pub use query::*;
