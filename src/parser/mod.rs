pub mod token;
pub use token::*;

pub mod keywords;
pub use keywords::*;

pub mod tokenizer;
pub use tokenizer::*;

pub mod parse_error;
pub use parse_error::*;

pub mod alias_map;
pub use alias_map::*;

pub mod query_parser;
pub use query_parser::*;

pub mod column_resolver;
pub use column_resolver::*;

pub mod ast;

pub mod sql_parser;
pub use sql_parser::*;
