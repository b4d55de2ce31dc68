pub mod database;
pub use database::*;

pub mod memory_database;
pub use memory_database::*;

pub mod row_order;
pub use row_order::*;

pub mod result_cache;
pub use result_cache::*;

pub mod execution_checker;
pub use execution_checker::*;
