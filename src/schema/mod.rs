pub mod canonical_id;
pub use canonical_id::*;

pub mod schema_error;
pub use schema_error::*;

pub mod schema_registry;
pub use schema_registry::*;

pub mod foreign_key_map;
pub use foreign_key_map::*;

pub mod ddl_loader;
