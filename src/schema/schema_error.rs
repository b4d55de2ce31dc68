/// Errors raised while building or querying the [`Schema`](crate::schema::Schema).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("table name '{0}' collides with a reserved marker")]
    ReservedTableName(String),
    #[error("duplicate table '{0}'")]
    DuplicateTable(String),
    #[error("duplicate column '{column}' in table '{table}'")]
    DuplicateColumn { table: String, column: String },
    #[error("column '{column}' not found in table '{table}'")]
    UnresolvedColumn { table: String, column: String },
    #[error("table '{0}' not found")]
    UnresolvedTable(String),
    #[error("schema introspection failed: {0}")]
    Introspection(String),
}
