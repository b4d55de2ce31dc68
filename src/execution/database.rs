use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::ForeignKey;

/// Ordered column names and rows of one executed query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl QueryResult {
    pub fn new(columns: &[&str], rows: Vec<Vec<Value>>) -> Self {
        Self { columns: columns.iter().map(|c| c.to_string()).collect(), rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DatabaseError {
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("query rejected: {0}")]
    Rejected(String),
    #[error("query timed out after {0:?}")]
    Timeout(Duration),
    #[error("schema introspection failed: {0}")]
    Introspection(String),
}

/// Read-only access to the database the queries run against.
pub trait Database: Send + Sync {
    /// Table name -> column names, in declaration order.
    fn table_columns(&self) -> Result<IndexMap<String, Vec<String>>, DatabaseError>;

    fn foreign_keys(&self) -> Result<Vec<ForeignKey>, DatabaseError> {
        Ok(vec![])
    }

    /// Run one query; implementations must give up after `timeout`.
    fn execute(&self, sql: &str, timeout: Duration) -> Result<QueryResult, DatabaseError>;
}
