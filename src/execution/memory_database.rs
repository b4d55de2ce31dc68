use std::{
    collections::HashMap,
    sync::{
        PoisonError, RwLock,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use indexmap::IndexMap;

use crate::{
    execution::{Database, DatabaseError, QueryResult},
    normalizer::normalize_for_comparison,
    schema::ForeignKey,
};

/// Database double serving registered results. Queries are looked up by
/// their normalized text.
#[derive(Debug, Default)]
pub struct MemoryDatabase {
    tables: RwLock<IndexMap<String, Vec<String>>>,
    foreign_keys: RwLock<Vec<ForeignKey>>,
    results: RwLock<HashMap<String, Result<QueryResult, DatabaseError>>>,
    latency: RwLock<Option<Duration>>,
    executions: AtomicUsize,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_table(&self, name: &str, columns: &[&str]) {
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        tables.insert(name.to_string(), columns.iter().map(|c| c.to_string()).collect());
    }

    pub fn add_foreign_key(&self, foreign_key: ForeignKey) {
        let mut foreign_keys = self.foreign_keys.write().unwrap_or_else(PoisonError::into_inner);
        foreign_keys.push(foreign_key);
    }

    pub fn add_result(&self, sql: &str, result: QueryResult) {
        let mut results = self.results.write().unwrap_or_else(PoisonError::into_inner);
        results.insert(normalize_for_comparison(sql), Ok(result));
    }

    pub fn add_failure(&self, sql: &str, error: DatabaseError) {
        let mut results = self.results.write().unwrap_or_else(PoisonError::into_inner);
        results.insert(normalize_for_comparison(sql), Err(error));
    }

    /// Simulated time every execution takes.
    pub fn set_latency(&self, latency: Option<Duration>) {
        *self.latency.write().unwrap_or_else(PoisonError::into_inner) = latency;
    }

    /// Number of `execute` calls so far.
    pub fn executions(&self) -> usize {
        self.executions.load(Ordering::SeqCst)
    }
}

impl Database for MemoryDatabase {
    fn table_columns(&self) -> Result<IndexMap<String, Vec<String>>, DatabaseError> {
        Ok(self.tables.read().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn foreign_keys(&self) -> Result<Vec<ForeignKey>, DatabaseError> {
        Ok(self.foreign_keys.read().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn execute(&self, sql: &str, timeout: Duration) -> Result<QueryResult, DatabaseError> {
        self.executions.fetch_add(1, Ordering::SeqCst);

        let latency = *self.latency.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(latency) = latency {
            if latency > timeout {
                std::thread::sleep(timeout);
                return Err(DatabaseError::Timeout(timeout));
            }
            std::thread::sleep(latency);
        }

        let results = self.results.read().unwrap_or_else(PoisonError::into_inner);
        match results.get(&normalize_for_comparison(sql)) {
            Some(result) => result.clone(),
            None => Err(DatabaseError::Rejected(format!("no result registered for '{}'", sql.trim()))),
        }
    }
}
