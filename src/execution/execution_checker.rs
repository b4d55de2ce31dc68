use std::{sync::Arc, time::Duration};

use tracing::{debug, warn};

use crate::{
    config::EvaluationConfig,
    execution::{Database, QueryResult, ResultCache, RowOrder},
};

/// Compares two queries by running them and comparing their row multisets.
///
/// Any failure (rejected SQL, connection error, timeout) is a mismatch.
#[derive(Clone)]
pub struct ExecutionChecker {
    db: Arc<dyn Database>,
    cache: Arc<ResultCache>,
    timeout: Duration,
}

impl ExecutionChecker {
    pub fn new(db: Arc<dyn Database>, cache: Arc<ResultCache>, timeout: Duration) -> Self {
        Self { db, cache, timeout }
    }

    pub fn from_config(db: Arc<dyn Database>, config: &EvaluationConfig) -> Self {
        Self::new(db, Arc::new(ResultCache::from_config(config)), config.execution_timeout)
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    pub fn execution_matches(&self, predicted: &str, gold: &str) -> bool {
        let Some(predicted) = self.fetch(predicted) else {
            return false;
        };
        let Some(gold) = self.fetch(gold) else {
            return false;
        };

        if predicted.row_count() != gold.row_count() {
            debug!(predicted = predicted.row_count(), gold = gold.row_count(), "row counts differ");
            return false;
        }
        RowOrder::same_rows(&predicted.rows, &gold.rows)
    }

    /// Runs the check on the blocking pool. Each query is bounded by the
    /// configured timeout, so the whole check is bounded by twice that.
    pub async fn execution_matches_async(&self, predicted: &str, gold: &str) -> bool {
        let checker = self.clone();
        let (predicted, gold) = (predicted.to_string(), gold.to_string());
        let task = tokio::task::spawn_blocking(move || checker.execution_matches(&predicted, &gold));

        match tokio::time::timeout(self.timeout.saturating_mul(2), task).await {
            Ok(Ok(matched)) => matched,
            Ok(Err(error)) => {
                warn!(error = %error, "execution check task failed");
                false
            }
            Err(_) => {
                warn!(timeout = ?self.timeout, "execution check timed out");
                false
            }
        }
    }

    fn fetch(&self, sql: &str) -> Option<Arc<QueryResult>> {
        let statement = sql.trim().trim_end_matches(|c: char| c == ';' || c.is_whitespace());
        if statement.is_empty() {
            return None;
        }

        if let Some(result) = self.cache.get(statement) {
            debug!(sql = %statement, "result cache hit");
            return Some(result);
        }
        debug!(sql = %statement, "result cache miss");

        match self.db.execute(statement, self.timeout) {
            Ok(result) => Some(self.cache.insert(statement, result)),
            Err(error) => {
                warn!(sql = %statement, error = %error, "query execution failed");
                None
            }
        }
    }
}
