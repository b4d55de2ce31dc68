use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::evaluator::{ClauseCategory, Hardness};

/// One question/answer exchange of a session. Metrics are `None` when the
/// turn had no gold query to compare against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// 1-based position in the session.
    pub number: usize,
    pub question: String,
    pub predicted_sql: String,
    pub gold_sql: Option<String>,
    pub exact_match: Option<bool>,
    pub execution_match: Option<bool>,
    pub clause_progress: Option<IndexMap<ClauseCategory, f64>>,
    pub hardness: Option<Hardness>,
    /// Whether the predicted query parsed.
    pub parsing_success: bool,
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    pub fn has_gold(&self) -> bool {
        self.gold_sql.is_some()
    }

    /// Mean F1 over the used clause categories.
    pub fn mean_progress(&self) -> Option<f64> {
        let progress = self.clause_progress.as_ref()?;
        if progress.is_empty() {
            return None;
        }
        Some(progress.values().sum::<f64>() / progress.len() as f64)
    }
}
