use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::evaluator::{ClauseCategory, Hardness, PartialMatch};

/// Verdicts for one predicted/gold pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnEvaluation {
    pub partial: PartialMatch,
    pub exact_match: bool,
    /// `None` when no database is attached.
    pub execution_match: Option<bool>,
    /// Hardness of the gold query.
    pub hardness: Hardness,
    pub predicted_parsed: bool,
    pub gold_parsed: bool,
}

impl TurnEvaluation {
    pub fn clause_progress(&self) -> IndexMap<ClauseCategory, f64> {
        self.partial.progress()
    }
}
