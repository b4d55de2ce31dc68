use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    evaluator::ClauseCategory,
    session::{Session, Turn},
};

/// Means over a set of turns. Turns without a gold query, and clause
/// categories neither side used, are left out of the means.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnMetrics {
    pub turns: usize,
    pub exact_match_rate: Option<f64>,
    pub execution_match_rate: Option<f64>,
    pub clause_progress: IndexMap<ClauseCategory, f64>,
    pub mean_progress: Option<f64>,
}

/// Per turn index metrics over completed sessions, plus the final turn of
/// each session as the headline slice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateReport {
    pub completed_sessions: usize,
    pub in_progress_sessions: usize,
    /// Keyed by 1-based turn number.
    pub per_turn: IndexMap<usize, TurnMetrics>,
    pub final_turn: TurnMetrics,
}

#[derive(Default)]
struct MetricsAccumulator {
    turns: usize,
    exact: Vec<bool>,
    execution: Vec<bool>,
    clauses: IndexMap<ClauseCategory, Vec<f64>>,
    progress: Vec<f64>,
}

impl MetricsAccumulator {
    fn add(&mut self, turn: &Turn) {
        self.turns += 1;
        self.exact.extend(turn.exact_match);
        self.execution.extend(turn.execution_match);
        if let Some(progress) = &turn.clause_progress {
            for (category, f1) in progress {
                self.clauses.entry(*category).or_default().push(*f1);
            }
        }
        self.progress.extend(turn.mean_progress());
    }

    fn finish(self) -> TurnMetrics {
        let clause_progress: IndexMap<ClauseCategory, f64> = ClauseCategory::ALL
            .iter()
            .filter_map(|category| {
                let values = self.clauses.get(category)?;
                mean(values).map(|value| (*category, value))
            })
            .collect();

        TurnMetrics {
            turns: self.turns,
            exact_match_rate: rate(&self.exact),
            execution_match_rate: rate(&self.execution),
            clause_progress,
            mean_progress: mean(&self.progress),
        }
    }
}

fn rate(values: &[bool]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().filter(|v| **v).count() as f64 / values.len() as f64)
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

impl AggregateReport {
    pub fn aggregate<'a>(sessions: impl IntoIterator<Item = &'a Session>) -> Self {
        let mut report = AggregateReport::default();
        let mut per_turn: IndexMap<usize, MetricsAccumulator> = IndexMap::new();
        let mut final_turn = MetricsAccumulator::default();

        for session in sessions {
            if !session.is_complete() {
                report.in_progress_sessions += 1;
                continue;
            }
            report.completed_sessions += 1;

            for (index, turn) in session.turns.iter().enumerate() {
                per_turn.entry(index + 1).or_default().add(turn);
            }
            if let Some(turn) = session.final_turn() {
                final_turn.add(turn);
            }
        }

        per_turn.sort_keys();
        report.per_turn = per_turn.into_iter().map(|(number, metrics)| (number, metrics.finish())).collect();
        report.final_turn = final_turn.finish();
        report
    }
}
