use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::evaluator::ClauseCategory;

/// Score of one clause category. `NotUsed` means neither query has the
/// clause; it is left out of every aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PartialScore {
    NotUsed,
    Scored {
        accuracy: f64,
        recall: f64,
        f1: f64,
        predicted_total: usize,
        gold_total: usize,
    },
}

impl PartialScore {
    /// Binary scoring over match counts: full credit only when both sides
    /// have the same number of units and every predicted unit matched.
    pub fn from_counts(gold_total: usize, predicted_total: usize, matched: usize) -> Self {
        if gold_total == 0 && predicted_total == 0 {
            return PartialScore::NotUsed;
        }
        let value = if predicted_total == gold_total && matched == predicted_total { 1.0 } else { 0.0 };
        Self::scored(value, predicted_total, gold_total)
    }

    /// A clause that both sides leave empty but which still counts.
    pub fn both_empty() -> Self {
        Self::scored(1.0, 0, 0)
    }

    fn scored(value: f64, predicted_total: usize, gold_total: usize) -> Self {
        PartialScore::Scored { accuracy: value, recall: value, f1: value, predicted_total, gold_total }
    }

    pub fn is_used(&self) -> bool {
        matches!(self, PartialScore::Scored { .. })
    }

    pub fn accuracy(&self) -> Option<f64> {
        match self {
            PartialScore::Scored { accuracy, .. } => Some(*accuracy),
            PartialScore::NotUsed => None,
        }
    }

    pub fn recall(&self) -> Option<f64> {
        match self {
            PartialScore::Scored { recall, .. } => Some(*recall),
            PartialScore::NotUsed => None,
        }
    }

    pub fn f1(&self) -> Option<f64> {
        match self {
            PartialScore::Scored { f1, .. } => Some(*f1),
            PartialScore::NotUsed => None,
        }
    }
}

/// Per-category scores of one predicted/gold comparison, in the fixed
/// category order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialMatch {
    pub scores: IndexMap<ClauseCategory, PartialScore>,
}

impl PartialMatch {
    pub fn get(&self, category: ClauseCategory) -> PartialScore {
        self.scores.get(&category).copied().unwrap_or(PartialScore::NotUsed)
    }

    pub fn insert(&mut self, category: ClauseCategory, score: PartialScore) {
        self.scores.insert(category, score);
    }

    /// Every used category scored a full F1.
    pub fn is_exact(&self) -> bool {
        !self.scores.is_empty() && self.scores.values().filter_map(PartialScore::f1).all(|f1| f1 >= 1.0)
    }

    /// Mean F1 over the used categories.
    pub fn mean_f1(&self) -> Option<f64> {
        let values: Vec<f64> = self.scores.values().filter_map(PartialScore::f1).collect();
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }

    /// F1 of each used category.
    pub fn progress(&self) -> IndexMap<ClauseCategory, f64> {
        self.scores
            .iter()
            .filter_map(|(category, score)| score.f1().map(|f1| (*category, f1)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::evaluator::{ClauseCategory, PartialMatch, PartialScore};

    #[test]
    pub fn test_from_counts_is_binary() {
        assert_eq!(PartialScore::from_counts(0, 0, 0), PartialScore::NotUsed);
        assert_eq!(PartialScore::from_counts(2, 3, 2).f1(), Some(0.0));
        assert_eq!(PartialScore::from_counts(3, 3, 2).f1(), Some(0.0));
        assert_eq!(PartialScore::from_counts(3, 3, 3).f1(), Some(1.0));
        assert_eq!(PartialScore::from_counts(1, 0, 0).recall(), Some(0.0));
    }

    #[test]
    pub fn test_not_used_is_ignored() {
        let mut partial = PartialMatch::default();
        partial.insert(ClauseCategory::Select, PartialScore::from_counts(1, 1, 1));
        partial.insert(ClauseCategory::Order, PartialScore::NotUsed);
        assert!(partial.is_exact());
        assert_eq!(partial.mean_f1(), Some(1.0));
        assert_eq!(partial.progress().len(), 1);

        partial.insert(ClauseCategory::Where, PartialScore::from_counts(1, 1, 0));
        assert!(!partial.is_exact());
        assert_eq!(partial.mean_f1(), Some(0.5));
    }

    #[test]
    pub fn test_empty_match_is_not_exact() {
        assert!(!PartialMatch::default().is_exact());
        assert_eq!(PartialMatch::default().mean_f1(), None);
    }

    #[test]
    pub fn test_serialization_keeps_category_labels() {
        let mut partial = PartialMatch::default();
        partial.insert(ClauseCategory::AndOr, PartialScore::NotUsed);
        let json = serde_json::to_value(&partial).expect("Failed to serialize");
        assert_eq!(json["scores"]["and/or"]["status"], "not_used");
    }
}
