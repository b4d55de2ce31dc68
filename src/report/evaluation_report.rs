use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    evaluator::{ClauseCategory, Hardness, PartialScore},
    judge::{SqlJudge, TurnEvaluation},
    report::Interaction,
};

pub const TURN_LABELS: [&str; 5] = ["turn 1", "turn 2", "turn 3", "turn 4", "turn >4"];

/// Mean accuracy and recall of one clause category. Accuracy averages over
/// turns whose prediction used the clause, recall over turns whose gold did.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub accuracy: f64,
    pub recall: f64,
    pub f1: f64,
    pub accuracy_count: usize,
    pub recall_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketScores {
    pub count: usize,
    pub exact: f64,
    /// Rate over the turns that were executed.
    pub execution: f64,
    pub execution_count: usize,
    pub partial: IndexMap<ClauseCategory, CategoryScore>,
}

impl Default for BucketScores {
    fn default() -> Self {
        Self {
            count: 0,
            exact: 0.0,
            execution: 0.0,
            execution_count: 0,
            partial: ClauseCategory::ALL.into_iter().map(|c| (c, CategoryScore::default())).collect(),
        }
    }
}

impl BucketScores {
    fn add(&mut self, evaluation: &TurnEvaluation) {
        self.count += 1;
        if evaluation.exact_match {
            self.exact += 1.0;
        }
        if let Some(matched) = evaluation.execution_match {
            self.execution_count += 1;
            if matched {
                self.execution += 1.0;
            }
        }

        for (category, score) in &evaluation.partial.scores {
            let PartialScore::Scored { accuracy, recall, predicted_total, gold_total, .. } = *score else {
                continue;
            };
            let entry = self.partial.entry(*category).or_default();
            if predicted_total > 0 {
                entry.accuracy += accuracy;
                entry.accuracy_count += 1;
            }
            if gold_total > 0 {
                entry.recall += recall;
                entry.recall_count += 1;
            }
        }
    }

    /// Turn the running sums into means.
    fn finish(&mut self) {
        if self.count > 0 {
            self.exact /= self.count as f64;
        }
        if self.execution_count > 0 {
            self.execution /= self.execution_count as f64;
        }
        for score in self.partial.values_mut() {
            if score.accuracy_count > 0 {
                score.accuracy /= score.accuracy_count as f64;
            }
            if score.recall_count > 0 {
                score.recall /= score.recall_count as f64;
            }
            score.f1 = if score.accuracy + score.recall > 0.0 {
                2.0 * score.accuracy * score.recall / (score.accuracy + score.recall)
            } else {
                0.0
            };
        }
    }
}

/// Per interaction means of exact and execution matches, averaged over
/// interactions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JointScores {
    pub count: usize,
    pub exact: f64,
    pub execution: f64,
}

/// Batch evaluation over interactions, bucketed by gold hardness and by
/// turn position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub levels: IndexMap<Hardness, BucketScores>,
    pub all: BucketScores,
    pub joint_all: JointScores,
    pub turns: IndexMap<String, BucketScores>,
    pub predicted_parse_failures: usize,
    pub gold_parse_failures: usize,
    /// Turns naming a database without a judge.
    pub skipped_turns: usize,
}

impl Default for EvaluationReport {
    fn default() -> Self {
        Self {
            levels: Hardness::ALL.into_iter().map(|h| (h, BucketScores::default())).collect(),
            all: BucketScores::default(),
            joint_all: JointScores::default(),
            turns: TURN_LABELS.into_iter().map(|t| (t.to_string(), BucketScores::default())).collect(),
            predicted_parse_failures: 0,
            gold_parse_failures: 0,
            skipped_turns: 0,
        }
    }
}

impl EvaluationReport {
    /// Evaluate every turn with the judge of its database.
    pub fn evaluate(judges: &IndexMap<String, SqlJudge>, interactions: &[Interaction]) -> Self {
        let mut report = EvaluationReport::default();

        for interaction in interactions {
            let mut exact = vec![];
            let mut execution = vec![];

            for (index, turn) in interaction.turns.iter().enumerate() {
                let Some(judge) = judges.get(&turn.db) else {
                    warn!(db = %turn.db, "no judge for database, skipping turn");
                    report.skipped_turns += 1;
                    continue;
                };

                let evaluation = judge.evaluate(&turn.predicted, &turn.gold);
                report.add(index, &evaluation);
                exact.push(evaluation.exact_match);
                execution.extend(evaluation.execution_match);
            }

            report.joint_all.count += 1;
            report.joint_all.exact += mean(&exact);
            report.joint_all.execution += mean(&execution);
        }

        report.finish();
        report
    }

    pub fn level(&self, hardness: Hardness) -> Option<&BucketScores> {
        self.levels.get(&hardness)
    }

    pub fn turn(&self, index: usize) -> Option<&BucketScores> {
        self.turns.get(Self::turn_label(index))
    }

    /// Bucket label of a 0-based turn index.
    pub fn turn_label(index: usize) -> &'static str {
        TURN_LABELS[index.min(TURN_LABELS.len() - 1)]
    }

    fn add(&mut self, index: usize, evaluation: &TurnEvaluation) {
        if !evaluation.gold_parsed {
            self.gold_parse_failures += 1;
        }
        if !evaluation.predicted_parsed {
            self.predicted_parse_failures += 1;
        }

        self.levels.entry(evaluation.hardness).or_default().add(evaluation);
        self.turns.entry(Self::turn_label(index).to_string()).or_default().add(evaluation);
        self.all.add(evaluation);
    }

    fn finish(&mut self) {
        for bucket in self.levels.values_mut().chain(self.turns.values_mut()) {
            bucket.finish();
        }
        self.all.finish();
        if self.joint_all.count > 0 {
            self.joint_all.exact /= self.joint_all.count as f64;
            self.joint_all.execution /= self.joint_all.count as f64;
        }
    }
}

fn mean(values: &[bool]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().filter(|v| **v).count() as f64 / values.len() as f64
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use indexmap::IndexMap;

    use crate::{
        evaluator::{ClauseCategory, Hardness},
        judge::SqlJudge,
        report::{EvaluationReport, Interaction},
        schema::Schema,
    };

    fn judges() -> IndexMap<String, SqlJudge> {
        let schema = Schema::build([
            ("patients", vec!["subject_id", "gender", "dob"]),
            ("admissions", vec!["hadm_id", "subject_id", "admission_type"]),
        ])
        .expect("Failed to build schema");
        let mut judges = IndexMap::new();
        judges.insert("mimic".to_string(), SqlJudge::new(Arc::new(schema)));
        judges
    }

    #[test]
    pub fn test_buckets() {
        let gold = "SELECT gender FROM patients\tmimic\n\
                    SELECT gender FROM patients WHERE subject_id = 1 ORDER BY dob\tmimic\n\
                    \n\
                    SELECT hadm_id FROM admissions\tmimic\n";
        let predicted = "SELECT gender FROM patients\n\
                         SELECT gender FROM patients WHERE subject_id = 2 ORDER BY dob\n\
                         \n\
                         SELECT subject_id FROM admissions\n";
        let report = EvaluationReport::evaluate(&judges(), &Interaction::parse_pair(gold, predicted));

        assert_eq!(report.all.count, 3);
        assert!((report.all.exact - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(report.level(Hardness::Easy).map(|b| b.count), Some(2));
        assert_eq!(report.level(Hardness::Medium).map(|b| b.count), Some(1));
        assert_eq!(report.turn(0).map(|b| b.count), Some(2));
        assert_eq!(report.turn(1).map(|b| b.exact), Some(0.0));
        assert_eq!(report.joint_all.count, 2);
        assert!((report.joint_all.exact - 0.25).abs() < 1e-9);
        assert_eq!(report.all.execution_count, 0);

        let order = &report.all.partial[&ClauseCategory::Order];
        assert_eq!((order.accuracy_count, order.recall_count), (1, 1));
        assert_eq!(order.f1, 1.0);
    }

    #[test]
    pub fn test_unknown_database_is_skipped() {
        let interactions = Interaction::parse_pair("SELECT gender FROM patients\tother\n", "SELECT gender FROM patients\n");
        let report = EvaluationReport::evaluate(&judges(), &interactions);
        assert_eq!(report.skipped_turns, 1);
        assert_eq!(report.all.count, 0);
        assert_eq!(report.all.exact, 0.0);
    }

    #[test]
    pub fn test_turn_labels() {
        assert_eq!(EvaluationReport::turn_label(0), "turn 1");
        assert_eq!(EvaluationReport::turn_label(3), "turn 4");
        assert_eq!(EvaluationReport::turn_label(9), "turn >4");
    }
}
