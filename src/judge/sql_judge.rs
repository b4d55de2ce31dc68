use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    config::EvaluationConfig,
    evaluator::Evaluator,
    execution::{Database, ExecutionChecker},
    judge::TurnEvaluation,
    normalizer::normalize_for_comparison,
    parser::{SqlError, ast::SqlQuery, parse_sql},
    schema::{ForeignKeyMap, Schema, SchemaError},
};

/// Runs the whole comparison of a predicted query against a gold query:
/// normalization, parsing, foreign-key rewrite, clause scores, hardness and
/// (when a database is attached) execution.
///
/// A side that fails to parse is replaced by an empty query, so it scores
/// as a mismatch instead of aborting the comparison.
pub struct SqlJudge {
    schema: Arc<Schema>,
    foreign_keys: ForeignKeyMap,
    checker: Option<ExecutionChecker>,
}

impl SqlJudge {
    pub fn new(schema: Arc<Schema>) -> Self {
        Self { schema, foreign_keys: ForeignKeyMap::default(), checker: None }
    }

    pub fn with_foreign_keys(mut self, foreign_keys: ForeignKeyMap) -> Self {
        self.foreign_keys = foreign_keys;
        self
    }

    pub fn with_execution(mut self, checker: ExecutionChecker) -> Self {
        self.checker = Some(checker);
        self
    }

    /// Schema, foreign keys and execution all come from `db`.
    pub fn from_database(db: Arc<dyn Database>, config: &EvaluationConfig) -> Result<Self, SchemaError> {
        let schema = Schema::from_database(db.as_ref())?;
        let foreign_keys = db
            .foreign_keys()
            .map_err(|e| SchemaError::Introspection(e.to_string()))?;
        let foreign_keys = ForeignKeyMap::build(&schema, &foreign_keys)?;

        Ok(Self::new(Arc::new(schema))
            .with_foreign_keys(foreign_keys)
            .with_execution(ExecutionChecker::from_config(db, config)))
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn checker(&self) -> Option<&ExecutionChecker> {
        self.checker.as_ref()
    }

    /// Normalize, parse and rewrite linked columns.
    pub fn parse(&self, sql: &str) -> Result<SqlQuery, SqlError> {
        let mut query = parse_sql(&normalize_for_comparison(sql), &self.schema)?;
        self.foreign_keys.canonicalize(&mut query);
        Ok(query)
    }

    pub fn evaluate(&self, predicted: &str, gold: &str) -> TurnEvaluation {
        let (gold_query, gold_parsed) = match self.parse(gold) {
            Ok(query) => (query, true),
            Err(error) => {
                warn!(sql = %gold, error = %error, "gold query failed to parse");
                (SqlQuery::default(), false)
            }
        };
        let (predicted_query, predicted_parsed) = match self.parse(predicted) {
            Ok(query) => (query, true),
            Err(error) => {
                debug!(sql = %predicted, error = %error, "predicted query failed to parse");
                (SqlQuery::default(), false)
            }
        };

        let partial = Evaluator::partial_match(&predicted_query, &gold_query);
        let exact_match = partial.is_exact();
        let hardness = Evaluator::hardness(&gold_query);
        let execution_match = self
            .checker
            .as_ref()
            .map(|checker| checker.execution_matches(predicted, gold));

        TurnEvaluation { partial, exact_match, execution_match, hardness, predicted_parsed, gold_parsed }
    }
}
