pub mod config;
pub use config::EvaluationConfig;

pub mod schema;
pub use schema::{CanonicalId, ForeignKey, ForeignKeyMap, Schema, SchemaError};

pub mod parser;
pub use parser::{ParseError, SqlError, TokenizeError, ast::SqlQuery, parse_sql};

pub mod normalizer;
pub use normalizer::normalize_for_comparison;

pub mod evaluator;
pub use evaluator::{ClauseCategory, Evaluator, Hardness, PartialMatch, PartialScore};

pub mod execution;
pub use execution::{Database, DatabaseError, ExecutionChecker, MemoryDatabase, QueryResult, ResultCache};

pub mod judge;
pub use judge::{SqlJudge, TurnEvaluation};

pub mod session;
pub use session::{AggregateReport, Session, SessionError, SessionManager, SessionStatus, SessionStore, Turn};

pub mod report;
pub use report::{EvaluationReport, Interaction};
