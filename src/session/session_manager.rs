use std::sync::Arc;

use chrono::Utc;
use indexmap::IndexMap;
use tracing::info;
use uuid::Uuid;

use crate::{
    config::EvaluationConfig,
    judge::SqlJudge,
    session::{AggregateReport, Session, SessionError, Turn},
};

/// Owns the sessions of a run and judges every turn appended to them.
///
/// Appending takes `&mut self`; hosts sharing a manager across tasks wrap
/// it in a mutex.
pub struct SessionManager {
    judge: Arc<SqlJudge>,
    config: EvaluationConfig,
    sessions: IndexMap<Uuid, Session>,
}

impl SessionManager {
    pub fn new(judge: Arc<SqlJudge>, config: EvaluationConfig) -> Self {
        Self { judge, config, sessions: IndexMap::new() }
    }

    pub fn start_session(&mut self, max_turns: usize) -> Result<Uuid, SessionError> {
        if !self.config.accepts_max_turns(max_turns) {
            return Err(SessionError::InvalidMaxTurns {
                requested: max_turns,
                min: self.config.min_turns,
                max: self.config.max_turns_limit,
            });
        }

        let session = Session::new(max_turns);
        let id = session.id;
        self.sessions.insert(id, session);
        Ok(id)
    }

    pub fn start_default_session(&mut self) -> Result<Uuid, SessionError> {
        self.start_session(self.config.default_max_turns)
    }

    /// Judge and append a turn; returns its number. Without a gold query
    /// the turn is kept with its metrics unavailable.
    pub fn add_turn(&mut self, id: Uuid, question: &str, predicted: &str, gold: Option<&str>) -> Result<usize, SessionError> {
        let session = self.sessions.get_mut(&id).ok_or(SessionError::UnknownSession(id))?;
        session.ensure_open()?;

        let mut turn = Turn {
            number: session.next_turn_number(),
            question: question.to_string(),
            predicted_sql: predicted.to_string(),
            gold_sql: gold.map(str::to_string),
            exact_match: None,
            execution_match: None,
            clause_progress: None,
            hardness: None,
            parsing_success: false,
            timestamp: Utc::now(),
        };

        match gold {
            Some(gold) => {
                let evaluation = self.judge.evaluate(predicted, gold);
                turn.exact_match = Some(evaluation.exact_match);
                turn.execution_match = evaluation.execution_match;
                turn.clause_progress = Some(evaluation.clause_progress());
                turn.hardness = Some(evaluation.hardness);
                turn.parsing_success = evaluation.predicted_parsed;
            }
            None => turn.parsing_success = self.judge.parse(predicted).is_ok(),
        }

        let number = session.push_turn(turn)?;
        if session.is_complete() {
            info!(session_id = %id, turns = number, duration_ms = ?session.duration_ms, "session complete");
        }
        Ok(number)
    }

    /// Add generator tokens to a session; returns its running total.
    pub fn record_tokens(&mut self, id: Uuid, tokens: u64) -> Result<u64, SessionError> {
        let session = self.sessions.get_mut(&id).ok_or(SessionError::UnknownSession(id))?;
        Ok(session.add_tokens(tokens))
    }

    pub fn session(&self, id: Uuid) -> Option<&Session> {
        self.sessions.get(&id)
    }

    pub fn sessions(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values()
    }

    pub fn completed_sessions(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values().filter(|s| s.is_complete())
    }

    /// Adopt a session, e.g. one loaded from a [`crate::session::SessionStore`].
    pub fn insert_session(&mut self, session: Session) {
        self.sessions.insert(session.id, session);
    }

    pub fn remove_session(&mut self, id: Uuid) -> Option<Session> {
        self.sessions.shift_remove(&id)
    }

    pub fn report(&self) -> AggregateReport {
        AggregateReport::aggregate(self.sessions.values())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use uuid::Uuid;

    use crate::{
        config::EvaluationConfig,
        judge::SqlJudge,
        schema::Schema,
        session::{SessionError, SessionManager, SessionStatus},
    };

    fn manager() -> SessionManager {
        let schema = Schema::build([
            ("patients", vec!["subject_id", "gender", "dob"]),
            ("admissions", vec!["hadm_id", "subject_id", "admission_type"]),
        ])
        .expect("Failed to build schema");
        SessionManager::new(Arc::new(SqlJudge::new(Arc::new(schema))), EvaluationConfig::with_turns(1, 5, 3))
    }

    #[test]
    pub fn test_lifecycle() {
        let mut manager = manager();
        let id = manager.start_session(2).expect("Failed to start session");

        assert_eq!(manager.add_turn(id, "How many patients?", "SELECT count(*) FROM patients", Some("SELECT count(*) FROM patients")), Ok(1));
        assert_eq!(manager.session(id).map(|s| s.status), Some(SessionStatus::InProgress));

        assert_eq!(manager.add_turn(id, "Only women?", "SELECT count(*) FROM patients", Some("SELECT count(*) FROM patients WHERE gender = 'F'")), Ok(2));
        let session = manager.session(id).expect("Missing session");
        assert_eq!(session.status, SessionStatus::Complete);
        assert_eq!(session.turns[0].exact_match, Some(true));
        assert_eq!(session.turns[1].exact_match, Some(false));
        assert_eq!(session.turns[1].execution_match, None);

        let error = manager.add_turn(id, "And men?", "SELECT 1", None);
        assert!(matches!(error, Err(SessionError::InvalidSessionState { .. })));
        assert_eq!(manager.session(id).map(|s| s.turn_count()), Some(2));
    }

    #[test]
    pub fn test_max_turns_bounds() {
        let mut manager = manager();
        assert_eq!(
            manager.start_session(0),
            Err(SessionError::InvalidMaxTurns { requested: 0, min: 1, max: 5 })
        );
        assert!(manager.start_session(6).is_err());
        let id = manager.start_default_session().expect("Failed to start session");
        assert_eq!(manager.session(id).map(|s| s.max_turns), Some(3));
    }

    #[test]
    pub fn test_turn_without_gold_is_unavailable() {
        let mut manager = manager();
        let id = manager.start_session(1).expect("Failed to start session");
        manager.add_turn(id, "Anything?", "SELECT gender FROM patients", None).expect("Failed to add turn");

        let turn = &manager.session(id).expect("Missing session").turns[0];
        assert_eq!(turn.exact_match, None);
        assert_eq!(turn.clause_progress, None);
        assert!(turn.parsing_success);
    }

    #[test]
    pub fn test_unknown_session() {
        let mut manager = manager();
        let id = Uuid::new_v4();
        assert_eq!(manager.add_turn(id, "?", "SELECT 1", None), Err(SessionError::UnknownSession(id)));
        assert_eq!(manager.record_tokens(id, 5), Err(SessionError::UnknownSession(id)));
    }

    #[test]
    pub fn test_report_covers_completed_sessions() {
        let mut manager = manager();
        let done = manager.start_session(1).expect("Failed to start session");
        manager.start_session(2).expect("Failed to start session");
        manager
            .add_turn(done, "Genders?", "SELECT gender FROM patients", Some("SELECT gender FROM patients"))
            .expect("Failed to add turn");
        manager.record_tokens(done, 42).expect("Failed to record tokens");

        let report = manager.report();
        assert_eq!(report.completed_sessions, 1);
        assert_eq!(report.in_progress_sessions, 1);
        assert_eq!(report.final_turn.exact_match_rate, Some(1.0));
        assert_eq!(manager.completed_sessions().count(), 1);
    }
}
