use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::{SessionError, Turn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Complete,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStatus::InProgress => write!(f, "in progress"),
            SessionStatus::Complete => write!(f, "complete"),
        }
    }
}

/// A bounded sequence of turns. Completes, once and for good, when the
/// turn count reaches `max_turns`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub max_turns: usize,
    pub status: SessionStatus,
    pub turns: Vec<Turn>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub duration_ms: Option<i64>,
    pub total_tokens: u64,
    pub token_history: Vec<u64>,
}

impl Session {
    pub fn new(max_turns: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            max_turns,
            status: SessionStatus::InProgress,
            turns: vec![],
            created_at: Utc::now(),
            completed_at: None,
            duration_ms: None,
            total_tokens: 0,
            token_history: vec![],
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == SessionStatus::Complete
    }

    pub fn turn_count(&self) -> usize {
        self.turns.len()
    }

    pub fn next_turn_number(&self) -> usize {
        self.turns.len() + 1
    }

    pub fn final_turn(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Append `turn` and return its number, completing the session on the
    /// last allowed turn.
    pub fn push_turn(&mut self, turn: Turn) -> Result<usize, SessionError> {
        self.ensure_open()?;

        self.turns.push(turn);
        if self.turns.len() >= self.max_turns {
            let now = Utc::now();
            self.status = SessionStatus::Complete;
            self.completed_at = Some(now);
            self.duration_ms = Some((now - self.created_at).num_milliseconds());
        }

        Ok(self.turns.len())
    }

    /// Record tokens spent by the generator; returns the running total.
    pub fn add_tokens(&mut self, tokens: u64) -> u64 {
        self.total_tokens += tokens;
        self.token_history.push(tokens);
        self.total_tokens
    }

    pub fn ensure_open(&self) -> Result<(), SessionError> {
        if self.is_complete() {
            return Err(SessionError::InvalidSessionState { id: self.id, status: self.status });
        }
        Ok(())
    }
}
