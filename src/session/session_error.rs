use uuid::Uuid;

use crate::session::SessionStatus;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error("session {id} is {status}; start a new session")]
    InvalidSessionState { id: Uuid, status: SessionStatus },
    #[error("max turns {requested} is outside {min}..={max}")]
    InvalidMaxTurns { requested: usize, min: usize, max: usize },
    #[error("unknown session {0}")]
    UnknownSession(Uuid),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not access session file {path}: {source}")]
    Io { path: String, source: std::io::Error },
    #[error("session file {path} is not valid: {source}")]
    Format { path: String, source: serde_json::Error },
}
