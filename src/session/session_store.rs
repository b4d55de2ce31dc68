use std::{
    fs,
    io::{BufWriter, Write},
    path::Path,
};

use crate::session::{Session, StoreError};

/// JSON persistence of sessions.
pub struct SessionStore;

impl SessionStore {
    pub fn save<'a>(path: &Path, sessions: impl IntoIterator<Item = &'a Session>) -> Result<(), StoreError> {
        let display = path.display().to_string();
        let file = fs::File::create(path).map_err(|source| StoreError::Io { path: display.clone(), source })?;
        let mut writer = BufWriter::new(file);

        let sessions: Vec<&Session> = sessions.into_iter().collect();
        serde_json::to_writer_pretty(&mut writer, &sessions)
            .map_err(|source| StoreError::Format { path: display.clone(), source })?;
        writer.flush().map_err(|source| StoreError::Io { path: display, source })
    }

    pub fn load(path: &Path) -> Result<Vec<Session>, StoreError> {
        let display = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|source| StoreError::Io { path: display.clone(), source })?;
        serde_json::from_str(&content).map_err(|source| StoreError::Format { path: display, source })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tempfile::TempDir;

    use crate::session::{Session, SessionStore, StoreError, Turn};

    #[test]
    pub fn test_save_and_load() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("sessions.json");

        let mut session = Session::new(1);
        session.add_tokens(17);
        session
            .push_turn(Turn {
                number: 1,
                question: "How many patients?".to_string(),
                predicted_sql: "SELECT count(*) FROM patients".to_string(),
                gold_sql: Some("SELECT count(*) FROM patients".to_string()),
                exact_match: Some(true),
                execution_match: None,
                clause_progress: None,
                hardness: None,
                parsing_success: true,
                timestamp: Utc::now(),
            })
            .expect("Failed to add turn");

        SessionStore::save(&path, [&session]).expect("Failed to save sessions");
        let loaded = SessionStore::load(&path).expect("Failed to load sessions");
        assert_eq!(loaded, vec![session]);
    }

    #[test]
    pub fn test_load_errors() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let missing = dir.path().join("missing.json");
        assert!(matches!(SessionStore::load(&missing), Err(StoreError::Io { .. })));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").expect("Failed to write file");
        assert!(matches!(SessionStore::load(&broken), Err(StoreError::Format { .. })));
    }
}
