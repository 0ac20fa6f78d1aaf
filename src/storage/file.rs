//! File-based storage backend.

use crate::core::session::{Session, SessionStatus};
use crate::error::{Error, Result};
use crate::storage::traits::{SessionStore, SessionSummary};
use std::fs;
use std::io;
use std::path::PathBuf;

/// File-based storage backend with atomic writes.
///
/// One JSON document per session under `<base>/sessions/`.
#[derive(Debug)]
pub struct FileBackend {
    base_dir: PathBuf,
}

impl FileBackend {
    /// Create a new file backend.
    ///
    /// Creates the sessions directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the sessions directory cannot be created.
    pub fn new(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(base_dir.join("sessions")).map_err(classify_io)?;
        Ok(Self { base_dir })
    }

    /// Get the path to a session file.
    fn session_path(&self, session_id: &str) -> PathBuf {
        self.base_dir
            .join("sessions")
            .join(format!("{session_id}.json"))
    }

    /// Load every parseable session document, skipping stray and corrupted
    /// files so one bad write cannot take down listings or analytics.
    fn scan_sessions(&self) -> Result<Vec<Session>> {
        let sessions_dir = self.base_dir.join("sessions");
        let mut sessions = Vec::new();

        if !sessions_dir.exists() {
            return Ok(sessions);
        }

        for entry in fs::read_dir(&sessions_dir).map_err(classify_io)? {
            let entry = entry.map_err(classify_io)?;
            let path = entry.path();

            // Only process .json files (skip .tmp files)
            if path.extension().is_some_and(|e| e == "json") {
                if let Ok(contents) = fs::read_to_string(&path) {
                    if let Ok(session) = serde_json::from_str::<Session>(&contents) {
                        sessions.push(session);
                    }
                }
            }
        }

        Ok(sessions)
    }
}

impl SessionStore for FileBackend {
    fn get_session(&self, session_id: &str) -> Result<Option<Session>> {
        let path = self.session_path(session_id);
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path).map_err(classify_io)?;
        let session: Session = serde_json::from_str(&contents)?;
        Ok(Some(session))
    }

    fn put_session(&self, session: &Session) -> Result<()> {
        let path = self.session_path(&session.session_id);
        let temp = path.with_extension("tmp");

        // Write to temp file first
        let contents = serde_json::to_string_pretty(session)?;
        fs::write(&temp, &contents).map_err(classify_io)?;

        // Atomic rename - prevents corruption if process crashes mid-write
        fs::rename(&temp, &path).map_err(classify_io)?;

        Ok(())
    }

    fn find_active_session(&self, player_id: &str) -> Result<Option<Session>> {
        Ok(self
            .scan_sessions()?
            .into_iter()
            .filter(|s| s.player_id == player_id && s.status == SessionStatus::Active)
            .max_by_key(|s| s.start_time))
    }

    fn latest_session(&self, player_id: &str) -> Result<Option<Session>> {
        Ok(self
            .scan_sessions()?
            .into_iter()
            .filter(|s| s.player_id == player_id)
            .max_by_key(|s| s.start_time))
    }

    fn count_active_sessions(&self, player_id: &str) -> Result<usize> {
        Ok(self
            .scan_sessions()?
            .iter()
            .filter(|s| s.player_id == player_id && s.status == SessionStatus::Active)
            .count())
    }

    fn list_sessions(&self, limit: usize) -> Result<Vec<SessionSummary>> {
        let mut summaries: Vec<SessionSummary> = self
            .scan_sessions()?
            .iter()
            .map(SessionSummary::from)
            .collect();

        // Sort by start_time descending (most recent first)
        summaries.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        summaries.truncate(limit);
        Ok(summaries)
    }

    fn all_sessions(&self) -> Result<Vec<Session>> {
        self.scan_sessions()
    }

    fn delete_session(&self, session_id: &str) -> Result<()> {
        let path = self.session_path(session_id);
        if path.exists() {
            fs::remove_file(&path).map_err(classify_io)?;
        }
        Ok(())
    }
}

/// Classify an I/O failure: timeouts surface as retryable
/// [`Error::TransientStore`], everything else as [`Error::Storage`].
fn classify_io(err: io::Error) -> Error {
    match err.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted => {
            Error::TransientStore(err.to_string())
        }
        _ => Error::Storage(err),
    }
}

/// Get the default shortlist home directory.
///
/// Uses `SHORTLIST_HOME` environment variable if set, otherwise `~/.shortlist`.
#[must_use]
pub fn get_shortlist_home() -> PathBuf {
    if let Ok(home) = std::env::var("SHORTLIST_HOME") {
        PathBuf::from(home)
    } else if let Some(home) = dirs::home_dir() {
        home.join(".shortlist")
    } else {
        PathBuf::from(".shortlist")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::DEFAULT_MAX_ROUNDS;
    use tempfile::TempDir;

    fn create_test_backend() -> (FileBackend, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let backend = FileBackend::new(temp_dir.path().to_path_buf()).unwrap();
        (backend, temp_dir)
    }

    #[test]
    fn creates_sessions_directory() {
        let temp_dir = TempDir::new().unwrap();
        let _backend = FileBackend::new(temp_dir.path().to_path_buf()).unwrap();
        assert!(temp_dir.path().join("sessions").exists());
    }

    #[test]
    fn get_missing_session() {
        let (store, _temp) = create_test_backend();
        let result = store.get_session("nonexistent").unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn put_and_get_session() {
        let (store, _temp) = create_test_backend();
        let session = Session::new("p1", DEFAULT_MAX_ROUNDS);

        store.put_session(&session).unwrap();

        let retrieved = store.get_session(&session.session_id).unwrap().unwrap();
        assert_eq!(retrieved.session_id, session.session_id);
        assert_eq!(retrieved.max_rounds, DEFAULT_MAX_ROUNDS);
    }

    #[test]
    fn atomic_write_creates_no_temp_file() {
        let (store, temp_dir) = create_test_backend();
        let session = Session::new("p1", DEFAULT_MAX_ROUNDS);

        store.put_session(&session).unwrap();

        let temp_path = temp_dir
            .path()
            .join("sessions")
            .join(format!("{}.tmp", session.session_id));
        assert!(!temp_path.exists());

        let main_path = temp_dir
            .path()
            .join("sessions")
            .join(format!("{}.json", session.session_id));
        assert!(main_path.exists());
    }

    #[test]
    fn find_active_session_by_player() {
        let (store, _temp) = create_test_backend();
        let active = Session::new("p1", DEFAULT_MAX_ROUNDS);
        let mut ended = Session::new("p1", DEFAULT_MAX_ROUNDS);
        ended.end().unwrap();

        store.put_session(&active).unwrap();
        store.put_session(&ended).unwrap();

        let found = store.find_active_session("p1").unwrap().unwrap();
        assert_eq!(found.session_id, active.session_id);
        assert_eq!(store.count_active_sessions("p1").unwrap(), 1);
    }

    #[test]
    fn list_sessions_skips_corrupted_json() {
        let (store, temp_dir) = create_test_backend();

        let session = Session::new("p1", DEFAULT_MAX_ROUNDS);
        store.put_session(&session).unwrap();

        let corrupted_path = temp_dir.path().join("sessions").join("corrupted.json");
        fs::write(&corrupted_path, "{ this is not valid json }").unwrap();

        let sessions = store.list_sessions(10).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].session_id, session.session_id);
    }

    #[test]
    fn list_sessions_ignores_tmp_files() {
        let (store, temp_dir) = create_test_backend();

        store.put_session(&Session::new("p1", DEFAULT_MAX_ROUNDS)).unwrap();

        let tmp_path = temp_dir.path().join("sessions").join("orphan.tmp");
        fs::write(&tmp_path, "{}").unwrap();

        let sessions = store.list_sessions(10).unwrap();
        assert_eq!(sessions.len(), 1);
    }

    #[test]
    fn get_session_corrupted_returns_error() {
        let (store, temp_dir) = create_test_backend();

        let corrupted_path = temp_dir.path().join("sessions").join("corrupted.json");
        fs::write(&corrupted_path, "{ invalid }").unwrap();

        let result = store.get_session("corrupted");
        assert!(result.is_err());
    }

    #[test]
    fn delete_session_removes_file() {
        let (store, temp_dir) = create_test_backend();
        let session = Session::new("p1", DEFAULT_MAX_ROUNDS);

        store.put_session(&session).unwrap();
        let path = temp_dir
            .path()
            .join("sessions")
            .join(format!("{}.json", session.session_id));
        assert!(path.exists());

        store.delete_session(&session.session_id).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn delete_nonexistent_session_succeeds() {
        let (store, _temp) = create_test_backend();
        store.delete_session("nonexistent").unwrap();
    }

    #[test]
    fn classify_io_timeouts_are_transient() {
        for kind in [
            io::ErrorKind::TimedOut,
            io::ErrorKind::WouldBlock,
            io::ErrorKind::Interrupted,
        ] {
            let err = classify_io(io::Error::from(kind));
            assert!(matches!(err, Error::TransientStore(_)), "kind {kind:?}");
        }
    }

    #[test]
    fn classify_io_other_failures_are_storage_errors() {
        for kind in [io::ErrorKind::NotFound, io::ErrorKind::PermissionDenied] {
            let err = classify_io(io::Error::from(kind));
            assert!(matches!(err, Error::Storage(_)), "kind {kind:?}");
        }
    }

    #[test]
    fn persisted_document_uses_wire_field_names() {
        let (store, temp_dir) = create_test_backend();
        let session = Session::new("p1", DEFAULT_MAX_ROUNDS);
        store.put_session(&session).unwrap();

        let path = temp_dir
            .path()
            .join("sessions")
            .join(format!("{}.json", session.session_id));
        let contents = fs::read_to_string(path).unwrap();
        for field in [
            "session_id",
            "player_id",
            "choices",
            "start_time",
            "end_time",
            "status",
            "total_rounds_completed",
            "total_time_taken",
            "max_rounds",
        ] {
            assert!(contents.contains(field), "missing field {field}");
        }
    }
}
