//! Session state types and the shared status handle.
//!
//! The status handle is the relay between the pipeline and the control
//! surface: every state transition stores a short human-readable status
//! string which the HTTP API exposes to clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

/// State of a recording session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Capturing,
    Finalizing,
    Uploading,
    Transcribing,
    Done,
    Failed,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Capturing => "capturing",
            Self::Finalizing => "finalizing",
            Self::Uploading => "uploading",
            Self::Transcribing => "transcribing",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    /// Terminal states are never left; a new session starts from a reset.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

/// Current session, readable by API handlers through the status handle.
#[derive(Debug, Clone)]
pub struct RecordingSession {
    pub state: SessionState,
    pub session_id: Option<Uuid>,
    pub title: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub last_status: Option<String>,
    pub last_error: Option<String>,
}

impl Default for RecordingSession {
    fn default() -> Self {
        Self {
            state: SessionState::Idle,
            session_id: None,
            title: None,
            started_at: None,
            last_status: None,
            last_error: None,
        }
    }
}

impl RecordingSession {
    /// Seconds since capture started.
    pub fn duration_seconds(&self) -> Option<u64> {
        self.started_at.map(|started| {
            let elapsed = Utc::now() - started;
            elapsed.num_seconds().max(0) as u64
        })
    }
}

/// Thread-safe handle for sharing session state between the pipeline
/// and API handlers.
#[derive(Clone, Default)]
pub struct SessionStatusHandle {
    inner: Arc<Mutex<RecordingSession>>,
}

impl SessionStatusHandle {
    pub async fn get(&self) -> RecordingSession {
        self.inner.lock().await.clone()
    }

    /// Begin a fresh session in the Capturing state.
    pub async fn begin(&self, session_id: Uuid, title: Option<String>) {
        let mut session = self.inner.lock().await;
        *session = RecordingSession {
            state: SessionState::Capturing,
            session_id: Some(session_id),
            title,
            started_at: Some(Utc::now()),
            last_status: Some("Recording started".to_string()),
            last_error: None,
        };
        info!("Session {} started capturing", session_id);
    }

    pub async fn set_title(&self, title: Option<String>) {
        if title.is_none() {
            return;
        }
        let mut session = self.inner.lock().await;
        session.title = title;
    }

    /// Transition to a new state with a status message.
    pub async fn transition(&self, state: SessionState, status: impl Into<String>) {
        let status = status.into();
        info!("Session status: {}", status);
        let mut session = self.inner.lock().await;
        session.state = state;
        session.last_status = Some(status);
    }

    /// Emit a status message without changing state (poll progress etc).
    pub async fn emit(&self, status: impl Into<String>) {
        let status = status.into();
        info!("Session status: {}", status);
        let mut session = self.inner.lock().await;
        session.last_status = Some(status);
    }

    pub async fn complete(&self, status: impl Into<String>) {
        self.transition(SessionState::Done, status).await;
    }

    pub async fn fail(&self, error: impl Into<String>) {
        let error = error.into();
        let mut session = self.inner.lock().await;
        session.state = SessionState::Failed;
        session.last_status = Some(format!("Session failed: {error}"));
        session.last_error = Some(error);
    }

    pub async fn reset(&self) {
        let mut session = self.inner.lock().await;
        *session = RecordingSession::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_state_as_str() {
        assert_eq!(SessionState::Idle.as_str(), "idle");
        assert_eq!(SessionState::Capturing.as_str(), "capturing");
        assert_eq!(SessionState::Finalizing.as_str(), "finalizing");
        assert_eq!(SessionState::Uploading.as_str(), "uploading");
        assert_eq!(SessionState::Transcribing.as_str(), "transcribing");
        assert_eq!(SessionState::Done.as_str(), "done");
        assert_eq!(SessionState::Failed.as_str(), "failed");
    }

    #[test]
    fn test_terminal_states() {
        assert!(SessionState::Done.is_terminal());
        assert!(SessionState::Failed.is_terminal());
        assert!(!SessionState::Idle.is_terminal());
        assert!(!SessionState::Transcribing.is_terminal());
    }

    #[test]
    fn test_session_state_serialization() {
        let json = serde_json::to_string(&SessionState::Transcribing).unwrap();
        assert_eq!(json, "\"transcribing\"");

        let parsed: SessionState = serde_json::from_str("\"failed\"").unwrap();
        assert_eq!(parsed, SessionState::Failed);
    }

    #[tokio::test]
    async fn test_begin_resets_previous_error() {
        let handle = SessionStatusHandle::default();
        handle.fail("upload rejected").await;
        assert!(handle.get().await.last_error.is_some());

        handle.begin(Uuid::new_v4(), Some("Standup".to_string())).await;
        let session = handle.get().await;
        assert_eq!(session.state, SessionState::Capturing);
        assert_eq!(session.title, Some("Standup".to_string()));
        assert!(session.last_error.is_none());
        assert!(session.started_at.is_some());
    }

    #[tokio::test]
    async fn test_transition_records_status() {
        let handle = SessionStatusHandle::default();
        handle
            .transition(SessionState::Uploading, "Uploading recording...")
            .await;

        let session = handle.get().await;
        assert_eq!(session.state, SessionState::Uploading);
        assert_eq!(
            session.last_status,
            Some("Uploading recording...".to_string())
        );
    }

    #[tokio::test]
    async fn test_emit_keeps_state() {
        let handle = SessionStatusHandle::default();
        handle
            .transition(SessionState::Transcribing, "Starting transcription process...")
            .await;
        handle.emit("Transcribing... (attempt 2/60)").await;

        let session = handle.get().await;
        assert_eq!(session.state, SessionState::Transcribing);
        assert_eq!(
            session.last_status,
            Some("Transcribing... (attempt 2/60)".to_string())
        );
    }

    #[tokio::test]
    async fn test_fail_records_error_and_status() {
        let handle = SessionStatusHandle::default();
        handle.fail("transcription timed out").await;

        let session = handle.get().await;
        assert_eq!(session.state, SessionState::Failed);
        assert_eq!(session.last_error, Some("transcription timed out".to_string()));
        assert_eq!(
            session.last_status,
            Some("Session failed: transcription timed out".to_string())
        );
    }

    #[tokio::test]
    async fn test_reset_returns_to_idle() {
        let handle = SessionStatusHandle::default();
        handle.begin(Uuid::new_v4(), None).await;
        handle.reset().await;

        let session = handle.get().await;
        assert_eq!(session.state, SessionState::Idle);
        assert!(session.session_id.is_none());
    }
}
