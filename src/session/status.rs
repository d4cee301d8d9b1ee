//! Session status types and shared state handle.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::db::{Keyword, KeywordList};
use crate::matcher;

/// Speech engine lifecycle as seen by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnginePhase {
    Idle,
    Listening,
    Stopping,
    /// Restart attempts exhausted; only an explicit start leaves this phase
    Failed,
}

impl EnginePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Listening => "listening",
            Self::Stopping => "stopping",
            Self::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayState {
    InProgress,
    Complete,
}

impl DisplayState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Complete => "complete",
        }
    }
}

/// Current session state, readable by API handlers and the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub list_id: Option<String>,
    pub list_name: Option<String>,
    pub engine: EnginePhase,
    pub display: DisplayState,
    pub keywords: Vec<Keyword>,
    pub progress: u8,
    pub transcript: String,
    pub last_error: Option<String>,
    pub restart_attempts: u32,
}

impl Default for SessionStatus {
    fn default() -> Self {
        Self {
            list_id: None,
            list_name: None,
            engine: EnginePhase::Idle,
            display: DisplayState::InProgress,
            keywords: Vec::new(),
            progress: 0,
            transcript: String::new(),
            last_error: None,
            restart_attempts: 0,
        }
    }
}

impl SessionStatus {
    pub fn has_keyword(&self, keyword_id: &str) -> bool {
        self.keywords.iter().any(|k| k.id == keyword_id)
    }
}

/// Thread-safe handle for sharing session state between the session loop and API handlers.
#[derive(Clone, Default)]
pub struct SessionStatusHandle {
    inner: Arc<Mutex<SessionStatus>>,
}

impl SessionStatusHandle {
    pub async fn get(&self) -> SessionStatus {
        self.inner.lock().await.clone()
    }

    pub async fn set_list(&self, list: &KeywordList) {
        let mut status = self.inner.lock().await;
        status.list_id = Some(list.id.clone());
        status.list_name = Some(list.name.clone());
        status.keywords = list.keywords.clone();
        status.progress = matcher::progress_percent(&list.keywords);
    }

    pub async fn set_engine(&self, phase: EnginePhase) {
        let mut status = self.inner.lock().await;
        status.engine = phase;
    }

    pub async fn set_display(&self, display: DisplayState) {
        let mut status = self.inner.lock().await;
        status.display = display;
    }

    pub async fn set_transcript(&self, transcript: &str) {
        let mut status = self.inner.lock().await;
        status.transcript = transcript.to_string();
    }

    pub async fn set_error(&self, error: Option<String>) {
        let mut status = self.inner.lock().await;
        status.last_error = error;
    }

    pub async fn set_restart_attempts(&self, attempts: u32) {
        let mut status = self.inner.lock().await;
        status.restart_attempts = attempts;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_phase_as_str() {
        assert_eq!(EnginePhase::Idle.as_str(), "idle");
        assert_eq!(EnginePhase::Listening.as_str(), "listening");
        assert_eq!(EnginePhase::Stopping.as_str(), "stopping");
        assert_eq!(EnginePhase::Failed.as_str(), "failed");
    }

    #[test]
    fn test_phase_serialization() {
        let json = serde_json::to_string(&EnginePhase::Listening).unwrap();
        assert_eq!(json, "\"listening\"");

        let json = serde_json::to_string(&DisplayState::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");

        let parsed: DisplayState = serde_json::from_str("\"complete\"").unwrap();
        assert_eq!(parsed, DisplayState::Complete);
    }

    #[test]
    fn test_status_default() {
        let status = SessionStatus::default();
        assert_eq!(status.engine, EnginePhase::Idle);
        assert_eq!(status.display, DisplayState::InProgress);
        assert!(status.list_id.is_none());
        assert!(status.keywords.is_empty());
        assert_eq!(status.progress, 0);
    }

    #[tokio::test]
    async fn test_handle_set_list_computes_progress() {
        let handle = SessionStatusHandle::default();
        let mut list = KeywordList::new("Talk");
        list.keywords.push(Keyword {
            checked: true,
            ..Keyword::with_id("a", "alpha")
        });
        list.keywords.push(Keyword::with_id("b", "beta"));

        handle.set_list(&list).await;

        let status = handle.get().await;
        assert_eq!(status.list_name.as_deref(), Some("Talk"));
        assert_eq!(status.progress, 50);
        assert!(status.has_keyword("b"));
        assert!(!status.has_keyword("c"));
    }

    #[tokio::test]
    async fn test_handle_lifecycle() {
        let handle = SessionStatusHandle::default();

        handle.set_engine(EnginePhase::Listening).await;
        handle.set_transcript("hello").await;
        handle.set_display(DisplayState::Complete).await;
        handle.set_error(Some("stop failed".to_string())).await;
        handle.set_restart_attempts(2).await;

        let status = handle.get().await;
        assert_eq!(status.engine, EnginePhase::Listening);
        assert_eq!(status.transcript, "hello");
        assert_eq!(status.display, DisplayState::Complete);
        assert_eq!(status.last_error.as_deref(), Some("stop failed"));
        assert_eq!(status.restart_attempts, 2);
    }
}
