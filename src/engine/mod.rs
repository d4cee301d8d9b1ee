//! Speech engine boundary.
//!
//! The transcription engine is external. It pushes transcript snapshots into
//! an event channel owned by the presentation session and exposes fallible
//! start/stop operations.

mod line_engine;

pub use line_engine::{LineEngine, LineSource, RESET_MARKER};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

/// The engine's current best transcription. Not a delta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptSnapshot {
    pub text: String,
    pub is_final: bool,
}

impl TranscriptSnapshot {
    pub fn partial(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_final: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Transcript(TranscriptSnapshot),
    /// Capture ended. `unexpected` is false when the engine ran out of input
    /// or was asked to stop.
    Stopped { unexpected: bool },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Speech model not found at {path}")]
    ModelMissing { path: String },

    #[error("Microphone permission denied")]
    PermissionDenied,

    #[error("Transcript input unavailable: {path}")]
    InputUnavailable { path: String },

    #[error("Speech engine error: {message}")]
    Internal { message: String },
}

#[async_trait]
pub trait SpeechEngine: Send {
    /// Begin capturing; snapshots are pushed into `events` until stopped.
    async fn start(&mut self, events: mpsc::Sender<EngineEvent>) -> Result<(), EngineError>;

    async fn stop(&mut self) -> Result<(), EngineError>;

    /// Get the name of this engine for logging
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_display() {
        let err = EngineError::ModelMissing {
            path: "/models/ggml-tiny.bin".to_string(),
        };
        assert_eq!(err.to_string(), "Speech model not found at /models/ggml-tiny.bin");
        assert_eq!(
            EngineError::PermissionDenied.to_string(),
            "Microphone permission denied"
        );
        assert_eq!(
            EngineError::Internal {
                message: "boom".to_string()
            }
            .to_string(),
            "Speech engine error: boom"
        );
    }

    #[test]
    fn test_partial_snapshot() {
        let snapshot = TranscriptSnapshot::partial("hello");
        assert_eq!(snapshot.text, "hello");
        assert!(!snapshot.is_final);
    }
}
