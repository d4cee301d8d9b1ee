use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{EngineError, EngineEvent, SpeechEngine, TranscriptSnapshot};

/// Line that makes the engine drop everything transcribed so far, the way a
/// realtime engine starts a fresh slice.
pub const RESET_MARKER: &str = "---";

#[derive(Debug, Clone)]
pub enum LineSource {
    Stdin,
    File(PathBuf),
}

impl LineSource {
    fn describe(&self) -> String {
        match self {
            LineSource::Stdin => "stdin".to_string(),
            LineSource::File(path) => path.display().to_string(),
        }
    }
}

/// Engine that treats each input line as newly recognised speech and emits
/// the cumulative transcript after every line.
pub struct LineEngine {
    source: LineSource,
    line_delay: Duration,
    cancel: Option<CancellationToken>,
    task: Option<JoinHandle<()>>,
}

impl LineEngine {
    pub fn new(source: LineSource) -> Self {
        Self {
            source,
            line_delay: Duration::ZERO,
            cancel: None,
            task: None,
        }
    }

    /// Pause between lines, to pace a replayed transcript file.
    pub fn with_line_delay(mut self, line_delay: Duration) -> Self {
        self.line_delay = line_delay;
        self
    }

    fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    async fn open(&self) -> Result<Box<dyn AsyncRead + Unpin + Send>, EngineError> {
        match &self.source {
            LineSource::Stdin => Ok(Box::new(tokio::io::stdin())),
            LineSource::File(path) => {
                let file = tokio::fs::File::open(path).await.map_err(|e| {
                    warn!("Failed to open transcript input {:?}: {}", path, e);
                    EngineError::InputUnavailable {
                        path: path.display().to_string(),
                    }
                })?;
                Ok(Box::new(file))
            }
        }
    }
}

#[async_trait]
impl SpeechEngine for LineEngine {
    async fn start(&mut self, events: mpsc::Sender<EngineEvent>) -> Result<(), EngineError> {
        if self.is_running() {
            warn!("LineEngine already running, ignoring start");
            return Ok(());
        }

        let reader = self.open().await?;
        let cancel = CancellationToken::new();
        let line_delay = self.line_delay;

        info!("LineEngine reading transcript from {}", self.source.describe());
        self.task = Some(tokio::spawn(pump(reader, events, cancel.clone(), line_delay)));
        self.cancel = Some(cancel);
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), EngineError> {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }

        if let Some(task) = self.task.take() {
            task.await.map_err(|e| EngineError::Internal {
                message: format!("line reader task failed: {e}"),
            })?;
        }

        debug!("LineEngine stopped");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "LineEngine"
    }
}

async fn pump(
    reader: Box<dyn AsyncRead + Unpin + Send>,
    events: mpsc::Sender<EngineEvent>,
    cancel: CancellationToken,
    line_delay: Duration,
) {
    let mut lines = BufReader::new(reader).lines();
    let mut transcript = String::new();

    loop {
        let next = tokio::select! {
            _ = cancel.cancelled() => return,
            next = lines.next_line() => next,
        };

        match next {
            Ok(Some(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                if line == RESET_MARKER {
                    transcript.clear();
                } else {
                    if !transcript.is_empty() {
                        transcript.push(' ');
                    }
                    transcript.push_str(line);
                }

                let snapshot = TranscriptSnapshot::partial(transcript.clone());
                if !send_or_cancel(&events, &cancel, EngineEvent::Transcript(snapshot)).await {
                    return;
                }

                if !line_delay.is_zero() {
                    tokio::select! {
                        _ = cancel.cancelled() => return,
                        _ = tokio::time::sleep(line_delay) => {}
                    }
                }
            }
            Ok(None) => {
                send_or_cancel(&events, &cancel, EngineEvent::Stopped { unexpected: false }).await;
                return;
            }
            Err(e) => {
                warn!("Transcript input failed: {}", e);
                send_or_cancel(&events, &cancel, EngineEvent::Stopped { unexpected: true }).await;
                return;
            }
        }
    }
}

/// Deliver one event unless the engine is cancelled first. A full channel
/// must not keep `stop` waiting on this task.
async fn send_or_cancel(
    events: &mpsc::Sender<EngineEvent>,
    cancel: &CancellationToken,
    event: EngineEvent,
) -> bool {
    tokio::select! {
        _ = cancel.cancelled() => false,
        sent = events.send(event) => sent.is_ok(),
    }
}
