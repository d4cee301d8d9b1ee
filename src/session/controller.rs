//! Presentation session controller.
//!
//! Owns one keyword list and its match state for the duration of a
//! presentation. Transcript events, user commands and timers are consumed by
//! a single loop, so every evaluate-then-persist cycle finishes before the
//! next one starts.

use anyhow::{anyhow, bail, Result};
use std::collections::HashSet;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Sleep;
use tracing::{debug, error, info, warn};

use crate::config::{Config, RestartConfig};
use crate::db::{Keyword, KeywordId, KeywordList};
use crate::engine::{EngineEvent, SpeechEngine, TranscriptSnapshot};
use crate::matcher::{KeywordMatcher, MatchOutcome};
use crate::store::KeywordStore;

use super::status::{DisplayState, EnginePhase, SessionStatusHandle};

const ENGINE_EVENT_BUFFER: usize = 64;

/// Discrete user actions delivered to a running session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    ToggleKeyword(KeywordId),
    Reset,
    StartListening,
    StopListening,
    Shutdown,
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub auto_listen: bool,
    pub auto_stop_delay: Duration,
    pub restart: RestartConfig,
    /// End `run` once the engine has stopped for good, without waiting
    /// for a shutdown command
    pub exit_when_idle: bool,
}

impl From<&Config> for SessionOptions {
    fn from(config: &Config) -> Self {
        Self {
            auto_listen: config.session.auto_listen,
            auto_stop_delay: config.session.auto_stop_delay(),
            restart: config.restart.clone(),
            exit_when_idle: false,
        }
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

pub struct PresentationSession {
    list: KeywordList,
    matched: HashSet<KeywordId>,
    matcher: KeywordMatcher,
    engine: Box<dyn SpeechEngine>,
    store: Arc<dyn KeywordStore>,
    options: SessionOptions,
    status: SessionStatusHandle,
    phase: EnginePhase,
    display: DisplayState,
    restart_attempts: u32,
    events_tx: mpsc::Sender<EngineEvent>,
    events_rx: mpsc::Receiver<EngineEvent>,
    auto_stop: Option<Pin<Box<Sleep>>>,
    restart_at: Option<Pin<Box<Sleep>>>,
}

impl PresentationSession {
    /// Load `list_id` from the store and build a session around it. Nothing is
    /// reset or started until `start` is called.
    pub async fn load(
        list_id: &str,
        engine: Box<dyn SpeechEngine>,
        store: Arc<dyn KeywordStore>,
        options: SessionOptions,
        status: SessionStatusHandle,
    ) -> Result<Self> {
        let list = store
            .load(list_id)
            .await?
            .ok_or_else(|| anyhow!("List {} not found", list_id))?;

        let (events_tx, events_rx) = mpsc::channel(ENGINE_EVENT_BUFFER);

        Ok(Self {
            list,
            matched: HashSet::new(),
            matcher: KeywordMatcher::new()?,
            engine,
            store,
            options,
            status,
            phase: EnginePhase::Idle,
            display: DisplayState::InProgress,
            restart_attempts: 0,
            events_tx,
            events_rx,
            auto_stop: None,
            restart_at: None,
        })
    }

    pub fn list(&self) -> &KeywordList {
        &self.list
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn display(&self) -> DisplayState {
        self.display
    }

    pub fn is_matched(&self, keyword_id: &str) -> bool {
        self.matched.contains(keyword_id)
    }

    /// Session start: every keyword unchecked, match state cleared, then
    /// listening begins if configured.
    pub async fn start(&mut self) -> Result<()> {
        info!(
            "Starting presentation session for list {} ({} keywords)",
            self.list.name,
            self.list.keywords.len()
        );

        self.clear_progress();
        self.persist().await;
        self.status.set_list(&self.list).await;
        self.status.set_display(self.display).await;
        self.status.set_transcript("").await;

        if self.options.auto_listen {
            if let Err(e) = self.start_listening().await {
                warn!("Auto-listen failed, session stays usable: {}", e);
            }
        }

        Ok(())
    }

    /// Evaluate a full transcript snapshot against the list.
    pub async fn on_transcript(&mut self, snapshot: TranscriptSnapshot) -> MatchOutcome {
        self.status.set_transcript(&snapshot.text).await;

        if self.restart_attempts > 0 {
            debug!("Engine delivering transcripts again, clearing restart attempts");
            self.restart_attempts = 0;
            self.status.set_restart_attempts(0).await;
        }

        let input: Vec<Keyword> = self
            .list
            .keywords
            .iter()
            .map(|k| Keyword {
                checked: k.checked || self.matched.contains(&k.id),
                ..k.clone()
            })
            .collect();
        let resynced = input != self.list.keywords;

        let outcome = self.matcher.evaluate(&snapshot.text, &input);

        for id in &outcome.newly_matched {
            if let Some(keyword) = self.list.keyword(id) {
                info!("Keyword said: {:?}", keyword.text);
            }
            self.matched.insert(id.clone());
        }

        if outcome.changed() || resynced {
            self.list.keywords = outcome.keywords.clone();
            self.list.touch();
            self.persist().await;
            self.status.set_list(&self.list).await;
        }

        if outcome.completed && self.display != DisplayState::Complete {
            info!("All {} keywords said", self.list.keywords.len());
            self.display = DisplayState::Complete;
            self.status.set_display(self.display).await;
            self.auto_stop = Some(Box::pin(tokio::time::sleep(self.options.auto_stop_delay)));
        }

        outcome
    }

    /// Manual toggle. Bypasses the matcher and may clear a flag; a later
    /// transcript can match the keyword again.
    pub async fn toggle_keyword(&mut self, keyword_id: &str) -> Result<bool> {
        let Some(keyword) = self.list.keywords.iter_mut().find(|k| k.id == keyword_id) else {
            bail!("Keyword {} not found in list {}", keyword_id, self.list.id);
        };

        keyword.checked = !keyword.checked;
        let checked = keyword.checked;
        if checked {
            self.matched.insert(keyword_id.to_string());
        } else {
            self.matched.remove(keyword_id);
        }

        debug!("Keyword {} manually set to {}", keyword_id, checked);
        self.list.touch();
        self.persist().await;
        self.status.set_list(&self.list).await;
        Ok(checked)
    }

    /// Clear all progress and return to the initial display. The engine keeps
    /// its current phase.
    pub async fn reset(&mut self) -> Result<()> {
        info!("Resetting session for list {}", self.list.name);
        let stopped = self.discard_queued_transcripts();
        self.clear_progress();
        self.persist().await;
        self.status.set_list(&self.list).await;
        self.status.set_display(self.display).await;
        self.status.set_transcript("").await;

        if let Some(stopped) = stopped {
            self.on_engine_event(stopped).await;
        }
        Ok(())
    }

    pub async fn start_listening(&mut self) -> Result<()> {
        match self.phase {
            EnginePhase::Listening | EnginePhase::Stopping => {
                debug!("Start requested while {}", self.phase.as_str());
                Ok(())
            }
            EnginePhase::Idle | EnginePhase::Failed => {
                self.restart_at = None;
                self.restart_attempts = 0;
                self.status.set_restart_attempts(0).await;
                self.start_engine().await
            }
        }
    }

    pub async fn stop_listening(&mut self) -> Result<()> {
        match self.phase {
            EnginePhase::Idle | EnginePhase::Failed => {
                if self.restart_at.take().is_some() {
                    info!("Pending engine restart cancelled");
                }
                self.set_phase(EnginePhase::Idle).await;
                Ok(())
            }
            EnginePhase::Listening | EnginePhase::Stopping => self.stop_engine().await,
        }
    }

    pub async fn on_engine_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Transcript(snapshot) => {
                if self.phase != EnginePhase::Listening {
                    debug!("Dropping transcript received while {}", self.phase.as_str());
                    return;
                }
                self.on_transcript(snapshot).await;
            }
            EngineEvent::Stopped { unexpected } => {
                if self.phase != EnginePhase::Listening {
                    debug!("Ignoring engine stop while {}", self.phase.as_str());
                    return;
                }

                if !unexpected || self.display == DisplayState::Complete {
                    info!("{} finished", self.engine.name());
                    self.set_phase(EnginePhase::Idle).await;
                    return;
                }

                warn!("{} stopped unexpectedly", self.engine.name());
                self.schedule_restart().await;
            }
        }
    }

    pub async fn handle_command(&mut self, command: SessionCommand) {
        let result = match command {
            SessionCommand::ToggleKeyword(id) => self.toggle_keyword(&id).await.map(|_| ()),
            SessionCommand::Reset => self.reset().await,
            SessionCommand::StartListening => self.start_listening().await,
            SessionCommand::StopListening => self.stop_listening().await,
            SessionCommand::Shutdown => Ok(()),
        };

        if let Err(e) = result {
            warn!("Session command failed: {}", e);
            self.record_error(e.to_string()).await;
        }
    }

    /// Consume commands, engine events and timers until shutdown.
    pub async fn run(mut self, mut commands: mpsc::Receiver<SessionCommand>) -> Result<KeywordList> {
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(SessionCommand::Shutdown) | None => break,
                    Some(command) => self.handle_command(command).await,
                },
                Some(event) = self.events_rx.recv() => self.on_engine_event(event).await,
                () = wait_for(&mut self.auto_stop) => self.on_auto_stop().await,
                () = wait_for(&mut self.restart_at) => self.on_restart_due().await,
            }

            if self.options.exit_when_idle && self.engine_done() {
                debug!("Engine finished, leaving session loop");
                break;
            }
        }

        self.finish().await
    }

    /// End the session, stopping the engine if it is still capturing.
    pub async fn finish(mut self) -> Result<KeywordList> {
        self.auto_stop = None;
        self.restart_at = None;
        if matches!(self.phase, EnginePhase::Listening | EnginePhase::Stopping) {
            if let Err(e) = self.stop_engine().await {
                warn!("Failed to stop engine at session end: {}", e);
            }
        }
        info!(
            "Session ended: {}/{} keywords said",
            self.list.checked_count(),
            self.list.keywords.len()
        );
        Ok(self.list)
    }

    fn engine_done(&self) -> bool {
        self.restart_at.is_none() && matches!(self.phase, EnginePhase::Idle | EnginePhase::Failed)
    }

    async fn on_auto_stop(&mut self) {
        self.auto_stop = None;
        if self.phase != EnginePhase::Listening {
            return;
        }

        info!("Stopping engine after completion");
        if let Err(e) = self.stop_engine().await {
            // Completion stays on screen regardless
            warn!("Auto-stop after completion failed: {}", e);
        }
    }

    async fn on_restart_due(&mut self) {
        self.restart_at = None;
        info!(
            "Restarting {} (attempt {}/{})",
            self.engine.name(),
            self.restart_attempts,
            self.options.restart.max_attempts
        );

        if let Err(e) = self.start_engine().await {
            warn!("Engine restart failed: {}", e);
            self.schedule_restart().await;
        }
    }

    async fn schedule_restart(&mut self) {
        self.restart_attempts += 1;
        self.status.set_restart_attempts(self.restart_attempts).await;

        if self.restart_attempts > self.options.restart.max_attempts {
            let message = format!(
                "Speech engine stopped and could not be restarted after {} attempts",
                self.options.restart.max_attempts
            );
            error!("{}", message);
            self.set_phase(EnginePhase::Failed).await;
            self.record_error(message).await;
            return;
        }

        let backoff = self.options.restart.backoff_for(self.restart_attempts);
        debug!("Engine restart scheduled in {:?}", backoff);
        self.set_phase(EnginePhase::Idle).await;
        self.restart_at = Some(Box::pin(tokio::time::sleep(backoff)));
    }

    async fn start_engine(&mut self) -> Result<()> {
        match self.engine.start(self.events_tx.clone()).await {
            Ok(()) => {
                info!("{} listening", self.engine.name());
                self.status.set_error(None).await;
                self.set_phase(EnginePhase::Listening).await;
                Ok(())
            }
            Err(e) => {
                error!("Failed to start {}: {}", self.engine.name(), e);
                self.set_phase(EnginePhase::Idle).await;
                self.record_error(format!("Failed to start listening: {e}"))
                    .await;
                Err(e.into())
            }
        }
    }

    async fn stop_engine(&mut self) -> Result<()> {
        self.set_phase(EnginePhase::Stopping).await;
        let result = self.engine.stop().await;
        self.discard_queued_transcripts();
        self.set_phase(EnginePhase::Idle).await;

        match result {
            Ok(()) => {
                info!("{} stopped", self.engine.name());
                Ok(())
            }
            Err(e) => {
                error!("Failed to stop {}: {}", self.engine.name(), e);
                self.record_error(format!("Failed to stop listening: {e}"))
                    .await;
                Err(e.into())
            }
        }
    }

    /// Drop snapshots already queued by the engine. Returns the last queued
    /// stop notice so the caller can still act on it.
    fn discard_queued_transcripts(&mut self) -> Option<EngineEvent> {
        let mut dropped = 0;
        let mut stopped = None;
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                EngineEvent::Transcript(_) => dropped += 1,
                event @ EngineEvent::Stopped { .. } => stopped = Some(event),
            }
        }
        if dropped > 0 {
            debug!("Discarded {} queued transcript(s)", dropped);
        }
        stopped
    }

    fn clear_progress(&mut self) {
        for keyword in &mut self.list.keywords {
            keyword.checked = false;
        }
        self.list.touch();
        self.matched.clear();
        self.display = DisplayState::InProgress;
        self.auto_stop = None;
    }

    async fn persist(&mut self) {
        if let Err(e) = self.store.save(&self.list).await {
            error!("Failed to save list {}: {:#}", self.list.id, e);
            self.record_error(format!("Failed to save list: {e}")).await;
        }
    }

    async fn set_phase(&mut self, phase: EnginePhase) {
        self.phase = phase;
        self.status.set_engine(phase).await;
    }

    async fn record_error(&mut self, message: String) {
        self.status.set_error(Some(message)).await;
    }
}

async fn wait_for(timer: &mut Option<Pin<Box<Sleep>>>) {
    match timer {
        Some(sleep) => sleep.await,
        None => std::future::pending().await,
    }
}
