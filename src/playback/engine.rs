//! Playback engine actor
//!
//! Runs the scheduler on a single task: one command mailbox and one
//! periodic tick, interleaved by `select!` so every handler runs to
//! completion before the next. This is the message-passing equivalent of
//! the single-threaded cooperative model the ordering guarantees assume;
//! no other task ever touches the queue or the decks.

use crate::audio::OutputDevice;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::playback::request::PlaybackRequest;
use crate::playback::scheduler::CrossfadeScheduler;
use crate::state::{EngineSnapshot, SharedState};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

/// Commands accepted by the engine mailbox
enum EngineCommand {
    Enqueue(PlaybackRequest),
    Initialize,
    Snapshot(oneshot::Sender<EngineSnapshot>),
    Shutdown,
}

/// Owns the scheduler and drives it from the mailbox + tick loop
pub struct PlaybackEngine {
    scheduler: CrossfadeScheduler,
    rx: mpsc::Receiver<EngineCommand>,
    tick_interval: Duration,
}

impl PlaybackEngine {
    /// Spawn the engine task; the returned handle is the only way in
    pub fn spawn(
        config: &Config,
        outputs: [Box<dyn OutputDevice>; 2],
        state: Arc<SharedState>,
    ) -> EngineHandle {
        let (tx, rx) = mpsc::channel(64);
        let engine = Self {
            scheduler: CrossfadeScheduler::new(config, outputs, state),
            rx,
            tick_interval: Duration::from_millis(config.tick_interval_ms),
        };
        tokio::spawn(engine.run());
        EngineHandle { tx }
    }

    async fn run(mut self) {
        info!(tick_ms = self.tick_interval.as_millis() as u64, "engine started");
        let mut ticker = interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => self.scheduler.tick(),
                command = self.rx.recv() => match command {
                    Some(EngineCommand::Enqueue(request)) => self.scheduler.enqueue(request),
                    Some(EngineCommand::Initialize) => self.scheduler.initialize(),
                    Some(EngineCommand::Snapshot(reply)) => {
                        let _ = reply.send(self.scheduler.snapshot());
                    }
                    Some(EngineCommand::Shutdown) | None => break,
                },
            }
        }
        debug!("engine stopped");
    }
}

/// Clonable boundary contract for ingest adapters and display surfaces
#[derive(Clone)]
pub struct EngineHandle {
    tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    /// Deliver a new request (the ingest path)
    pub async fn enqueue(&self, request: PlaybackRequest) -> Result<()> {
        self.send(EngineCommand::Enqueue(request)).await
    }

    /// One-time explicit system start; idempotent
    pub async fn initialize(&self) -> Result<()> {
        self.send(EngineCommand::Initialize).await
    }

    /// Sample the read-only display state
    pub async fn snapshot(&self) -> Result<EngineSnapshot> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(EngineCommand::Snapshot(reply_tx)).await?;
        reply_rx
            .await
            .map_err(|_| Error::Engine("engine stopped before replying".into()))
    }

    /// Stop the engine loop
    pub async fn shutdown(&self) -> Result<()> {
        self.send(EngineCommand::Shutdown).await
    }

    async fn send(&self, command: EngineCommand) -> Result<()> {
        self.tx
            .send(command)
            .await
            .map_err(|_| Error::Engine("engine command channel closed".into()))
    }
}
