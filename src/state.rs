//! Shared observability state
//!
//! Holds the broadcast channel for `PlayerEvent` and the read-only snapshot
//! types sampled from the scheduler on demand. Nothing here mutates playback
//! state; the scheduler owns the queue and the decks exclusively.

use crate::events::PlayerEvent;
use crate::playback::deck::{DeckId, DeckState};
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Shared state accessible by all components
pub struct SharedState {
    /// Event broadcaster for observers
    pub event_tx: broadcast::Sender<PlayerEvent>,
}

impl SharedState {
    /// Create new shared state
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(100);
        Self { event_tx }
    }

    /// Broadcast an event to all listeners
    pub fn broadcast_event(&self, event: PlayerEvent) {
        // Ignore send errors (no receivers is OK)
        let _ = self.event_tx.send(event);
    }

    /// Subscribe to the event stream
    pub fn subscribe_events(&self) -> broadcast::Receiver<PlayerEvent> {
        self.event_tx.subscribe()
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

/// One queued request, in service order
#[derive(Debug, Clone, Serialize)]
pub struct QueuedRequestInfo {
    pub request_id: Uuid,
    pub title: String,
    pub start: f64,
    pub end: f64,
}

/// Per-deck display state, sampled once per tick or on demand
#[derive(Debug, Clone, Serialize)]
pub struct DeckSnapshot {
    pub deck: DeckId,
    pub state: DeckState,
    /// Bound request id, None while idle
    pub request_id: Option<Uuid>,
    /// Bound request title, None while idle
    pub title: Option<String>,
    pub start: Option<f64>,
    pub end: Option<f64>,
    /// Output position in seconds (device-owned, advances in real time)
    pub position: f64,
    /// Seconds since the pre-roll start point
    pub elapsed: Option<f64>,
    /// Seconds until the request end point
    pub remaining: Option<f64>,
    pub volume: f32,
}

/// Full scheduler state for display
#[derive(Debug, Clone, Serialize)]
pub struct EngineSnapshot {
    pub initialized: bool,
    /// Deck that most recently executed a start (attribution only)
    pub active_deck: DeckId,
    pub queue: Vec<QueuedRequestInfo>,
    pub decks: [DeckSnapshot; 2],
}
