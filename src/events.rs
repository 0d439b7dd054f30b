//! Event types for the crossdeck event system
//!
//! Broadcast to observers (display surfaces, transport adapters) via
//! `SharedState`. Serialized with a `type` tag so a wire adapter can forward
//! them unchanged.

use crate::playback::deck::DeckId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// crossdeck event types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerEvent {
    /// A request was appended to the queue
    RequestQueued {
        request_id: Uuid,
        title: String,
        queue_len: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Queue contents changed (append or dequeue); wire adapters can track
    /// queue length without polling snapshots
    QueueChanged {
        queue_len: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A deck started playing a request (pre-roll position, volume 0)
    DeckStarted {
        deck: DeckId,
        request_id: Uuid,
        title: String,
        start: f64,
        end: f64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A deck reached the end of its request and returned to idle
    DeckFinished {
        deck: DeckId,
        request_id: Uuid,
        title: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A request was dropped without playing (load failure, full queue)
    RequestDropped {
        request_id: Uuid,
        title: String,
        reason: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// The one-time device unlock completed; playback may begin
    Initialized {
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}
