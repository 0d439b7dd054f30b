//! Playback request entity

use serde::Serialize;
use uuid::Uuid;

/// Shortest segment duration producers are expected to send (seconds)
pub const EXPECTED_MIN_SECONDS: f64 = 10.0;

/// Longest segment duration producers are expected to send (seconds)
pub const EXPECTED_MAX_SECONDS: f64 = 40.0;

/// One queued playback item
///
/// Immutable once created. Owned by the queue until dequeued, then by the
/// deck that plays it; dropped on completion or load failure, never
/// replayed. Timing outside the expected bounds is accepted and played
/// degraded, never rejected.
#[derive(Debug, Clone, Serialize)]
pub struct PlaybackRequest {
    /// Unique id, generated at enqueue time
    pub id: Uuid,

    /// Opaque track reference; resolves to a playable resource
    pub title: String,

    /// Segment start offset into the track (seconds)
    pub start: f64,

    /// Segment end offset into the track (seconds)
    pub end: f64,
}

impl PlaybackRequest {
    pub fn new(title: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            start,
            end,
        }
    }

    /// Nominal segment duration (may be non-positive for malformed input)
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Whether the segment honors the producer contract
    /// (`0 <= start`, `EXPECTED_MIN_SECONDS <= end-start <= EXPECTED_MAX_SECONDS`)
    pub fn has_expected_timing(&self) -> bool {
        self.start >= 0.0
            && self.duration() >= EXPECTED_MIN_SECONDS
            && self.duration() <= EXPECTED_MAX_SECONDS
    }
}
