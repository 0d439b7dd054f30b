//! Playback deck
//!
//! One of two interchangeable channels the scheduler alternates between.
//! A deck wraps an output device and re-expresses its callback-driven
//! surface as an explicit state machine polled by the scheduler tick.

use crate::audio::OutputDevice;
use crate::error::Result;
use crate::playback::request::PlaybackRequest;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Deck tag; the two decks live in a fixed `[Deck; 2]` indexed by this
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeckId {
    A,
    B,
}

impl DeckId {
    pub const BOTH: [DeckId; 2] = [DeckId::A, DeckId::B];

    /// Get the other deck
    pub fn other(self) -> Self {
        match self {
            DeckId::A => DeckId::B,
            DeckId::B => DeckId::A,
        }
    }

    /// Slot index into the deck pair
    pub fn index(self) -> usize {
        match self {
            DeckId::A => 0,
            DeckId::B => 1,
        }
    }
}

impl fmt::Display for DeckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeckId::A => write!(f, "A"),
            DeckId::B => write!(f, "B"),
        }
    }
}

/// Deck lifecycle states
///
/// `Loading` covers the window between `start` and the first tick that sees
/// no deferred device error. `Fading` is playback inside either fade window.
/// `Completed` marks end-of-segment inside a tick; `stop` returns the deck
/// to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeckState {
    Idle,
    Loading,
    Playing,
    Fading,
    Completed,
}

/// A controllable playback channel bound to one output device
pub struct Deck {
    id: DeckId,
    output: Box<dyn OutputDevice>,
    bound: Option<PlaybackRequest>,
    state: DeckState,
    volume: f32,
}

impl Deck {
    pub fn new(id: DeckId, output: Box<dyn OutputDevice>) -> Self {
        Self {
            id,
            output,
            bound: None,
            state: DeckState::Idle,
            volume: 1.0,
        }
    }

    pub fn state(&self) -> DeckState {
        self.state
    }

    /// Idle iff paused with no bound request
    pub fn is_idle(&self) -> bool {
        self.state == DeckState::Idle
    }

    pub fn bound(&self) -> Option<&PlaybackRequest> {
        self.bound.as_ref()
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Output position in seconds, owned by the device
    pub fn position(&self) -> f64 {
        self.output.position()
    }

    /// Bind a request and begin playback at `max(0, start - pre_roll)` with
    /// volume 0. On load failure the deck stays idle and the request is
    /// dropped (consumed); a deck is never left bound but not playing.
    pub fn start(&mut self, request: PlaybackRequest, pre_roll: f64) -> Result<()> {
        debug_assert!(self.is_idle(), "start on a non-idle deck");

        // The request binds only after the device accepts the load, so a
        // failed start leaves the deck exactly as it was: idle
        self.output.load(&request.title)?;

        self.output.seek((request.start - pre_roll).max(0.0));
        self.set_volume(0.0);
        self.output.play();
        debug!(deck = %self.id, request_id = %request.id, title = %request.title, "deck started");
        self.bound = Some(request);
        self.state = DeckState::Loading;
        Ok(())
    }

    /// Clamp to [0, 1] and apply; out-of-range values never reach the device
    pub fn set_volume(&mut self, volume: f32) {
        let volume = volume.clamp(0.0, 1.0);
        self.volume = volume;
        self.output.set_volume(volume);
    }

    /// Pause, reset volume to 1.0 for the next bind, unbind. Returns the
    /// request that was bound, which the caller drops.
    pub fn stop(&mut self) -> Option<PlaybackRequest> {
        self.output.pause();
        self.set_volume(1.0);
        self.state = DeckState::Idle;
        self.bound.take()
    }

    /// Poll the device for a deferred load/playback failure
    pub fn take_device_error(&mut self) -> Option<String> {
        self.output.take_error()
    }

    /// Record tick progress: a surviving `Loading` deck is playing, and
    /// playback inside a fade window is `Fading`
    pub(crate) fn note_progress(&mut self, fading: bool) {
        self.state = if fading {
            DeckState::Fading
        } else {
            DeckState::Playing
        };
    }

    /// Mark end-of-segment; `stop` completes the transition back to idle
    pub(crate) fn mark_completed(&mut self) {
        self.state = DeckState::Completed;
    }

    /// No-op play/pause cycle to satisfy device-unlock requirements
    pub(crate) fn unlock_cycle(&mut self) {
        self.output.play();
        self.output.pause();
    }
}
