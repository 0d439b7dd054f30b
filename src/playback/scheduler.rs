//! Dual-deck crossfade scheduler
//!
//! Owns the request queue and the two decks; everything here runs from one
//! execution context (the engine task), so the FIFO and single-ownership
//! guarantees hold without locking.
//!
//! The crossfade window is one constant: it is both the pre-roll lead and
//! the fade duration, on both ends of every transition, so the incoming
//! fade-in slope mirrors the outgoing fade-out slope. The two linear ramps
//! are not algebraically forced to sum to 1.0; the small loudness dip during
//! overlap matches the source system.

use crate::audio::OutputDevice;
use crate::config::Config;
use crate::events::PlayerEvent;
use crate::playback::deck::{Deck, DeckId};
use crate::playback::queue::RequestQueue;
use crate::playback::request::PlaybackRequest;
use crate::state::{DeckSnapshot, EngineSnapshot, QueuedRequestInfo, SharedState};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Volume envelope for one deck at one position
///
/// `window` is the crossfade duration in seconds. Fade-in runs over the
/// pre-roll (`max(0, start - window)` up to `start`), fade-out over the
/// last `window` seconds before `end`. When the segment is shorter than the
/// window the two factors overlap and the running minimum keeps the track
/// below full volume for its whole life.
pub fn fade_envelope(position: f64, start: f64, end: f64, window: f64) -> f32 {
    let actual_start = (start - window).max(0.0);
    let elapsed = position - actual_start;
    let remaining = end - position;

    let mut volume: f64 = 1.0;
    if elapsed < window {
        volume = volume.min(elapsed / window);
    }
    if remaining < window {
        volume = volume.min(remaining / window);
    }
    volume.clamp(0.0, 1.0) as f32
}

/// The orchestrator: two decks, one queue, one periodic evaluation tick
pub struct CrossfadeScheduler {
    decks: [Deck; 2],
    queue: RequestQueue,

    /// Deck that most recently executed a start (attribution only)
    active_deck: DeckId,

    /// Set once by `initialize`, never reset
    initialized: bool,

    crossfade_seconds: f64,
    state: Arc<SharedState>,
}

impl CrossfadeScheduler {
    pub fn new(
        config: &Config,
        outputs: [Box<dyn OutputDevice>; 2],
        state: Arc<SharedState>,
    ) -> Self {
        let [output_a, output_b] = outputs;
        Self {
            decks: [
                Deck::new(DeckId::A, output_a),
                Deck::new(DeckId::B, output_b),
            ],
            queue: RequestQueue::new(config.max_queue),
            active_deck: DeckId::A,
            initialized: false,
            crossfade_seconds: config.crossfade_seconds,
            state,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// One-time device unlock. Idempotent; the only place playback may
    /// begin with zero prior audio.
    pub fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        for id in DeckId::BOTH {
            self.decks[id.index()].unlock_cycle();
        }
        self.initialized = true;
        info!("playback initialized");
        self.state.broadcast_event(PlayerEvent::Initialized {
            timestamp: chrono::Utc::now(),
        });

        if self.both_idle() && !self.queue.is_empty() {
            self.start_next_on(DeckId::A);
        }
    }

    /// Accept a request from the ingest path
    ///
    /// Always queued (subject to the configured bound). Starts immediately
    /// on Deck A when the system is initialized and silent; before
    /// `initialize` it queues silently.
    pub fn enqueue(&mut self, request: PlaybackRequest) {
        if !request.has_expected_timing() {
            warn!(
                request_id = %request.id,
                title = %request.title,
                start = request.start,
                end = request.end,
                "request timing outside expected bounds, playing degraded"
            );
        }

        let request_id = request.id;
        let title = request.title.clone();
        if !self.queue.push(request) {
            self.state.broadcast_event(PlayerEvent::RequestDropped {
                request_id,
                title,
                reason: "queue full".into(),
                timestamp: chrono::Utc::now(),
            });
            return;
        }

        self.state.broadcast_event(PlayerEvent::RequestQueued {
            request_id,
            title,
            queue_len: self.queue.len(),
            timestamp: chrono::Utc::now(),
        });
        self.state.broadcast_event(PlayerEvent::QueueChanged {
            queue_len: self.queue.len(),
            timestamp: chrono::Utc::now(),
        });

        // Recover from the queue-drained-silent state without waiting a tick
        if self.initialized && self.both_idle() {
            self.start_next_on(DeckId::A);
        }
    }

    /// Periodic evaluation: envelopes, completion, crossfade trigger
    pub fn tick(&mut self) {
        let mut trigger: Option<DeckId> = None;

        for id in DeckId::BOTH {
            let deck = &mut self.decks[id.index()];

            // Deferred device failures funnel through the tick, never
            // concurrently with it
            if let Some(reason) = deck.take_device_error() {
                if let Some(dropped) = deck.stop() {
                    warn!(
                        deck = %id,
                        request_id = %dropped.id,
                        title = %dropped.title,
                        %reason,
                        "device error, dropping request"
                    );
                    self.state.broadcast_event(PlayerEvent::RequestDropped {
                        request_id: dropped.id,
                        title: dropped.title,
                        reason,
                        timestamp: chrono::Utc::now(),
                    });
                }
                continue;
            }

            let Some(request) = deck.bound().cloned() else {
                continue;
            };
            let position = deck.position();
            let remaining = request.end - position;

            let volume = fade_envelope(position, request.start, request.end, self.crossfade_seconds);
            deck.set_volume(volume);

            if position >= request.end {
                deck.mark_completed();
                deck.stop();
                info!(deck = %id, request_id = %request.id, title = %request.title, "finished");
                self.state.broadcast_event(PlayerEvent::DeckFinished {
                    deck: id,
                    request_id: request.id,
                    title: request.title,
                    timestamp: chrono::Utc::now(),
                });
                continue;
            }

            deck.note_progress(volume < 1.0);

            // Inside the outgoing fade window: overlap the next track's
            // fade-in with this one's fade-out
            if remaining > 0.0 && remaining <= self.crossfade_seconds {
                let other = id.other();
                if self.decks[other.index()].is_idle() && !self.queue.is_empty() {
                    trigger = Some(other);
                }
            }
        }

        if let Some(deck_id) = trigger {
            self.start_next_on(deck_id);
        }

        // Idle recovery: the retry opportunity after a load failure. A
        // dropped head must not strand the rest of a non-empty queue.
        if self.initialized && self.both_idle() && !self.queue.is_empty() {
            self.start_next_on(DeckId::A);
        }
    }

    /// Read-only display state
    pub fn snapshot(&self) -> EngineSnapshot {
        let deck_snapshot = |id: DeckId| -> DeckSnapshot {
            let deck = &self.decks[id.index()];
            let position = deck.position();
            let bound = deck.bound();
            DeckSnapshot {
                deck: id,
                state: deck.state(),
                request_id: bound.map(|r| r.id),
                title: bound.map(|r| r.title.clone()),
                start: bound.map(|r| r.start),
                end: bound.map(|r| r.end),
                position,
                elapsed: bound
                    .map(|r| position - (r.start - self.crossfade_seconds).max(0.0)),
                remaining: bound.map(|r| r.end - position),
                volume: deck.volume(),
            }
        };

        EngineSnapshot {
            initialized: self.initialized,
            active_deck: self.active_deck,
            queue: self
                .queue
                .iter()
                .map(|r| QueuedRequestInfo {
                    request_id: r.id,
                    title: r.title.clone(),
                    start: r.start,
                    end: r.end,
                })
                .collect(),
            decks: [deck_snapshot(DeckId::A), deck_snapshot(DeckId::B)],
        }
    }

    fn both_idle(&self) -> bool {
        DeckId::BOTH.iter().all(|id| self.decks[id.index()].is_idle())
    }

    /// Dequeue the head and start it on `deck_id` with the crossfade
    /// pre-roll. A load failure drops the request permanently; the next
    /// head is attempted on the next idle-deck opportunity.
    fn start_next_on(&mut self, deck_id: DeckId) {
        let Some(request) = self.queue.pop_front() else {
            return;
        };
        self.state.broadcast_event(PlayerEvent::QueueChanged {
            queue_len: self.queue.len(),
            timestamp: chrono::Utc::now(),
        });
        let request_id = request.id;
        let title = request.title.clone();
        let (start, end) = (request.start, request.end);

        match self.decks[deck_id.index()].start(request, self.crossfade_seconds) {
            Ok(()) => {
                self.active_deck = deck_id;
                info!(deck = %deck_id, %request_id, %title, start, end, "started");
                self.state.broadcast_event(PlayerEvent::DeckStarted {
                    deck: deck_id,
                    request_id,
                    title,
                    start,
                    end,
                    timestamp: chrono::Utc::now(),
                });
            }
            Err(e) => {
                warn!(deck = %deck_id, %request_id, %title, error = %e, "load failed, dropping request");
                self.state.broadcast_event(PlayerEvent::RequestDropped {
                    request_id,
                    title,
                    reason: e.to_string(),
                    timestamp: chrono::Utc::now(),
                });
            }
        }
        debug!(queue_len = self.queue.len(), "queue after start attempt");
    }
}
