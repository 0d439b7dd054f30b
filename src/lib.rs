//! # crossdeck
//!
//! Dual-deck crossfade playback scheduler.
//!
//! **Purpose:** Render queued playback requests, in arrival order, on a shared
//! output device with smooth audible transitions between tracks.
//!
//! **Architecture:** Two alternating playback channels ("decks") owned by a
//! single scheduler. A periodic tick evaluates each deck, writes per-tick
//! volume envelopes, and starts the next queued request on the idle deck so
//! the incoming fade-in window overlaps the outgoing fade-out window exactly.
//!
//! All queue and deck state is mutated from one actor task (one mailbox,
//! processed one message at a time); transports and output hardware sit
//! behind boundary contracts (`EngineHandle`, `OutputDevice`).

pub mod audio;
pub mod config;
pub mod error;
pub mod events;
pub mod playback;
pub mod state;

pub use error::{Error, Result};
pub use state::SharedState;
