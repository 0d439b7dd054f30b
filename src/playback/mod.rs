//! Playback scheduling components

pub mod deck;
pub mod engine;
pub mod queue;
pub mod request;
pub mod scheduler;

pub use deck::{Deck, DeckId, DeckState};
pub use engine::{EngineHandle, PlaybackEngine};
pub use queue::RequestQueue;
pub use request::PlaybackRequest;
pub use scheduler::CrossfadeScheduler;
