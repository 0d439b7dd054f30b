//! Output device abstraction
//!
//! A deck drives exactly one output device through this trait. The scheduler
//! core is agnostic to how a track reference resolves to bytes; the shipped
//! implementation (`ClockOutput`) simulates playback against the wall clock,
//! and tests script their own device.

use crate::error::Result;

pub mod clock;

pub use clock::ClockOutput;

/// Abstract playback channel capability
///
/// `load` is fire-and-forget from the scheduler's point of view: an
/// immediate failure is returned, a deferred one surfaces through
/// `take_error` and is funneled back through the scheduler tick rather than
/// running concurrently with it.
pub trait OutputDevice: Send {
    /// Set the load target to a track reference
    fn load(&mut self, resource: &str) -> Result<()>;

    /// Move the output position (seconds)
    fn seek(&mut self, position: f64);

    /// Begin or resume output
    fn play(&mut self);

    /// Pause output
    fn pause(&mut self);

    /// Apply a volume in [0.0, 1.0]; callers clamp before calling
    fn set_volume(&mut self, volume: f32);

    /// Current output position in seconds; advances in real time while
    /// playing, owned by the device
    fn position(&self) -> f64;

    /// Drain an asynchronously surfaced device failure, if any
    fn take_error(&mut self) -> Option<String> {
        None
    }
}
