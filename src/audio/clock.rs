//! Wall-clock simulated output device
//!
//! Tracks position against `Instant` while playing, so the scheduler sees
//! the same device-owned position semantics it would get from real output
//! hardware. With a `media_root` configured, `load` verifies the track
//! reference resolves to a file under it, which gives the daemon real load
//! failures to exercise the drop-and-continue path.

use crate::audio::OutputDevice;
use crate::error::{Error, Result};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, trace};

/// Simulated output device driven by the wall clock
pub struct ClockOutput {
    /// Device label, for log attribution
    label: String,

    /// Optional root folder that track references must resolve under
    media_root: Option<PathBuf>,

    /// Currently loaded track reference
    resource: Option<String>,

    /// Position at the last seek/pause (seconds)
    base_position: f64,

    /// Set while playing; position = base + elapsed since this instant
    playing_since: Option<Instant>,

    volume: f32,
}

impl ClockOutput {
    pub fn new(label: impl Into<String>, media_root: Option<PathBuf>) -> Self {
        Self {
            label: label.into(),
            media_root,
            resource: None,
            base_position: 0.0,
            playing_since: None,
            volume: 1.0,
        }
    }

    fn freeze_position(&mut self) {
        if let Some(since) = self.playing_since.take() {
            self.base_position += since.elapsed().as_secs_f64();
        }
    }
}

impl OutputDevice for ClockOutput {
    fn load(&mut self, resource: &str) -> Result<()> {
        if let Some(root) = &self.media_root {
            let path = root.join(resource);
            if !path.is_file() {
                return Err(Error::Load(format!(
                    "{}: no such file under {}",
                    resource,
                    root.display()
                )));
            }
        }
        debug!(device = %self.label, %resource, "loaded");
        self.resource = Some(resource.to_string());
        self.base_position = 0.0;
        self.playing_since = None;
        Ok(())
    }

    fn seek(&mut self, position: f64) {
        let playing = self.playing_since.is_some();
        self.base_position = position;
        self.playing_since = if playing { Some(Instant::now()) } else { None };
    }

    fn play(&mut self) {
        if self.playing_since.is_none() {
            self.playing_since = Some(Instant::now());
        }
    }

    fn pause(&mut self) {
        self.freeze_position();
    }

    fn set_volume(&mut self, volume: f32) {
        trace!(device = %self.label, volume, "volume");
        self.volume = volume;
    }

    fn position(&self) -> f64 {
        match self.playing_since {
            Some(since) => self.base_position + since.elapsed().as_secs_f64(),
            None => self.base_position,
        }
    }
}
