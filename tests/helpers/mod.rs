//! Shared test helpers
//!
//! `ScriptedOutput` stands in for the output device: tests set its position
//! directly instead of waiting on the wall clock, schedule load failures by
//! title, and inspect every volume the scheduler wrote.

#![allow(dead_code)]

use crossdeck::audio::OutputDevice;
use crossdeck::config::Config;
use crossdeck::error::{Error, Result};
use crossdeck::events::PlayerEvent;
use crossdeck::playback::CrossfadeScheduler;
use crossdeck::SharedState;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

#[derive(Default)]
struct ScriptedInner {
    resource: Option<String>,
    position: f64,
    playing: bool,
    volume: f32,
    fail_titles: HashSet<String>,
    pending_error: Option<String>,
    volume_log: Vec<f32>,
    loads: Vec<String>,
}

/// Device half, handed to the deck
pub struct ScriptedOutput {
    inner: Arc<Mutex<ScriptedInner>>,
}

/// Control half, kept by the test
#[derive(Clone)]
pub struct ScriptedHandle {
    inner: Arc<Mutex<ScriptedInner>>,
}

impl ScriptedHandle {
    pub fn set_position(&self, position: f64) {
        self.inner.lock().unwrap().position = position;
    }

    pub fn position(&self) -> f64 {
        self.inner.lock().unwrap().position
    }

    pub fn volume(&self) -> f32 {
        self.inner.lock().unwrap().volume
    }

    /// Every volume the scheduler applied, in order
    pub fn volume_log(&self) -> Vec<f32> {
        self.inner.lock().unwrap().volume_log.clone()
    }

    /// Successfully loaded track references, in order
    pub fn loads(&self) -> Vec<String> {
        self.inner.lock().unwrap().loads.clone()
    }

    pub fn is_playing(&self) -> bool {
        self.inner.lock().unwrap().playing
    }

    /// Make future loads of this title fail
    pub fn fail_title(&self, title: &str) {
        self.inner.lock().unwrap().fail_titles.insert(title.to_string());
    }

    /// Surface a deferred device failure on the next tick
    pub fn push_error(&self, reason: &str) {
        self.inner.lock().unwrap().pending_error = Some(reason.to_string());
    }
}

impl OutputDevice for ScriptedOutput {
    fn load(&mut self, resource: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_titles.contains(resource) {
            return Err(Error::Load(format!("{resource}: cannot decode")));
        }
        inner.resource = Some(resource.to_string());
        inner.loads.push(resource.to_string());
        inner.position = 0.0;
        Ok(())
    }

    fn seek(&mut self, position: f64) {
        self.inner.lock().unwrap().position = position;
    }

    fn play(&mut self) {
        self.inner.lock().unwrap().playing = true;
    }

    fn pause(&mut self) {
        self.inner.lock().unwrap().playing = false;
    }

    fn set_volume(&mut self, volume: f32) {
        let mut inner = self.inner.lock().unwrap();
        inner.volume = volume;
        inner.volume_log.push(volume);
    }

    fn position(&self) -> f64 {
        self.inner.lock().unwrap().position
    }

    fn take_error(&mut self) -> Option<String> {
        self.inner.lock().unwrap().pending_error.take()
    }
}

pub fn scripted_deck() -> (Box<dyn OutputDevice>, ScriptedHandle) {
    let inner = Arc::new(Mutex::new(ScriptedInner::default()));
    (
        Box::new(ScriptedOutput {
            inner: Arc::clone(&inner),
        }),
        ScriptedHandle { inner },
    )
}

pub fn test_config() -> Config {
    Config {
        crossfade_seconds: 6.0,
        tick_interval_ms: 100,
        max_queue: None,
        media_root: None,
    }
}

/// Scheduler wired to scripted devices, plus an event receiver
pub fn scripted_scheduler() -> (
    CrossfadeScheduler,
    [ScriptedHandle; 2],
    broadcast::Receiver<PlayerEvent>,
) {
    let (output_a, handle_a) = scripted_deck();
    let (output_b, handle_b) = scripted_deck();
    let state = Arc::new(SharedState::new());
    let events = state.subscribe_events();
    let scheduler = CrossfadeScheduler::new(&test_config(), [output_a, output_b], state);
    (scheduler, [handle_a, handle_b], events)
}

/// Drain everything currently buffered on the event receiver
pub fn drain_events(rx: &mut broadcast::Receiver<PlayerEvent>) -> Vec<PlayerEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
