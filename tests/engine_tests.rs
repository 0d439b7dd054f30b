//! Engine actor tests
//!
//! Exercises the mailbox + tick loop end to end with wall-clock simulated
//! devices and scaled-down timing.

use crossdeck::audio::{ClockOutput, OutputDevice};
use crossdeck::config::Config;
use crossdeck::events::PlayerEvent;
use crossdeck::playback::{DeckState, EngineHandle, PlaybackEngine, PlaybackRequest};
use crossdeck::state::EngineSnapshot;
use crossdeck::SharedState;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::sleep;

/// Poll the snapshot until `predicate` holds, failing past the deadline.
/// Wall-clock playback makes fixed sleeps racy under load; a deadline keeps
/// these tests deterministic.
async fn wait_until<F>(engine: &EngineHandle, deadline: Duration, mut predicate: F) -> EngineSnapshot
where
    F: FnMut(&EngineSnapshot) -> bool,
{
    let started = Instant::now();
    loop {
        let snapshot = engine.snapshot().await.unwrap();
        if predicate(&snapshot) {
            return snapshot;
        }
        assert!(
            started.elapsed() < deadline,
            "condition not reached within {deadline:?}: {snapshot:?}"
        );
        sleep(Duration::from_millis(20)).await;
    }
}

fn all_idle(snapshot: &EngineSnapshot) -> bool {
    snapshot.decks.iter().all(|d| d.state == DeckState::Idle)
}

fn fast_config() -> Config {
    Config {
        crossfade_seconds: 0.2,
        tick_interval_ms: 10,
        max_queue: None,
        media_root: None,
    }
}

fn clock_outputs() -> [Box<dyn OutputDevice>; 2] {
    [
        Box::new(ClockOutput::new("deck-a", None)),
        Box::new(ClockOutput::new("deck-b", None)),
    ]
}

#[tokio::test]
async fn request_plays_through_to_completion() {
    let state = Arc::new(SharedState::new());
    let mut events = state.subscribe_events();
    let engine = PlaybackEngine::spawn(&fast_config(), clock_outputs(), Arc::clone(&state));

    engine
        .enqueue(PlaybackRequest::new("track.wav", 0.0, 0.8))
        .await
        .unwrap();
    engine.initialize().await.unwrap();

    let snapshot = wait_until(&engine, Duration::from_secs(2), |s| {
        s.decks[0].title.is_some() && s.decks[0].position > 0.0
    })
    .await;
    assert!(snapshot.initialized);
    assert_eq!(snapshot.decks[0].title.as_deref(), Some("track.wav"));

    wait_until(&engine, Duration::from_secs(3), all_idle).await;

    let mut saw_initialized = false;
    let mut saw_started = false;
    let mut saw_finished = false;
    while let Ok(event) = events.try_recv() {
        match event {
            PlayerEvent::Initialized { .. } => saw_initialized = true,
            PlayerEvent::DeckStarted { .. } => saw_started = true,
            PlayerEvent::DeckFinished { .. } => saw_finished = true,
            _ => {}
        }
    }
    assert!(saw_initialized && saw_started && saw_finished);

    engine.shutdown().await.unwrap();
}

#[tokio::test]
async fn requests_queue_silently_until_initialize() {
    let state = Arc::new(SharedState::new());
    let engine = PlaybackEngine::spawn(&fast_config(), clock_outputs(), Arc::clone(&state));

    engine
        .enqueue(PlaybackRequest::new("early.wav", 0.0, 1.0))
        .await
        .unwrap();
    sleep(Duration::from_millis(50)).await;

    let snapshot = engine.snapshot().await.unwrap();
    assert!(!snapshot.initialized);
    assert_eq!(snapshot.queue.len(), 1);
    assert!(snapshot.decks.iter().all(|d| d.state == DeckState::Idle));

    engine.initialize().await.unwrap();
    let snapshot = engine.snapshot().await.unwrap();
    assert_eq!(snapshot.decks[0].title.as_deref(), Some("early.wav"));
    assert!(snapshot.queue.is_empty());

    engine.shutdown().await.unwrap();
}

#[tokio::test]
async fn consecutive_requests_crossfade_on_alternating_decks() {
    let state = Arc::new(SharedState::new());
    let mut events = state.subscribe_events();
    let engine = PlaybackEngine::spawn(&fast_config(), clock_outputs(), Arc::clone(&state));

    engine
        .enqueue(PlaybackRequest::new("one.wav", 0.0, 0.6))
        .await
        .unwrap();
    engine
        .enqueue(PlaybackRequest::new("two.wav", 0.0, 0.6))
        .await
        .unwrap();
    engine.initialize().await.unwrap();

    // 0.6s segment, 0.2s window: the second deck starts around t=0.4,
    // while the first is still fading out
    let snapshot = wait_until(&engine, Duration::from_secs(2), |s| {
        s.decks[1].title.is_some()
    })
    .await;
    assert_eq!(snapshot.decks[1].title.as_deref(), Some("two.wav"));

    wait_until(&engine, Duration::from_secs(3), all_idle).await;

    let mut decks_started = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let PlayerEvent::DeckStarted { deck, .. } = event {
            decks_started.push(deck);
        }
    }
    assert_eq!(decks_started.len(), 2);
    assert_ne!(decks_started[0], decks_started[1]);

    engine.shutdown().await.unwrap();
}

#[tokio::test]
async fn handle_errors_after_shutdown() {
    let state = Arc::new(SharedState::new());
    let engine = PlaybackEngine::spawn(&fast_config(), clock_outputs(), state);

    engine.shutdown().await.unwrap();
    sleep(Duration::from_millis(50)).await;

    let result = engine
        .enqueue(PlaybackRequest::new("late.wav", 0.0, 1.0))
        .await;
    assert!(result.is_err());
}
