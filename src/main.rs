//! crossdeck - Main entry point
//!
//! Dual-deck crossfade playback scheduler daemon. Requests arrive through
//! the engine handle; this binary wires a line-oriented operator console to
//! it as the local ingest adapter and renders onto wall-clock simulated
//! output devices.
//!
//! Console commands:
//!   init                     one-time system start (device unlock)
//!   play <start> <end> <title>   enqueue a segment of a track
//!   status                   print the engine snapshot as JSON
//!   quit                     shut down

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crossdeck::audio::{ClockOutput, OutputDevice};
use crossdeck::config::Config;
use crossdeck::playback::{EngineHandle, PlaybackEngine, PlaybackRequest};
use crossdeck::SharedState;

/// Command-line arguments for crossdeck
#[derive(Parser, Debug)]
#[command(name = "crossdeck")]
#[command(about = "Dual-deck crossfade playback scheduler")]
#[command(version)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "CROSSDECK_CONFIG")]
    config: Option<PathBuf>,

    /// Root folder containing playable files (overrides config file)
    #[arg(short, long, env = "CROSSDECK_MEDIA_ROOT")]
    media_root: Option<PathBuf>,

    /// Crossfade window in seconds (overrides config file)
    #[arg(long, env = "CROSSDECK_CROSSFADE_SECONDS")]
    crossfade_seconds: Option<f64>,

    /// Evaluation tick period in milliseconds (overrides config file)
    #[arg(long, env = "CROSSDECK_TICK_MS")]
    tick_interval_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crossdeck=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    // Priority order: flag/env (clap) > config file > default
    let mut config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(media_root) = args.media_root {
        config.media_root = Some(media_root);
    }
    if let Some(crossfade_seconds) = args.crossfade_seconds {
        config.crossfade_seconds = crossfade_seconds;
    }
    if let Some(tick_interval_ms) = args.tick_interval_ms {
        config.tick_interval_ms = tick_interval_ms;
    }
    config.validate().context("Invalid configuration")?;

    info!(
        crossfade_seconds = config.crossfade_seconds,
        tick_interval_ms = config.tick_interval_ms,
        "Starting crossdeck"
    );
    match &config.media_root {
        Some(root) => info!("Media root: {}", root.display()),
        None => info!("No media root configured; every track reference loads"),
    }

    let state = Arc::new(SharedState::new());
    let outputs: [Box<dyn OutputDevice>; 2] = [
        Box::new(ClockOutput::new("deck-a", config.media_root.clone())),
        Box::new(ClockOutput::new("deck-b", config.media_root.clone())),
    ];
    let engine = PlaybackEngine::spawn(&config, outputs, Arc::clone(&state));

    // Log the event stream for operators
    let mut events = state.subscribe_events();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            info!(event = %serde_json::to_string(&event).unwrap_or_default(), "event");
        }
    });

    tokio::select! {
        result = console_loop(engine.clone()) => result?,
        _ = shutdown_signal() => {}
    }

    engine.shutdown().await.ok();
    info!("Shutdown complete");
    Ok(())
}

/// Line-oriented operator console on stdin (the local ingest adapter)
async fn console_loop(engine: EngineHandle) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("init") => engine.initialize().await?,
            Some("play") => {
                let start = parts.next().and_then(|s| s.parse::<f64>().ok());
                let end = parts.next().and_then(|s| s.parse::<f64>().ok());
                let title = parts.collect::<Vec<_>>().join(" ");
                match (start, end, title.is_empty()) {
                    (Some(start), Some(end), false) => {
                        engine
                            .enqueue(PlaybackRequest::new(title, start, end))
                            .await?;
                    }
                    _ => warn!("usage: play <start> <end> <title>"),
                }
            }
            Some("status") => {
                let snapshot = engine.snapshot().await?;
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            }
            Some("quit") | Some("exit") => break,
            Some(other) => warn!(command = other, "unknown command"),
            None => {}
        }
    }
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
