//! crossdeck configuration
//!
//! Loaded from an optional TOML file; command-line flags and environment
//! variables (handled by clap in `main.rs`) override file values, which
//! override compiled defaults.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Scheduler configuration
///
/// `crossfade_seconds` is both the pre-roll lead and the fade duration. It
/// must be the same value on both ends of every transition so the fade-in
/// and fade-out slopes match exactly.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Crossfade window in seconds (pre-roll lead and fade duration)
    pub crossfade_seconds: f64,

    /// Evaluation tick period in milliseconds
    pub tick_interval_ms: u64,

    /// Queue capacity; `None` grows without bound. When full, new requests
    /// are rejected (not evicted) with a warning.
    pub max_queue: Option<usize>,

    /// Root folder for playable resources. When set, the clock output
    /// device refuses to load track references that do not resolve to a
    /// file under it; when unset every reference loads.
    pub media_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crossfade_seconds: 6.0,
            tick_interval_ms: 100,
            max_queue: None,
            media_root: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file, or defaults when no path given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|e| {
                    Error::Config(format!("cannot read {}: {}", path.display(), e))
                })?;
                toml::from_str(&content)
                    .map_err(|e| Error::Config(format!("cannot parse {}: {}", path.display(), e)))?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate timing parameters
    pub fn validate(&self) -> Result<()> {
        if !(self.crossfade_seconds > 0.0) {
            return Err(Error::Config(format!(
                "crossfade_seconds must be positive, got {}",
                self.crossfade_seconds
            )));
        }
        if self.tick_interval_ms == 0 {
            return Err(Error::Config("tick_interval_ms must be non-zero".into()));
        }
        Ok(())
    }
}
