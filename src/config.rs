use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::frames;

pub const FRAMES_ENV: &str = "TERMSPIN_FRAMES";
pub const INTERVAL_ENV: &str = "TERMSPIN_INTERVAL_MS";

/// Animation settings a host program can embed in its own config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinnerConfig {
    pub frames: Vec<String>,
    pub frame_interval_ms: u64,
}

impl Default for SpinnerConfig {
    fn default() -> Self {
        Self {
            frames: frames::default_frames(),
            frame_interval_ms: frames::DEFAULT_INTERVAL.as_millis() as u64,
        }
    }
}

impl SpinnerConfig {
    /// Defaults with `TERMSPIN_FRAMES` / `TERMSPIN_INTERVAL_MS` applied on top.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(name) = lookup(FRAMES_ENV).filter(|v| !v.is_empty()) {
            config.frames = named_frames(&name)?;
        }

        if let Some(raw) = lookup(INTERVAL_ENV).filter(|v| !v.is_empty()) {
            config.frame_interval_ms = raw.trim().parse().with_context(|| {
                format!(
                    "{} must be a whole number of milliseconds, got '{}'",
                    INTERVAL_ENV, raw
                )
            })?;
        }

        Ok(config)
    }

    /// Configured interval, never shorter than [`frames::MIN_FRAME_INTERVAL`].
    pub fn frame_interval(&self) -> Duration {
        frames::clamp_interval(Duration::from_millis(self.frame_interval_ms))
    }

    /// Configured frames, or the default set if the list is empty.
    pub fn frames(&self) -> Vec<String> {
        if self.frames.is_empty() {
            frames::default_frames()
        } else {
            self.frames.clone()
        }
    }
}

/// Resolves a preset name, listing the valid names on failure.
pub fn named_frames(name: &str) -> Result<Vec<String>> {
    match frames::preset(name) {
        Some(set) => Ok(frames::to_owned(set)),
        None => {
            let valid: Vec<&str> = frames::PRESETS.iter().map(|(n, _)| *n).collect();
            anyhow::bail!(
                "Unknown frame set: '{}'. Valid sets: {}",
                name,
                valid.join(", ")
            );
        }
    }
}
