use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{media::AutoplayPolicy, Result};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub playback: PlaybackConfig,
    pub gallery: GalleryConfig,
    pub assets: AssetConfig,
    pub question: QuestionConfig,
    pub closing: ClosingConfig,
}

impl AppConfig {
    /// Reads a JSON configuration file. Missing sections and fields fall back
    /// to their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Background audio behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Volume used when the music button starts playback.
    pub manual_volume: f32,
    pub fade: FadeConfig,
    pub autoplay: AutoplayPolicy,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            manual_volume: 0.9,
            fade: FadeConfig::default(),
            autoplay: AutoplayPolicy::RequireGesture,
        }
    }
}

/// Volume ramp applied after the question is accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FadeConfig {
    pub target_volume: f32,
    pub step: f32,
    pub step_interval_ms: u64,
}

impl FadeConfig {
    pub fn step_interval(&self) -> Duration {
        Duration::from_millis(self.step_interval_ms)
    }
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self {
            target_volume: 0.6,
            step: 0.05,
            step_interval_ms: 200,
        }
    }
}

/// Timing and gesture thresholds for the photo gallery.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub advance_interval_ms: u64,
    pub resume_cooldown_ms: u64,
    pub swipe_threshold_px: f32,
}

impl GalleryConfig {
    pub fn advance_interval(&self) -> Duration {
        Duration::from_millis(self.advance_interval_ms)
    }

    pub fn resume_cooldown(&self) -> Duration {
        Duration::from_millis(self.resume_cooldown_ms)
    }
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            advance_interval_ms: 5_000,
            resume_cooldown_ms: 5_000,
            swipe_threshold_px: 50.0,
        }
    }
}

/// Where the media used by the screens lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub soundtrack: String,
    /// Pattern for gallery photos; `{n}` is replaced by 1..=`photo_count`.
    pub photo_pattern: String,
    pub photo_count: usize,
    /// Explicit photo list. Takes precedence over the pattern when non-empty.
    pub photos: Vec<String>,
    pub videos: Vec<String>,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            soundtrack: "/assets/about-you.mp3".to_string(),
            photo_pattern: "/photos/foto{n}.jpg".to_string(),
            photo_count: 10,
            photos: Vec::new(),
            videos: vec!["/videos/video1.mp4".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestionConfig {
    pub teases: Vec<String>,
    /// Fixed seed for the dodge animation. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for QuestionConfig {
    fn default() -> Self {
        Self {
            teases: vec![
                "Are you sure? 😏".to_string(),
                "Answer honestly 🤨".to_string(),
                "Really, no? 🙄".to_string(),
                "I know you do 😌".to_string(),
            ],
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClosingConfig {
    pub reveal_delay_ms: u64,
}

impl ClosingConfig {
    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }
}

impl Default for ClosingConfig {
    fn default() -> Self {
        Self {
            reveal_delay_ms: 2_500,
        }
    }
}
