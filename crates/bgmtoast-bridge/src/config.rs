use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Controls when a detected track is announced and for how long.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// How long the toast stays on screen, in seconds of wall-clock time.
    pub display_duration_secs: f32,
    /// Minimum time before the same song name may slide in again, in hours.
    pub cooldown_hours: u64,
    /// Catalog keys containing this fragment slide in from the left edge
    /// instead of the right one.
    pub alternate_side_marker: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            display_duration_secs: 5.0,
            cooldown_hours: 5,
            alternate_side_marker: "y8_title".to_string(),
        }
    }
}

/// Configuration for the file-open interception and the worker polling it.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InterceptConfig {
    /// Three-letter extension of background-music assets, without the dot.
    pub watched_extension: String,
    /// Interval in milliseconds between two mailbox polls of the worker.
    pub poll_interval_ms: u64,
}

impl Default for InterceptConfig {
    fn default() -> Self {
        Self {
            watched_extension: "ogg".to_string(),
            poll_interval_ms: 100,
        }
    }
}

/// Visual parameters of the toast. Sizes are in pixels before scaling.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Multiplier applied to paddings and rounding.
    pub ui_scale: f32,
    /// Distance between the toast and the surface edges.
    pub screen_padding: f32,
    /// Horizontal slide speed in pixels per second.
    pub animation_speed: f32,
    /// Font size the renderer should load the toast font at.
    pub font_size: f32,
    /// Toast font, relative to the module directory.
    pub font_path: PathBuf,
    /// Square icon drawn left of the text box, relative to the module
    /// directory.
    pub icon_path: PathBuf,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            ui_scale: 0.65,
            screen_padding: 10.0,
            animation_speed: 1500.0,
            font_size: 28.0,
            font_path: PathBuf::from("assets/mod_font.otf"),
            icon_path: PathBuf::from("assets/bgm_info.dds"),
        }
    }
}

/// Location of the track catalog.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Catalog file, relative to the module directory.
    pub path: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("assets/bgm_map.toml"),
        }
    }
}

/// Global configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub notification: NotificationConfig,
    pub intercept: InterceptConfig,
    pub overlay: OverlayConfig,
    pub catalog: CatalogConfig,
}
