//! Game settings
//!
//! Every tunable of the simulation. Defaults reproduce the classic feel;
//! overrides are read (never written) from LocalStorage on web or from the
//! file named by `ASTRO_DODGE_SETTINGS` on native.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;

/// Size of the drawing surface in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Center of the surface (for centered overlays)
    pub fn center(&self) -> glam::Vec2 {
        glam::Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// Simulation tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Ground line sits this far above the bottom of the viewport
    pub ground_offset: f32,

    // === Spawning ===
    pub spawn_interval_ms: f64,
    pub spawn_x: f32,
    pub spawn_min_y: f32,
    pub spawn_max_y: f32,
    /// Start with one obstacle rolling along the ground lane
    pub initial_obstacle: bool,

    // === Obstacles ===
    pub obstacle_speed: f32,
    pub obstacle_radius: f32,

    // === Player ===
    pub player_x: f32,
    pub player_radius: f32,
    pub gravity: f32,
    pub jump_velocity: f32,

    // === Scoring ===
    pub score_period_ms: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ground_offset: GROUND_OFFSET,

            spawn_interval_ms: SPAWN_INTERVAL_MS,
            spawn_x: SPAWN_X,
            spawn_min_y: SPAWN_MIN_Y,
            spawn_max_y: SPAWN_MAX_Y,
            initial_obstacle: true,

            obstacle_speed: OBSTACLE_SPEED,
            obstacle_radius: OBSTACLE_RADIUS,

            player_x: PLAYER_X,
            player_radius: PLAYER_RADIUS,
            gravity: GRAVITY,
            jump_velocity: JUMP_VELOCITY,

            score_period_ms: SCORE_PERIOD_MS,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check the values the simulation relies on
    pub fn validate(&self) -> Result<(), SettingsError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), SettingsError> {
            Err(SettingsError::Invalid { field, reason })
        }

        if !(self.spawn_interval_ms > 0.0) {
            return invalid("spawn_interval_ms", "must be positive");
        }
        if !(self.score_period_ms > 0.0) {
            return invalid("score_period_ms", "must be positive");
        }
        if !(self.spawn_max_y > self.spawn_min_y) {
            return invalid("spawn_max_y", "must be greater than spawn_min_y");
        }
        if !(self.player_radius > 0.0) {
            return invalid("player_radius", "must be positive");
        }
        if !(self.obstacle_radius > 0.0) {
            return invalid("obstacle_radius", "must be positive");
        }
        if !(self.jump_velocity < 0.0) {
            return invalid("jump_velocity", "must point upward (negative)");
        }
        if !(self.gravity >= 0.0) {
            return invalid("gravity", "must not be negative");
        }
        if !self.obstacle_speed.is_finite() {
            return invalid("obstacle_speed", "must be finite");
        }
        Ok(())
    }

    /// Ground level for a viewport
    pub fn ground_level(&self, viewport: &Viewport) -> f32 {
        viewport.height - self.ground_offset
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "astro_dodge_settings";

    /// Environment variable naming a settings file (native only)
    pub const FILE_ENV_VAR: &'static str = "ASTRO_DODGE_SETTINGS";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {e}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Load settings from the file named by `ASTRO_DODGE_SETTINGS`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Some(path) = std::env::var_os(Self::FILE_ENV_VAR) else {
            log::info!("Using default settings");
            return Self::default();
        };

        match Self::load_file(std::path::Path::new(&path)) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.to_string_lossy());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring {}: {e}", path.to_string_lossy());
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(path: &std::path::Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
