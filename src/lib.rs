//! Astro Dodge - A one-button asteroid dodging arcade game
//!
//! Core modules:
//! - `sim`: Simulation (entities, physics, collisions, scoring, game state)
//! - `renderer`: Drawing surface abstraction and WebGPU pipeline
//! - `platform`: Clock abstraction for native/headless runs
//! - `driver`: Frame-by-frame run loop
//! - `settings`: Tunable game constants

pub mod driver;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use driver::{FrameDriver, LoopControl, RunSummary};
pub use error::{RenderError, SettingsError};
pub use settings::{Settings, Viewport};

/// Default game constants
pub mod consts {
    /// Distance of the ground line above the bottom of the viewport
    pub const GROUND_OFFSET: f32 = 50.0;

    /// Obstacle spawn interval (wall-clock milliseconds)
    pub const SPAWN_INTERVAL_MS: f64 = 2000.0;
    /// Horizontal spawn position (just off the right of a typical play area)
    pub const SPAWN_X: f32 = 500.0;
    /// Vertical spawn band [min, max)
    pub const SPAWN_MIN_Y: f32 = 100.0;
    pub const SPAWN_MAX_Y: f32 = 400.0;

    /// Obstacle horizontal speed (pixels/frame)
    pub const OBSTACLE_SPEED: f32 = 2.0;
    pub const OBSTACLE_RADIUS: f32 = 30.0;

    /// Gravity (pixels/frame²)
    pub const GRAVITY: f32 = 0.5;
    /// Jump impulse (pixels/frame, negative is up)
    pub const JUMP_VELOCITY: f32 = -10.0;
    /// Player column
    pub const PLAYER_X: f32 = 100.0;
    pub const PLAYER_RADIUS: f32 = 20.0;

    /// Score increment period (wall-clock milliseconds)
    pub const SCORE_PERIOD_MS: f64 = 1000.0;

    /// Frame period used by headless runs (60 Hz)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
}
