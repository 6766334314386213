//! Skyflap - a side-scrolling flap-through-the-gap game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (actor physics, obstacles, session state machine)
//! - `persistence`: Key-value stores for the high score
//! - `platform`: Browser-only backends (LocalStorage)
//! - `settings`: Data-driven game tuning

pub mod error;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use error::SkyflapError;
pub use highscores::HighScore;
pub use settings::GameConfig;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Delay between game over and the "panel ready" notification (seconds)
    pub const GAME_OVER_PANEL_DELAY: f32 = 0.5;

    /// Store key for the persisted high score
    pub const HIGH_SCORE_KEY: &str = "HighScore";

    /// Rotation (degrees) when rising fast
    pub const ROTATION_RISING: f32 = -30.0;
    /// Rotation (degrees) when falling fast
    pub const ROTATION_FALLING: f32 = 90.0;
    /// Velocity offset and window used to map velocity onto the rotation range
    pub const ROTATION_VELOCITY_OFFSET: f32 = 10.0;
    pub const ROTATION_VELOCITY_WINDOW: f32 = 20.0;
}

/// Linear interpolation with `t` clamped to [0, 1]
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Normalize an angle in degrees to [-180, 180)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    (angle + 180.0).rem_euclid(360.0) - 180.0
}

/// Interpolate between two angles (degrees) along the shortest arc
///
/// `t` is clamped to [0, 1]; the result is normalized to [-180, 180).
#[inline]
pub fn lerp_angle(from: f32, to: f32, t: f32) -> f32 {
    // Shortest signed delta, handles wraparound
    let delta = normalize_degrees(to - from);
    normalize_degrees(from + delta * t.clamp(0.0, 1.0))
}
