//! XR Gallery - a WebXR shooting gallery
//!
//! Core modules:
//! - `sim`: Deterministic gameplay core (projectiles, target, session gate, frame loop)
//! - `tuning`: Data-driven gameplay constants
//! - `hud`: Score text and overlay lines for the host's HUD
//! - `audio`: Procedural Web Audio cues (wasm32 only)
//! - `web`: JavaScript bridge for the WebXR host (wasm32 only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod hud;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use hud::{HudOverlay, format_score};
pub use tuning::{Tuning, TuningError};

/// Canonical gameplay constants (defaults for [`Tuning`])
pub mod consts {
    use glam::Vec3;

    /// Projectile speed (units/second)
    pub const PROJECTILE_SPEED: f32 = 3.0;
    /// Projectile lifetime in seconds (an earlier prototype used 1.0)
    pub const PROJECTILE_TTL: f32 = 5.0;

    /// Hit when projectile-to-target distance is strictly below this
    pub const HIT_RADIUS: f32 = 1.0;
    /// Points per confirmed hit
    pub const SCORE_INCREMENT: u32 = 10;
    /// Largest score the 4-digit display can show
    pub const SCORE_DISPLAY_MAX: u32 = 9999;

    /// Where the target starts and what relocation offsets are relative to
    pub const TARGET_HOME: Vec3 = Vec3::new(0.0, 2.0, 0.0);
    /// Relocation offset range along x
    pub const TARGET_X_RANGE: (f32, f32) = (-2.5, 2.5);
    /// Relocation offset range along z
    pub const TARGET_Z_RANGE: (f32, f32) = (-5.0, 0.0);
    /// Seconds the target stays hidden after a hit
    pub const TARGET_REAPPEAR_DELAY: f32 = 2.0;
    /// Radians added per frame on each rotation axis (frame-rate coupled)
    pub const TARGET_ROTATION_STEP: f32 = 0.01;

    /// Largest frame delta the loop will integrate (tab switches, debugger pauses)
    pub const MAX_FRAME_DELTA: f32 = 0.1;
}
