//! Gameplay tuning
//!
//! Every number the gallery plays by, loadable from JSON and persisted in
//! LocalStorage on the web build.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::input::Button;
use crate::sim::GateBindings;

/// Why a tuning set was rejected
#[derive(Debug, Error, PartialEq)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Parse(String),
    #[error("{field} must be positive and finite (got {value})")]
    NotPositive { field: &'static str, value: f32 },
    #[error("{field} range is inverted: {min} > {max}")]
    InvertedRange {
        field: &'static str,
        min: f32,
        max: f32,
    },
    #[error("{0:?} is bound to more than one gate action")]
    DuplicateBinding(Button),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub projectile_speed: f32,
    pub projectile_ttl: f32,
    pub hit_radius: f32,
    pub score_increment: u32,
    pub target_home: Vec3,
    pub target_x_range: (f32, f32),
    pub target_z_range: (f32, f32),
    pub target_reappear_delay: f32,
    pub target_rotation_step: f32,
    pub bindings: GateBindings,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            projectile_speed: PROJECTILE_SPEED,
            projectile_ttl: PROJECTILE_TTL,
            hit_radius: HIT_RADIUS,
            score_increment: SCORE_INCREMENT,
            target_home: TARGET_HOME,
            target_x_range: TARGET_X_RANGE,
            target_z_range: TARGET_Z_RANGE,
            target_reappear_delay: TARGET_REAPPEAR_DELAY,
            target_rotation_step: TARGET_ROTATION_STEP,
            bindings: GateBindings::default(),
        }
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::NotPositive { field, value })
    }
}

fn ordered(field: &'static str, (min, max): (f32, f32)) -> Result<(), TuningError> {
    if min <= max {
        Ok(())
    } else {
        Err(TuningError::InvertedRange { field, min, max })
    }
}

impl Tuning {
    /// Parse and validate; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning =
            serde_json::from_str(json).map_err(|e| TuningError::Parse(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        positive("projectile_speed", self.projectile_speed)?;
        positive("projectile_ttl", self.projectile_ttl)?;
        positive("hit_radius", self.hit_radius)?;
        positive("target_reappear_delay", self.target_reappear_delay)?;
        ordered("target_x_range", self.target_x_range)?;
        ordered("target_z_range", self.target_z_range)?;

        let b = self.bindings;
        if b.fire == b.confirm || b.fire == b.cancel {
            return Err(TuningError::DuplicateBinding(b.fire));
        }
        if b.confirm == b.cancel {
            return Err(TuningError::DuplicateBinding(b.confirm));
        }
        Ok(())
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "xr_gallery_tuning";

    /// Load tuning from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring stored tuning: {}", e),
                }
            }
        }

        log::info!("Using default tuning");
        Self::default()
    }

    /// Save tuning to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Tuning saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
