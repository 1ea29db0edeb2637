//! Session configuration, loadable from JSON.
//!
//! Every field has a default, so `{}` is a valid configuration and a page
//! script only needs to send the values it wants to change.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level configuration for a snooker session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnookerConfig {
    /// Canvas width in world units. The table is centred inside it.
    pub world_width: f32,
    /// Canvas height in world units.
    pub world_height: f32,
    /// Playing-area width. Height, ball and pocket sizes derive from it.
    pub table_width: f32,
    /// Fixed timestep in seconds.
    pub fixed_dt: f32,
    /// Solver steps per tick.
    pub physics_substeps: u32,
    /// Seed for random layouts.
    pub seed: u64,
    /// Speed below which a ball counts as stopped.
    pub rest_speed: f32,
    /// How many ticks a contact or foul message stays up.
    pub contact_message_ticks: u32,
    pub physics: PhysicsTuning,
    pub placement: PlacementTuning,
    pub cue: CueTuning,
}

impl Default for SnookerConfig {
    fn default() -> Self {
        Self {
            world_width: 1000.0,
            world_height: 600.0,
            table_width: 800.0,
            fixed_dt: 1.0 / 60.0,
            physics_substeps: 1,
            seed: 0x5EED_CAFE,
            rest_speed: 5.0,
            contact_message_ticks: 120,
            physics: PhysicsTuning::default(),
            placement: PlacementTuning::default(),
            cue: CueTuning::default(),
        }
    }
}

/// Materials for balls and cushions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    pub ball_restitution: f32,
    pub ball_friction: f32,
    /// Felt drag, applied as linear damping on every ball.
    pub ball_linear_damping: f32,
    /// Spin decay on every ball.
    pub ball_angular_damping: f32,
    pub ball_density: f32,
    pub cushion_restitution: f32,
    pub inner_cushion_restitution: f32,
    pub cushion_thickness: f32,
    pub inner_cushion_height: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            ball_restitution: 0.8,
            ball_friction: 0.01,
            ball_linear_damping: 1.2,
            ball_angular_damping: 1.2,
            ball_density: 0.01,
            cushion_restitution: 0.9,
            inner_cushion_restitution: 0.8,
            cushion_thickness: 30.0,
            inner_cushion_height: 10.0,
        }
    }
}

/// Ball placement limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementTuning {
    /// Minimum centre distance between balls, in ball diameters.
    pub clearance_multiplier: f32,
    /// Attempts per red before a random placement gives up.
    pub random_attempts: u32,
}

impl Default for PlacementTuning {
    fn default() -> Self {
        Self {
            clearance_multiplier: 1.2,
            random_attempts: 100,
        }
    }
}

/// Cue stick feel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CueTuning {
    pub max_power: f32,
    /// Shots at or below this power are ignored.
    pub min_shot_power: f32,
    /// Pointer distance per unit of power.
    pub power_divisor: f32,
    /// Drawn stick length at zero power.
    pub base_length: f32,
    /// Impulse applied to the cue ball per unit of power.
    pub impulse_per_power: f32,
    pub aim_assist_length: f32,
    pub aim_assist_dot_spacing: f32,
}

impl Default for CueTuning {
    fn default() -> Self {
        Self {
            max_power: 35.0,
            min_shot_power: 5.0,
            power_divisor: 5.0,
            base_length: 100.0,
            impulse_per_power: 220.0,
            aim_assist_length: 300.0,
            aim_assist_dot_spacing: 10.0,
        }
    }
}

/// Why a configuration was rejected.
#[derive(Debug)]
pub enum ConfigError {
    Json(serde_json::Error),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Json(err) => write!(f, "config is not valid JSON: {}", err),
            ConfigError::Invalid(reason) => write!(f, "invalid config: {}", reason),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Json(err) => Some(err),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Json(err)
    }
}

impl SnookerConfig {
    /// Parse and validate a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SnookerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Table height; always half the width.
    pub fn table_height(&self) -> f32 {
        self.table_width / 2.0
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.table_width > 0.0) {
            return Err(ConfigError::Invalid("table_width must be positive"));
        }
        if self.table_width > self.world_width || self.table_height() > self.world_height {
            return Err(ConfigError::Invalid("table does not fit inside the world"));
        }
        if !(self.fixed_dt > 0.0) {
            return Err(ConfigError::Invalid("fixed_dt must be positive"));
        }
        if self.placement.clearance_multiplier < 0.0 {
            return Err(ConfigError::Invalid("clearance_multiplier must not be negative"));
        }
        if !(self.cue.power_divisor > 0.0) {
            return Err(ConfigError::Invalid("cue power_divisor must be positive"));
        }
        Ok(())
    }
}
