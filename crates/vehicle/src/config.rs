//! Vehicle tuning. Loaded once per archetype from a RON file and shared by reference.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading tuning files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid RON: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Physical tuning of one vehicle archetype.
///
/// Values are taken as-is. Rest length must be positive (it divides ride-height
/// ratios); everything else is the author's responsibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleConfig {
    /// Inset of the wheel mounts from the chassis sides, as a fraction of the box width.
    pub wheels_padding_x: f32,
    /// Inset of the wheel mounts from the chassis ends, as a fraction of the box length.
    pub wheels_padding_z: f32,

    pub spring_rest_length: f32,
    pub spring_strength: f32,
    pub spring_damper: f32,

    /// Maximum front wheel steer, in degrees.
    pub steer_angle: f32,
    pub front_wheel_grip_factor: f32,
    pub rear_wheel_grip_factor: f32,

    /// Mass each wheel uses to turn a desired velocity change into a force.
    pub tire_mass: f32,

    pub accelerate_power: f32,
    pub max_speed: f32,
    pub max_reverse_speed: f32,
    pub brakes_power: f32,

    pub air_resistance: f32,
}

impl VehicleConfig {
    /// Parse a bare `VehicleConfig` from RON text.
    pub fn from_ron_str(data: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject tunings the simulation cannot run with (it would divide by zero).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.spring_rest_length.is_finite() && self.spring_rest_length > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "spring_rest_length must be positive, got {}",
                self.spring_rest_length
            )));
        }
        Ok(())
    }

    pub fn grip_factor(&self, front: bool) -> f32 {
        if front {
            self.front_wheel_grip_factor
        } else {
            self.rear_wheel_grip_factor
        }
    }
}

/// Presentation tuning for the wheel meshes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualConfig {
    /// Wheel spin in degrees per unit of forward speed per second.
    pub wheels_spin_speed: f32,
    /// Wheel local height when the spring is fully compressed.
    pub wheel_y_when_spring_min: f32,
    /// Wheel local height when the spring is fully extended.
    pub wheel_y_when_spring_max: f32,
}

/// Contents of a tuning file under `assets/vehicles/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleTuning {
    pub vehicle: VehicleConfig,
    pub visual: VisualConfig,
}

impl VehicleTuning {
    pub fn from_ron_str(data: &str) -> Result<Self, ConfigError> {
        let tuning: Self = ron::from_str(data)?;
        tuning.vehicle.validate()?;
        Ok(tuning)
    }

    /// Load a tuning file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let tuning = Self::from_ron_str(&data)?;
        log::debug!("Loaded vehicle tuning from {:?}", path);
        Ok(tuning)
    }
}
