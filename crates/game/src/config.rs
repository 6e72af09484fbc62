//! Simulation run configuration. Loaded from config.ron at startup.

use anyhow::{bail, Result};
use serde::Deserialize;

use crate::scenario::ScriptStep;

/// Persistent driver settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    /// Physics ticks per second.
    #[serde(default = "default_fixed_rate")]
    pub fixed_rate_hz: f64,
    /// Rendered frames per second (frame ticks sample input and update visuals).
    #[serde(default = "default_frame_rate")]
    pub frame_rate_hz: f64,
    /// Length of the run in seconds.
    #[serde(default = "default_duration")]
    pub duration_secs: f32,
    /// Seconds between progress reports.
    #[serde(default = "default_report_interval")]
    pub report_interval_secs: f32,
    /// Vehicle tuning file.
    #[serde(default = "default_vehicle_path")]
    pub vehicle_path: String,
    /// Chassis box half extents (x, y, z).
    #[serde(default = "default_half_extents")]
    pub half_extents: (f32, f32, f32),
    #[serde(default = "default_chassis_mass")]
    pub chassis_mass: f32,
    /// Height of the chassis centre at spawn.
    #[serde(default = "default_spawn_height")]
    pub spawn_height: f32,
    /// Place a ramp on the straight ahead of the spawn point.
    #[serde(default = "default_true")]
    pub ramp: bool,
    /// Scripted driver input, consumed in order.
    #[serde(default = "default_script")]
    pub script: Vec<ScriptStep>,
}

fn default_fixed_rate() -> f64 {
    50.0
}
fn default_frame_rate() -> f64 {
    144.0
}
fn default_duration() -> f32 {
    12.0
}
fn default_report_interval() -> f32 {
    1.0
}
fn default_vehicle_path() -> String {
    "assets/vehicles/kart.ron".to_string()
}
fn default_half_extents() -> (f32, f32, f32) {
    (1.0, 0.4, 2.0)
}
fn default_chassis_mass() -> f32 {
    1000.0
}
fn default_spawn_height() -> f32 {
    1.0
}
fn default_true() -> bool {
    true
}
fn default_script() -> Vec<ScriptStep> {
    vec![
        ScriptStep::new(1.0, 0.0, 0.0),
        ScriptStep::new(5.0, 0.0, 1.0),
        ScriptStep::new(7.0, 0.6, 1.0),
        ScriptStep::new(9.0, 0.0, 0.0),
        ScriptStep::new(12.0, 0.0, -1.0),
    ]
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_rate_hz: default_fixed_rate(),
            frame_rate_hz: default_frame_rate(),
            duration_secs: default_duration(),
            report_interval_secs: default_report_interval(),
            vehicle_path: default_vehicle_path(),
            half_extents: default_half_extents(),
            chassis_mass: default_chassis_mass(),
            spawn_height: default_spawn_height(),
            ramp: default_true(),
            script: default_script(),
        }
    }
}

impl GameConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        let path = config_path();
        if let Ok(data) = std::fs::read_to_string(&path) {
            match Self::parse(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            }
        }
        Self::default()
    }

    /// Parse and sanity-check a config document.
    pub fn parse(data: &str) -> Result<Self> {
        let config: Self = ron::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    /// Both loop rates divide one second; they must be positive and finite.
    pub fn validate(&self) -> Result<()> {
        for (name, hz) in [
            ("fixed_rate_hz", self.fixed_rate_hz),
            ("frame_rate_hz", self.frame_rate_hz),
        ] {
            if !(hz > 0.0 && hz.is_finite()) {
                bail!("{name} must be positive, got {hz}");
            }
        }
        Ok(())
    }
}

fn config_path() -> std::path::PathBuf {
    std::env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from(".")).join("config.ron")
}
