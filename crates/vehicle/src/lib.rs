//! Arcade raycast vehicle physics.
//!
//! A box chassis is held up by four raycast springs and pushed around by
//! per-wheel grip, drive and brake forces plus a linear air drag:
//! - [`suspension`]: spring-damper per wheel
//! - [`traction`]: steering and sideways grip
//! - [`drivetrain`]: acceleration with a hard speed cap, three-way brake policy
//! - [`aero`]: air resistance
//! - [`controller`]: the per-tick orchestration and spawn guard
//! - [`visual`]: wheel spin, steer and ride height for rendering
//!
//! The physics engine is reached only through [`ChassisBody`].

pub mod aero;
pub mod body;
pub mod config;
pub mod controller;
pub mod drivetrain;
pub mod snapshot;
pub mod suspension;
pub mod traction;
pub mod visual;
pub mod wheel;

#[cfg(test)]
pub(crate) mod testing;

pub use body::{ChassisBody, RapierChassis};
pub use config::{ConfigError, VehicleConfig, VehicleTuning, VisualConfig};
pub use controller::{Authority, InputSample, SpawnPhase, VehicleController};
pub use snapshot::VehicleSnapshot;
pub use suspension::SpringState;
pub use visual::{WheelPose, WheelVisuals};
pub use wheel::{WheelId, WheelLayout, WheelMap};
