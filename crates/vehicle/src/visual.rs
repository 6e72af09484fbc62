//! Wheel poses for rendering, derived from simulation snapshots.

use crate::config::{VehicleConfig, VisualConfig};
use crate::controller::Authority;
use crate::snapshot::VehicleSnapshot;
use crate::wheel::{WheelId, WheelMap};
use engine_core::{Quat, Vec3};

/// Local pose of one wheel mesh relative to the chassis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelPose {
    pub rotation: Quat,
    /// Local Y of the wheel mesh.
    pub height: f32,
}

/// Accumulates wheel spin and maps suspension travel onto the wheel meshes.
///
/// Never writes back into the simulation.
#[derive(Debug, Clone)]
pub struct WheelVisuals {
    visual: VisualConfig,
    rest_length: f32,
    steer_angle: f32,
    rolls: WheelMap<Quat>,
    poses: WheelMap<WheelPose>,
}

impl WheelVisuals {
    pub fn new(visual: VisualConfig, config: &VehicleConfig) -> Self {
        Self::with_initial_rotations(visual, config, WheelMap::from_fn(|_| Quat::IDENTITY))
    }

    /// Start from the meshes' authored rotations.
    pub fn with_initial_rotations(
        visual: VisualConfig,
        config: &VehicleConfig,
        rotations: WheelMap<Quat>,
    ) -> Self {
        assert!(
            config.spring_rest_length > 0.0,
            "spring_rest_length must be positive, got {}",
            config.spring_rest_length
        );
        let height = visual.wheel_y_when_spring_max;
        Self {
            visual,
            rest_length: config.spring_rest_length,
            steer_angle: config.steer_angle,
            rolls: rotations,
            poses: WheelMap::from_fn(|wheel| WheelPose {
                rotation: rotations[wheel],
                height,
            }),
        }
    }

    /// Advance by one rendered frame. Remote vehicles keep their last pose.
    pub fn update(&mut self, authority: Authority, snapshot: &VehicleSnapshot, dt: f32) {
        if !authority.is_owner() {
            return;
        }

        let spin = snapshot.forward_speed() * self.visual.wheels_spin_speed * dt;
        // Rolling toward -Z is a negative turn about +X.
        let roll_step = Quat::from_axis_angle(Vec3::X, -spin.to_radians());
        let steer = Quat::from_axis_angle(
            Vec3::Y,
            -(snapshot.input.steer * self.steer_angle).to_radians(),
        );

        for wheel in WheelId::ALL {
            let length = snapshot.spring_length(wheel);
            if snapshot.is_grounded(wheel, self.rest_length) {
                self.rolls[wheel] = (self.rolls[wheel] * roll_step).normalize();
            }

            let rotation = if wheel.is_front() {
                steer * self.rolls[wheel]
            } else {
                self.rolls[wheel]
            };

            self.poses[wheel] = WheelPose {
                rotation,
                height: self.ride_height(length),
            };
        }
    }

    /// Wheel height for a spring length: min when compressed, max at rest.
    pub fn ride_height(&self, spring_length: f32) -> f32 {
        let ratio = spring_length / self.rest_length;
        let min = self.visual.wheel_y_when_spring_min;
        let max = self.visual.wheel_y_when_spring_max;
        min + (max - min) * ratio
    }

    pub fn pose(&self, wheel: WheelId) -> WheelPose {
        self.poses[wheel]
    }

    pub fn poses(&self) -> &WheelMap<WheelPose> {
        &self.poses
    }
}
