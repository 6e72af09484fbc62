//! Read-only vehicle state shared with presentation and replication.

use crate::controller::InputSample;
use crate::drivetrain::forward_speed;
use crate::suspension::SpringState;
use crate::wheel::{WheelId, WheelMap};
use engine_core::{Transform, Vec3};

/// What the owner knows about a vehicle after a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleSnapshot {
    pub transform: Transform,
    pub linear_velocity: Vec3,
    pub springs: WheelMap<SpringState>,
    pub input: InputSample,
}

impl VehicleSnapshot {
    pub fn forward(&self) -> Vec3 {
        self.transform.forward()
    }

    pub fn forward_speed(&self) -> f32 {
        forward_speed(self.forward(), self.linear_velocity)
    }

    pub fn spring_length(&self, wheel: WheelId) -> f32 {
        self.springs[wheel].current_length
    }

    pub fn is_grounded(&self, wheel: WheelId, rest_length: f32) -> bool {
        self.springs[wheel].is_grounded(rest_length)
    }
}
