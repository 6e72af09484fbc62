//! In-memory chassis over flat ground, for deterministic unit tests.

use crate::body::ChassisBody;
use crate::config::{VehicleConfig, VisualConfig};
use crate::wheel::WheelLayout;
use engine_core::{Transform, Vec3};

pub(crate) const DT: f32 = 1.0 / 50.0;

pub(crate) fn kart_config() -> VehicleConfig {
    VehicleConfig {
        wheels_padding_x: 0.1,
        wheels_padding_z: 0.15,
        spring_rest_length: 0.6,
        spring_strength: 15000.0,
        spring_damper: 2000.0,
        steer_angle: 30.0,
        front_wheel_grip_factor: 0.8,
        rear_wheel_grip_factor: 0.6,
        tire_mass: 20.0,
        accelerate_power: 3000.0,
        max_speed: 25.0,
        max_reverse_speed: 8.0,
        brakes_power: 1.0,
        air_resistance: 0.5,
    }
}

pub(crate) fn kart_visuals() -> VisualConfig {
    VisualConfig {
        wheels_spin_speed: 360.0,
        wheel_y_when_spring_min: -0.2,
        wheel_y_when_spring_max: -0.7,
    }
}

pub(crate) const HALF_EXTENTS: Vec3 = Vec3::new(1.0, 0.4, 2.0);

pub(crate) fn kart_layout() -> WheelLayout {
    WheelLayout::new(HALF_EXTENTS, &kart_config())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct AppliedForce {
    pub force: Vec3,
    /// `None` for forces through the centre of mass.
    pub point: Option<Vec3>,
}

#[derive(Debug, Clone)]
pub(crate) struct TestChassis {
    pub transform: Transform,
    pub linvel: Vec3,
    pub angvel: Vec3,
    /// Height of an infinite flat floor, if any.
    pub ground_height: Option<f32>,
    pub forces: Vec<AppliedForce>,
    pub frozen: bool,
}

impl TestChassis {
    /// Level chassis whose springs measure `spring_length` to the floor at y = 0.
    pub fn resting(spring_length: f32) -> Self {
        Self {
            transform: Transform::from_position(Vec3::new(0.0, HALF_EXTENTS.y + spring_length, 0.0)),
            linvel: Vec3::ZERO,
            angvel: Vec3::ZERO,
            ground_height: Some(0.0),
            forces: Vec::new(),
            frozen: false,
        }
    }

    /// Chassis with nothing underneath.
    pub fn airborne() -> Self {
        Self {
            ground_height: None,
            ..Self::resting(0.3)
        }
    }

    /// Sets a velocity along the chassis' forward axis.
    pub fn with_forward_speed(mut self, speed: f32) -> Self {
        self.linvel = self.transform.forward() * speed;
        self
    }

    pub fn net_force(&self) -> Vec3 {
        self.forces.iter().map(|f| f.force).sum()
    }
}

impl ChassisBody for TestChassis {
    fn transform(&self) -> Transform {
        self.transform
    }

    fn linear_velocity(&self) -> Vec3 {
        self.linvel
    }

    fn velocity_at_point(&self, point: Vec3) -> Vec3 {
        self.linvel + self.angvel.cross(point - self.transform.position)
    }

    fn add_force(&mut self, force: Vec3) {
        self.forces.push(AppliedForce { force, point: None });
    }

    fn add_force_at_point(&mut self, force: Vec3, point: Vec3) {
        self.forces.push(AppliedForce {
            force,
            point: Some(point),
        });
    }

    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32> {
        let ground = self.ground_height?;
        if direction.y >= 0.0 {
            return None;
        }
        let t = (ground - origin.y) / direction.y;
        (t >= 0.0 && t <= max_distance).then_some(t)
    }

    fn set_frozen(&mut self, frozen: bool) {
        self.frozen = frozen;
    }
}
