//! Air resistance.

use crate::body::ChassisBody;
use engine_core::Vec3;

/// Linear drag. The box diagonal stands in for frontal area.
pub fn air_resistance_force(velocity: Vec3, coefficient: f32, body_size: Vec3) -> Vec3 {
    -velocity * coefficient * body_size.length()
}

pub fn update_air_resistance<B: ChassisBody + ?Sized>(body: &mut B, coefficient: f32, body_size: Vec3) {
    let force = air_resistance_force(body.linear_velocity(), coefficient, body_size);
    body.add_force(force);
}
