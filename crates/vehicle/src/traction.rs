//! Steering and lateral grip.
//!
//! Grip is an instantaneous velocity correction: each grounded wheel asks for
//! a force that removes (a fraction of) its sideways slip within one tick.
//! The force is not limited by any friction budget, so heavy slides are
//! corrected harder than real tyres could manage.

use crate::body::ChassisBody;
use crate::config::VehicleConfig;
use crate::suspension::SpringState;
use crate::wheel::{WheelFrame, WheelId, WheelMap};
use engine_core::{Quat, Transform, Vec3};

/// Direction a wheel rolls in. Front wheels turn with the steer input,
/// positive steer toward the chassis' right; back wheels always face forward.
pub fn roll_direction(wheel: WheelId, transform: &Transform, steer: f32, steer_angle: f32) -> Vec3 {
    let forward = transform.forward();
    if !wheel.is_front() {
        return forward;
    }
    let yaw = -(steer * steer_angle).to_radians();
    Quat::from_axis_angle(transform.up(), yaw) * forward
}

/// Sideways axis of a wheel, orthogonal to its roll direction.
pub fn slide_direction(up: Vec3, roll: Vec3) -> Vec3 {
    up.cross(roll)
}

/// Force cancelling `grip` of the slide velocity at one wheel.
pub fn grip_force(
    slide_direction: Vec3,
    point_velocity: Vec3,
    grip: f32,
    tire_mass: f32,
    dt: f32,
) -> Vec3 {
    let slide_velocity = slide_direction.dot(point_velocity);
    let desired_velocity_change = grip * -slide_velocity;
    let desired_acceleration = desired_velocity_change / dt;
    slide_direction * desired_acceleration * tire_mass
}

pub fn update_traction<B: ChassisBody + ?Sized>(
    body: &mut B,
    springs: &WheelMap<SpringState>,
    frames: &WheelMap<WheelFrame>,
    config: &VehicleConfig,
    dt: f32,
) {
    for wheel in WheelId::ALL {
        if !springs[wheel].is_grounded(config.spring_rest_length) {
            continue;
        }
        let frame = &frames[wheel];
        let force = grip_force(
            frame.slide_direction,
            body.velocity_at_point(frame.mount),
            config.grip_factor(wheel.is_front()),
            config.tire_mass,
            dt,
        );
        body.add_force_at_point(force, frame.torque_point);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{kart_config, kart_layout, TestChassis, DT};

    #[test]
    fn back_wheels_ignore_steer() {
        let transform = Transform::from_position_rotation(Vec3::ZERO, Quat::from_rotation_y(0.7));
        for steer in [-1.0, -0.3, 0.0, 0.5, 1.0] {
            for wheel in WheelId::BACK {
                let roll = roll_direction(wheel, &transform, steer, 30.0);
                assert!((roll - transform.forward()).length() < 1e-6);
            }
        }
    }

    #[test]
    fn front_wheels_turn_toward_steer() {
        let transform = Transform::default();
        let right = roll_direction(WheelId::FrontLeft, &transform, 1.0, 30.0);
        assert!(right.x > 0.0);
        assert!((right.angle_between(Vec3::NEG_Z) - 30f32.to_radians()).abs() < 1e-4);

        let left = roll_direction(WheelId::FrontRight, &transform, -0.5, 30.0);
        assert!(left.x < 0.0);
        assert!((left.angle_between(Vec3::NEG_Z) - 15f32.to_radians()).abs() < 1e-4);
    }

    #[test]
    fn grip_opposes_slide() {
        let slide = Vec3::NEG_X;
        let force = grip_force(slide, Vec3::new(-2.0, 0.0, -10.0), 0.5, 20.0, DT);
        // 2 m/s of slide, half removed in one tick by a 20 kg tyre.
        let expected = Vec3::X * (0.5 * 2.0 / DT * 20.0);
        assert!((force - expected).length() < 1e-2);
    }

    #[test]
    fn airborne_wheels_get_no_grip() {
        let config = kart_config();
        let mut body = TestChassis::airborne();
        body.linvel = Vec3::new(5.0, 0.0, 0.0);
        let frames = WheelFrame::compute(&kart_layout(), &body.transform, 0.0, config.steer_angle);
        let springs = WheelMap::from_fn(|_| SpringState {
            current_length: config.spring_rest_length,
            current_velocity: 0.0,
        });
        update_traction(&mut body, &springs, &frames, &config, DT);
        assert!(body.forces.is_empty());
    }

    #[test]
    fn grounded_sideways_motion_is_pushed_back() {
        let config = kart_config();
        let mut body = TestChassis::resting(0.4);
        body.linvel = Vec3::new(3.0, 0.0, 0.0);
        let frames = WheelFrame::compute(&kart_layout(), &body.transform, 0.0, config.steer_angle);
        let springs = WheelMap::from_fn(|_| SpringState {
            current_length: 0.4,
            current_velocity: 0.0,
        });
        update_traction(&mut body, &springs, &frames, &config, DT);

        assert_eq!(body.forces.len(), 4);
        for (applied, wheel) in body.forces.iter().zip(WheelId::ALL) {
            assert!(applied.force.x < 0.0);
            assert_eq!(applied.point, Some(frames[wheel].torque_point));
        }
        // Front and rear grip differ.
        assert!(body.forces[0].force.x < body.forces[2].force.x);
    }
}
