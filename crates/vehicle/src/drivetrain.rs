//! Engine and brakes.

use crate::body::ChassisBody;
use crate::config::VehicleConfig;
use crate::suspension::SpringState;
use crate::wheel::{WheelFrame, WheelId, WheelMap};
use engine_core::Vec3;

/// Below this forward speed the brakes hold the car regardless of input.
pub const ALMOST_STOPPING_SPEED: f32 = 2.0;

/// Brake ratio while coasting (no throttle).
pub const COASTING_BRAKE_RATIO: f32 = 0.1;

const INPUT_EPSILON: f32 = 1e-6;

pub fn is_near_zero(value: f32) -> bool {
    value.abs() < INPUT_EPSILON
}

/// Signed speed along the chassis' forward axis.
pub fn forward_speed(forward: Vec3, velocity: Vec3) -> f32 {
    forward.dot(velocity)
}

/// Hard speed cap: no drive once the current direction's limit is reached.
pub fn below_speed_cap(forward_speed: f32, config: &VehicleConfig) -> bool {
    let speed = forward_speed.abs();
    if forward_speed >= 0.0 {
        speed < config.max_speed
    } else {
        speed < config.max_reverse_speed
    }
}

/// Push every grounded wheel along its roll direction.
pub fn update_acceleration<B: ChassisBody + ?Sized>(
    body: &mut B,
    springs: &WheelMap<SpringState>,
    frames: &WheelMap<WheelFrame>,
    config: &VehicleConfig,
    throttle: f32,
) {
    if is_near_zero(throttle) {
        return;
    }

    let speed = forward_speed(body.transform().forward(), body.linear_velocity());
    if !below_speed_cap(speed, config) {
        log::trace!("Speed cap reached at {:.2}", speed);
        return;
    }

    for wheel in WheelId::ALL {
        if !springs[wheel].is_grounded(config.spring_rest_length) {
            continue;
        }
        let frame = &frames[wheel];
        let force = frame.roll_direction * throttle * config.accelerate_power;
        body.add_force_at_point(force, frame.torque_point);
    }
}

/// How hard to brake this tick, or `None` when driving along the direction of travel.
pub fn brake_ratio(forward: Vec3, velocity: Vec3, throttle: f32) -> Option<f32> {
    let speed = forward_speed(forward, velocity).abs();
    if speed < ALMOST_STOPPING_SPEED {
        return Some(1.0);
    }

    let coasting = is_near_zero(throttle);
    // Throttle against the motion is a brake request.
    let accelerate_contrary = !coasting && (forward * throttle).dot(velocity) < 0.0;
    if accelerate_contrary {
        Some(1.0)
    } else if coasting {
        Some(COASTING_BRAKE_RATIO)
    } else {
        None
    }
}

/// Slow the back wheels along their roll direction.
pub fn update_brakes<B: ChassisBody + ?Sized>(
    body: &mut B,
    springs: &WheelMap<SpringState>,
    frames: &WheelMap<WheelFrame>,
    config: &VehicleConfig,
    throttle: f32,
    dt: f32,
) {
    let Some(ratio) = brake_ratio(body.transform().forward(), body.linear_velocity(), throttle)
    else {
        return;
    };

    for wheel in WheelId::BACK {
        if !springs[wheel].is_grounded(config.spring_rest_length) {
            continue;
        }
        let frame = &frames[wheel];
        let roll_velocity = frame.roll_direction.dot(body.velocity_at_point(frame.mount));
        let desired_velocity_change = -roll_velocity * ratio * config.brakes_power;
        let desired_acceleration = desired_velocity_change / dt;
        let force = frame.roll_direction * desired_acceleration * config.tire_mass;
        body.add_force_at_point(force, frame.torque_point);
    }
}
