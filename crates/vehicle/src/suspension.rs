//! Raycast spring-damper suspension.

use crate::body::ChassisBody;
use crate::config::VehicleConfig;
use crate::wheel::{WheelFrame, WheelId, WheelMap};
use engine_core::Vec3;

/// Spring measurement of one wheel, refreshed every fixed tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpringState {
    /// Mount-to-ground distance, in `[0, rest_length]`.
    pub current_length: f32,
    /// Change of `current_length` since the previous tick, per second.
    pub current_velocity: f32,
}

impl SpringState {
    /// A wheel touches the ground while its spring is shorter than at rest.
    pub fn is_grounded(&self, rest_length: f32) -> bool {
        self.current_length < rest_length
    }
}

/// Probe the ground under one mount and derive the new spring state.
pub fn cast_spring<B: ChassisBody + ?Sized>(
    body: &B,
    previous: SpringState,
    mount: Vec3,
    down: Vec3,
    rest_length: f32,
    dt: f32,
) -> SpringState {
    let current_length = body
        .cast_ray(mount, down, rest_length)
        .map_or(rest_length, |distance| distance.clamp(0.0, rest_length));

    SpringState {
        current_length,
        current_velocity: (current_length - previous.current_length) / dt,
    }
}

/// Damped Hooke force along the spring axis. Positive pushes the chassis up.
pub fn spring_force(state: SpringState, rest_length: f32, strength: f32, damper: f32) -> f32 {
    let offset = rest_length - state.current_length;
    offset * strength - state.current_velocity * damper
}

/// Refresh every wheel's spring state without touching the body.
pub fn cast_springs<B: ChassisBody + ?Sized>(
    body: &B,
    springs: &mut WheelMap<SpringState>,
    frames: &WheelMap<WheelFrame>,
    config: &VehicleConfig,
    dt: f32,
) {
    let down = -body.transform().up();
    for wheel in WheelId::ALL {
        springs[wheel] = cast_spring(
            body,
            springs[wheel],
            frames[wheel].mount,
            down,
            config.spring_rest_length,
            dt,
        );
    }
}

/// Cast all springs and push the chassis up at each mount.
///
/// Forces act at the mounts rather than the centre of mass, so pitch and roll
/// come out of the spring imbalance on their own.
pub fn update_suspension<B: ChassisBody + ?Sized>(
    body: &mut B,
    springs: &mut WheelMap<SpringState>,
    frames: &WheelMap<WheelFrame>,
    config: &VehicleConfig,
    dt: f32,
) {
    cast_springs(body, springs, frames, config, dt);

    let up = body.transform().up();
    for wheel in WheelId::ALL {
        let force = spring_force(
            springs[wheel],
            config.spring_rest_length,
            config.spring_strength,
            config.spring_damper,
        );
        log::trace!(
            "{:?}: length {:.3} velocity {:.3} force {:.1}",
            wheel,
            springs[wheel].current_length,
            springs[wheel].current_velocity,
            force
        );
        body.add_force_at_point(up * force, frames[wheel].mount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{kart_config, kart_layout, TestChassis, DT};

    fn frames_for(body: &TestChassis) -> WheelMap<WheelFrame> {
        WheelFrame::compute(&kart_layout(), &body.transform, 0.0, 30.0)
    }

    #[test]
    fn length_stays_within_rest_length() {
        let config = kart_config();
        for height in [0.0, 0.1, 0.35, 0.59, 0.6, 0.9, 5.0] {
            let body = TestChassis::resting(height);
            let mut springs = WheelMap::default();
            cast_springs(&body, &mut springs, &frames_for(&body), &config, DT);
            for (_, spring) in springs.iter() {
                assert!(spring.current_length >= 0.0);
                assert!(spring.current_length <= config.spring_rest_length);
            }
        }
    }

    #[test]
    fn miss_means_fully_extended_and_airborne() {
        let config = kart_config();
        let body = TestChassis::airborne();
        let mut springs = WheelMap::default();
        cast_springs(&body, &mut springs, &frames_for(&body), &config, DT);
        for (_, spring) in springs.iter() {
            assert_eq!(spring.current_length, config.spring_rest_length);
            assert!(!spring.is_grounded(config.spring_rest_length));
        }
    }

    #[test]
    fn hit_measures_distance_and_velocity() {
        let config = kart_config();
        let body = TestChassis::resting(0.4);
        let previous = SpringState {
            current_length: 0.5,
            current_velocity: 0.0,
        };
        let mount = frames_for(&body)[WheelId::FrontLeft].mount;
        let state = cast_spring(&body, previous, mount, Vec3::NEG_Y, config.spring_rest_length, DT);
        assert!((state.current_length - 0.4).abs() < 1e-5);
        assert!((state.current_velocity - (-0.1 / DT)).abs() < 1e-2);
        assert!(state.is_grounded(config.spring_rest_length));
    }

    #[test]
    fn no_force_at_rest_length_without_motion() {
        let state = SpringState {
            current_length: 0.6,
            current_velocity: 0.0,
        };
        assert_eq!(spring_force(state, 0.6, 15000.0, 2000.0), 0.0);
    }

    #[test]
    fn compression_pushes_and_damper_resists() {
        let compressed = SpringState {
            current_length: 0.4,
            current_velocity: 0.0,
        };
        assert!((spring_force(compressed, 0.6, 1000.0, 100.0) - 200.0).abs() < 1e-3);

        let extending = SpringState {
            current_length: 0.4,
            current_velocity: 1.0,
        };
        assert!((spring_force(extending, 0.6, 1000.0, 100.0) - 100.0).abs() < 1e-3);
    }

    #[test]
    fn forces_act_upward_at_each_mount() {
        let config = kart_config();
        let mut body = TestChassis::resting(0.4);
        let frames = frames_for(&body);
        let mut springs = WheelMap::from_fn(|_| SpringState {
            current_length: 0.4,
            current_velocity: 0.0,
        });
        update_suspension(&mut body, &mut springs, &frames, &config, DT);

        assert_eq!(body.forces.len(), 4);
        for (applied, wheel) in body.forces.iter().zip(WheelId::ALL) {
            assert_eq!(applied.point, Some(frames[wheel].mount));
            assert!(applied.force.x.abs() < 1e-6 && applied.force.z.abs() < 1e-6);
            assert!((applied.force.y - 0.2 * config.spring_strength).abs() < 1.0);
        }
    }
}
