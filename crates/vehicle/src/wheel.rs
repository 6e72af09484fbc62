//! Wheel identifiers, per-wheel storage and mount geometry.

use crate::config::VehicleConfig;
use crate::traction::{roll_direction, slide_direction};
use engine_core::{Transform, Vec3};
use std::ops::{Index, IndexMut};

/// The four wheels of a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WheelId {
    FrontLeft,
    FrontRight,
    BackLeft,
    BackRight,
}

impl WheelId {
    pub const ALL: [WheelId; 4] = [
        WheelId::FrontLeft,
        WheelId::FrontRight,
        WheelId::BackLeft,
        WheelId::BackRight,
    ];

    /// Steerable wheels.
    pub const FRONT: [WheelId; 2] = [WheelId::FrontLeft, WheelId::FrontRight];

    /// Braked wheels.
    pub const BACK: [WheelId; 2] = [WheelId::BackLeft, WheelId::BackRight];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_front(self) -> bool {
        matches!(self, WheelId::FrontLeft | WheelId::FrontRight)
    }

    pub fn is_left(self) -> bool {
        matches!(self, WheelId::FrontLeft | WheelId::BackLeft)
    }
}

/// One value per wheel, stored inline and indexed by [`WheelId`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelMap<T>([T; 4]);

impl<T> WheelMap<T> {
    pub fn from_fn(f: impl FnMut(WheelId) -> T) -> Self {
        Self(WheelId::ALL.map(f))
    }

    pub fn iter(&self) -> impl Iterator<Item = (WheelId, &T)> {
        WheelId::ALL.into_iter().zip(self.0.iter())
    }
}

impl<T> Index<WheelId> for WheelMap<T> {
    type Output = T;

    fn index(&self, wheel: WheelId) -> &T {
        &self.0[wheel.index()]
    }
}

impl<T> IndexMut<WheelId> for WheelMap<T> {
    fn index_mut(&mut self, wheel: WheelId) -> &mut T {
        &mut self.0[wheel.index()]
    }
}

/// Where the wheels sit on a box chassis.
///
/// Local frame: +X right, +Y up, -Z forward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelLayout {
    pub half_extents: Vec3,
    pub padding_x: f32,
    pub padding_z: f32,
}

impl WheelLayout {
    pub fn new(half_extents: Vec3, config: &VehicleConfig) -> Self {
        Self {
            half_extents,
            padding_x: config.wheels_padding_x,
            padding_z: config.wheels_padding_z,
        }
    }

    /// Full box size, used as the drag area proxy.
    pub fn size(&self) -> Vec3 {
        self.half_extents * 2.0
    }

    /// Wheel position at the chassis' mid-height, in local space.
    pub fn torque_offset(&self, wheel: WheelId) -> Vec3 {
        let x = self.half_extents.x * (1.0 - 2.0 * self.padding_x);
        let z = self.half_extents.z * (1.0 - 2.0 * self.padding_z);
        Vec3::new(
            if wheel.is_left() { -x } else { x },
            0.0,
            if wheel.is_front() { -z } else { z },
        )
    }

    /// Spring mount on the chassis' bottom face, in local space.
    pub fn spring_offset(&self, wheel: WheelId) -> Vec3 {
        self.torque_offset(wheel) - Vec3::Y * self.half_extents.y
    }
}

/// World-space geometry of one wheel for the current tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelFrame {
    /// Spring mount: ray origin, suspension force point, velocity sample point.
    pub mount: Vec3,
    /// Where traction, drive and brake forces act.
    pub torque_point: Vec3,
    pub roll_direction: Vec3,
    pub slide_direction: Vec3,
}

impl WheelFrame {
    /// Build all four frames from the chassis pose and the current steer (-1..1).
    pub fn compute(
        layout: &WheelLayout,
        transform: &Transform,
        steer: f32,
        steer_angle: f32,
    ) -> WheelMap<WheelFrame> {
        let up = transform.up();
        WheelMap::from_fn(|wheel| {
            let roll = roll_direction(wheel, transform, steer, steer_angle);
            WheelFrame {
                mount: transform.transform_point(layout.spring_offset(wheel)),
                torque_point: transform.transform_point(layout.torque_offset(wheel)),
                roll_direction: roll,
                slide_direction: slide_direction(up, roll),
            }
        })
    }
}
