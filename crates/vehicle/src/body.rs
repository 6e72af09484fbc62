//! The rigid body a vehicle drives, and its Rapier implementation.

use engine_core::{Transform, Vec3};
use physics::rapier3d::prelude::{RigidBody, RigidBodyHandle};
use physics::{from_vector, to_point, to_vector, PhysicsWorld};

/// Everything the simulation needs from the physics engine for one chassis.
///
/// Forces accumulate until the engine integrates; implementations must not
/// apply them immediately.
pub trait ChassisBody {
    /// Current pose of the chassis.
    fn transform(&self) -> Transform;

    fn linear_velocity(&self) -> Vec3;

    /// Velocity of the chassis at a world-space point (linear + angular contribution).
    fn velocity_at_point(&self, point: Vec3) -> Vec3;

    /// Force through the centre of mass.
    fn add_force(&mut self, force: Vec3);

    fn add_force_at_point(&mut self, force: Vec3, point: Vec3);

    /// Distance to the first surface along `direction`, ignoring the chassis itself.
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32>;

    /// Frozen bodies are immovable and ignore forces.
    fn set_frozen(&mut self, frozen: bool);
}

/// A chassis living in a [`PhysicsWorld`].
pub struct RapierChassis<'w> {
    world: &'w mut PhysicsWorld,
    handle: RigidBodyHandle,
}

impl<'w> RapierChassis<'w> {
    /// Borrow the body behind `handle`, or `None` if it was removed.
    pub fn new(world: &'w mut PhysicsWorld, handle: RigidBodyHandle) -> Option<Self> {
        world.rigid_body_set.get(handle)?;
        Some(Self { world, handle })
    }

    fn body(&self) -> &RigidBody {
        &self.world.rigid_body_set[self.handle]
    }

    fn body_mut(&mut self) -> &mut RigidBody {
        &mut self.world.rigid_body_set[self.handle]
    }
}

impl ChassisBody for RapierChassis<'_> {
    fn transform(&self) -> Transform {
        let body = self.body();
        Transform::from_position_rotation(
            from_vector(body.translation()),
            physics::from_rotation(body.rotation()),
        )
    }

    fn linear_velocity(&self) -> Vec3 {
        from_vector(self.body().linvel())
    }

    fn velocity_at_point(&self, point: Vec3) -> Vec3 {
        from_vector(&self.body().velocity_at_point(&to_point(point)))
    }

    fn add_force(&mut self, force: Vec3) {
        self.body_mut().add_force(to_vector(force), true);
    }

    fn add_force_at_point(&mut self, force: Vec3, point: Vec3) {
        self.body_mut()
            .add_force_at_point(to_vector(force), to_point(point), true);
    }

    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32> {
        self.world
            .raycast_excluding(origin, direction, max_distance, self.handle)
            .map(|hit| hit.distance)
    }

    fn set_frozen(&mut self, frozen: bool) {
        self.world.set_body_frozen(self.handle, frozen);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{Authority, InputSample, VehicleController};
    use crate::testing::{kart_config, HALF_EXTENTS};
    use crate::wheel::WheelId;
    use std::sync::Arc;

    fn kart_world() -> (PhysicsWorld, RigidBodyHandle, VehicleController) {
        let mut world = PhysicsWorld::new();
        world.set_timestep(1.0 / 60.0);
        world.add_ground_plane();
        let (handle, _) = world.add_vehicle_chassis(Vec3::new(0.0, 0.9, 0.0), HALF_EXTENTS, 1000.0);
        world.update_query_pipeline();

        let mut controller = VehicleController::new(Arc::new(kart_config()), HALF_EXTENTS);
        controller.spawn(&mut RapierChassis::new(&mut world, handle).unwrap());
        (world, handle, controller)
    }

    /// One fixed tick followed by one frame tick, the order a game loop runs them in.
    fn run(
        world: &mut PhysicsWorld,
        handle: RigidBodyHandle,
        controller: &mut VehicleController,
        input: InputSample,
        ticks: usize,
    ) {
        let dt = world.timestep();
        for _ in 0..ticks {
            let mut chassis = RapierChassis::new(world, handle).unwrap();
            controller.on_fixed_tick(Authority::Owner, &mut chassis, dt);
            controller.on_frame_tick(Authority::Owner, input, &mut chassis);
            world.step();
        }
    }

    #[test]
    fn kart_settles_on_its_springs() {
        let (mut world, handle, mut controller) = kart_world();
        run(&mut world, handle, &mut controller, InputSample::default(), 120);

        for wheel in WheelId::ALL {
            assert!(controller.is_grounded(wheel), "{:?} should touch the ground", wheel);
        }
        let t = world.get_body_transform(handle).unwrap();
        assert!(t.position.y > 0.6 && t.position.y < 1.0, "ride height {}", t.position.y);
        assert!(world.get_body_velocity(handle).unwrap().length() < 0.3);
    }

    #[test]
    fn kart_drives_forward_and_turns_right() {
        let (mut world, handle, mut controller) = kart_world();
        run(&mut world, handle, &mut controller, InputSample::default(), 60);
        run(&mut world, handle, &mut controller, InputSample::new(0.0, 1.0), 180);

        let t = world.get_body_transform(handle).unwrap();
        let v = world.get_body_velocity(handle).unwrap();
        assert!(t.forward().dot(v) > 5.0, "forward speed {}", t.forward().dot(v));
        assert!(t.position.z < -5.0);

        run(&mut world, handle, &mut controller, InputSample::new(1.0, 1.0), 60);
        let t = world.get_body_transform(handle).unwrap();
        assert!(t.forward().x > 0.05, "forward after steering right: {:?}", t.forward());
    }

    #[test]
    fn missing_body_yields_none() {
        let mut world = PhysicsWorld::new();
        let (handle, _) = world.add_vehicle_chassis(Vec3::ZERO, Vec3::splat(0.5), 10.0);
        world.remove_body(handle);
        assert!(RapierChassis::new(&mut world, handle).is_none());
    }

    #[test]
    fn probes_ignore_own_collider() {
        let mut world = PhysicsWorld::new();
        world.add_ground_plane();
        let (handle, _) =
            world.add_vehicle_chassis(Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 0.4, 2.0), 500.0);
        world.update_query_pipeline();

        let chassis = RapierChassis::new(&mut world, handle).unwrap();
        let distance = chassis
            .cast_ray(Vec3::new(0.8, 0.6, -1.4), Vec3::NEG_Y, 1.0)
            .unwrap();
        assert!((distance - 0.6).abs() < 1e-4);
    }

    #[test]
    fn point_velocity_includes_spin() {
        let mut world = PhysicsWorld::new();
        let (handle, _) = world.add_vehicle_chassis(Vec3::ZERO, Vec3::splat(0.5), 10.0);
        world.rigid_body_set[handle].set_angvel(to_vector(Vec3::Y), true);

        let chassis = RapierChassis::new(&mut world, handle).unwrap();
        let v = chassis.velocity_at_point(Vec3::X);
        // w x r = Y x X = -Z
        assert!((v - Vec3::NEG_Z).length() < 1e-5);
    }
}
