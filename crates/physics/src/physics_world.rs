//! Physics world management with Rapier3D.

use crate::collision::CollisionGroup;
use engine_core::{Quat, Transform, Vec3};
use rapier3d::na::{Isometry3, UnitQuaternion, Vector3};
use rapier3d::prelude::*;

/// Environment collision groups so static geometry (ground, ramps) collides with vehicles.
fn env_collision_groups() -> InteractionGroups {
    let (membership, filter) = CollisionGroup::environment();
    InteractionGroups::new(membership, filter)
}

fn vehicle_collision_groups() -> InteractionGroups {
    let (membership, filter) = CollisionGroup::vehicle();
    InteractionGroups::new(membership, filter)
}

/// Convert a glam vector into a Rapier vector.
pub fn to_vector(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

/// Convert a glam vector into a Rapier point.
pub fn to_point(v: Vec3) -> Point<Real> {
    point![v.x, v.y, v.z]
}

/// Convert a Rapier vector (or point coordinates) back into glam.
pub fn from_vector(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

/// Convert a Rapier rotation into a glam quaternion.
pub fn from_rotation(rot: &UnitQuaternion<Real>) -> Quat {
    Quat::from_xyzw(rot.i, rot.j, rot.k, rot.w)
}

fn to_rotation(q: Quat) -> UnitQuaternion<Real> {
    UnitQuaternion::from_quaternion(rapier3d::na::Quaternion::new(q.w, q.x, q.y, q.z))
}

/// Main physics world containing all simulation state.
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub gravity: Vector<Real>,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: DefaultBroadPhase,
    pub narrow_phase: NarrowPhase,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
    pub query_pipeline: QueryPipeline,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    /// Create a new physics world with default gravity.
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            gravity: vector![0.0, -9.81, 0.0],
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Set the integration step length. Must match the fixed tick handed to controllers.
    pub fn set_timestep(&mut self, dt: f32) {
        assert!(dt > 0.0 && dt.is_finite(), "physics timestep must be positive, got {dt}");
        self.integration_parameters.dt = dt;
    }

    /// Timestep used by [`PhysicsWorld::step`], in seconds.
    pub fn timestep(&self) -> f32 {
        self.integration_parameters.dt
    }

    /// Step the physics simulation.
    ///
    /// User forces are cleared afterwards: Rapier keeps them across steps,
    /// while controllers accumulate a fresh set every fixed tick.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );

        for (_, body) in self.rigid_body_set.iter_mut() {
            body.reset_forces(false);
        }
    }

    /// Update query pipeline for raycasting.
    pub fn update_query_pipeline(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// Add a vehicle chassis: a dynamic box body with an explicit mass.
    pub fn add_vehicle_chassis(
        &mut self,
        position: Vec3,
        half_extents: Vec3,
        mass: f32,
    ) -> (RigidBodyHandle, ColliderHandle) {
        let rigid_body = RigidBodyBuilder::dynamic()
            .translation(to_vector(position))
            .can_sleep(false)
            .build();
        let body_handle = self.rigid_body_set.insert(rigid_body);

        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .mass(mass)
            .collision_groups(vehicle_collision_groups())
            .build();
        let collider_handle =
            self.collider_set
                .insert_with_parent(collider, body_handle, &mut self.rigid_body_set);
        log::debug!(
            "Vehicle chassis {:?} at {:?} (half extents {:?}, mass {})",
            body_handle,
            position,
            half_extents,
            mass
        );
        (body_handle, collider_handle)
    }

    /// Add a kinematic box body (remote vehicles mirrored from replicated state).
    pub fn add_kinematic_box(&mut self, position: Vec3, half_extents: Vec3) -> RigidBodyHandle {
        let rigid_body = RigidBodyBuilder::kinematic_position_based()
            .translation(to_vector(position))
            .build();
        let handle = self.rigid_body_set.insert(rigid_body);
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .collision_groups(vehicle_collision_groups())
            .build();
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);
        handle
    }

    /// Add a ground plane collider (flat Y=0 half-space).
    pub fn add_ground_plane(&mut self) -> ColliderHandle {
        let collider = ColliderBuilder::halfspace(Vector::y_axis())
            .collision_groups(env_collision_groups())
            .build();
        self.collider_set.insert(collider)
    }

    /// Add a static cuboid collider (e.g. ramps). No parent body; collider is fixed in world.
    /// `translation`: world position of center. `rotation`: orientation of the box.
    /// `half_extents`: half sizes in local X, Y, Z (after rotation).
    pub fn add_static_cuboid(
        &mut self,
        translation: Vec3,
        rotation: Quat,
        half_extents: Vec3,
    ) -> ColliderHandle {
        let position = Isometry3::from_parts(
            Vector3::new(translation.x, translation.y, translation.z).into(),
            to_rotation(rotation),
        );
        let collider = ColliderBuilder::cuboid(
            half_extents.x as Real,
            half_extents.y as Real,
            half_extents.z as Real,
        )
        .position(position)
        .collision_groups(env_collision_groups())
        .build();
        self.collider_set.insert(collider)
    }

    /// Get the transform of a rigid body.
    pub fn get_body_transform(&self, handle: RigidBodyHandle) -> Option<Transform> {
        self.rigid_body_set.get(handle).map(|body| {
            let pos = body.translation();
            Transform {
                position: from_vector(pos),
                rotation: from_rotation(body.rotation()),
                scale: Vec3::ONE,
            }
        })
    }

    /// Get the linear velocity of a rigid body.
    pub fn get_body_velocity(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.rigid_body_set
            .get(handle)
            .map(|body| from_vector(body.linvel()))
    }

    /// Set the target pose of a kinematic body for the next step.
    pub fn set_kinematic_pose(&mut self, handle: RigidBodyHandle, pose: &Transform) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_next_kinematic_position(Isometry3::from_parts(
                to_vector(pose.position).into(),
                to_rotation(pose.rotation),
            ));
        }
    }

    /// Switch a body between kinematic (frozen, ignores forces) and dynamic.
    pub fn set_body_frozen(&mut self, handle: RigidBodyHandle, frozen: bool) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            let body_type = if frozen {
                RigidBodyType::KinematicPositionBased
            } else {
                RigidBodyType::Dynamic
            };
            body.set_body_type(body_type, true);
        }
    }

    /// Whether a body currently ignores forces.
    pub fn is_body_frozen(&self, handle: RigidBodyHandle) -> bool {
        self.rigid_body_set
            .get(handle)
            .map_or(false, |body| body.is_kinematic())
    }

    /// Remove a rigid body and its colliders.
    pub fn remove_body(&mut self, handle: RigidBodyHandle) {
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
    }
}
