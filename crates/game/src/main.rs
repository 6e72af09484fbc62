//! kart_sim - headless driver for the arcade vehicle simulation.
//!
//! Builds a flat track (with an optional ramp), spawns one owned kart and a
//! remote mirror of it, then plays a scripted input timeline through the
//! frame / fixed-tick loop and logs what happened.

mod config;
mod replication;
mod scenario;
mod state;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use engine_core::{Quat, Time, Vec3};
use hecs::World;
use physics::{PhysicsBody, PhysicsWorld};
use vehicle::{Authority, RapierChassis, VehicleController, VehicleTuning, WheelId, WheelVisuals};

use config::GameConfig;
use replication::{RemoteMirror, SnapshotFeed};
use scenario::InputScript;
use state::{grounded_wheels, RunStats, Vehicle};

/// Sideways distance between the owned kart and its remote mirror.
const MIRROR_OFFSET: Vec3 = Vec3::new(8.0, 0.0, 0.0);

/// Whole simulation state for one run.
struct SimState {
    world: World,
    time: Time,
    physics: PhysicsWorld,
    script: InputScript,
    feed: SnapshotFeed,
    stats: RunStats,
    config: GameConfig,
    next_report: f32,
}

impl SimState {
    fn new(config: GameConfig) -> Result<Self> {
        let tuning = VehicleTuning::load(&config.vehicle_path)
            .with_context(|| format!("loading vehicle tuning {}", config.vehicle_path))?;

        let mut time = Time::new();
        time.set_fixed_rate(config.fixed_rate_hz);

        let mut physics = PhysicsWorld::new();
        physics.set_timestep(time.fixed_timestep_seconds());
        physics.add_ground_plane();
        if config.ramp {
            // Gentle 8 degree kicker 30 m down the straight.
            physics.add_static_cuboid(
                Vec3::new(0.0, 0.0, -30.0),
                Quat::from_rotation_x(-8f32.to_radians()),
                Vec3::new(3.0, 0.5, 4.0),
            );
        }

        let half_extents = Vec3::from(config.half_extents);
        let spawn = Vec3::new(0.0, config.spawn_height, 0.0);
        let vehicle_config = Arc::new(tuning.vehicle);

        let mut world = World::new();

        let (body, collider) = physics.add_vehicle_chassis(spawn, half_extents, config.chassis_mass);
        let mut controller = VehicleController::new(vehicle_config.clone(), half_extents);
        let mut chassis =
            RapierChassis::new(&mut physics, body).context("chassis body missing after insert")?;
        controller.spawn(&mut chassis);
        let visuals = WheelVisuals::new(tuning.visual, &vehicle_config);
        world.spawn((
            Vehicle {
                controller,
                visuals,
                authority: Authority::Owner,
            },
            PhysicsBody::with_collider(body, collider),
        ));

        let mirror_body = physics.add_kinematic_box(spawn + MIRROR_OFFSET, half_extents);
        world.spawn((RemoteMirror::new(MIRROR_OFFSET), PhysicsBody::new(mirror_body)));

        physics.update_query_pipeline();

        log::info!(
            "Track ready: fixed {} Hz, frames {} Hz, {} s, ramp {}",
            config.fixed_rate_hz,
            config.frame_rate_hz,
            config.duration_secs,
            config.ramp
        );

        Ok(Self {
            world,
            time,
            physics,
            script: InputScript::new(config.script.clone()),
            feed: SnapshotFeed::default(),
            stats: RunStats::default(),
            next_report: config.report_interval_secs,
            config,
        })
    }

    fn run(&mut self) {
        let frame = Duration::from_secs_f64(1.0 / self.config.frame_rate_hz);
        // Measure the springs once while the chassis is still frozen; the first
        // frame may be shorter than a fixed step.
        self.fixed_update(self.time.fixed_timestep_seconds());
        while self.time.elapsed_seconds() < self.config.duration_secs {
            self.time.advance(frame);
            while self.time.should_fixed_update() {
                self.fixed_update(self.time.fixed_timestep_seconds());
            }
            self.frame_update(self.time.delta_seconds());
        }
    }

    /// One physics tick: every owned vehicle applies its forces, then the world steps.
    fn fixed_update(&mut self, dt: f32) {
        for (_, (vehicle, body)) in self.world.query_mut::<(&mut Vehicle, &PhysicsBody)>() {
            let Some(mut chassis) = RapierChassis::new(&mut self.physics, body.rigid_body) else {
                continue;
            };
            vehicle
                .controller
                .on_fixed_tick(vehicle.authority, &mut chassis, dt);
            if vehicle.authority.is_owner() {
                self.stats.record_tick(grounded_wheels(&vehicle.controller));
            }
        }
        self.physics.step();
    }

    /// One rendered frame: sample input, update visuals, publish and apply snapshots.
    fn frame_update(&mut self, dt: f32) {
        let elapsed = self.time.elapsed_seconds();
        let input = self.script.sample(elapsed);

        for (_, (vehicle, body)) in self.world.query_mut::<(&mut Vehicle, &PhysicsBody)>() {
            let Some(mut chassis) = RapierChassis::new(&mut self.physics, body.rigid_body) else {
                continue;
            };
            vehicle
                .controller
                .on_frame_tick(vehicle.authority, input, &mut chassis);
            let snapshot = vehicle.controller.snapshot(&chassis);
            vehicle.visuals.update(vehicle.authority, &snapshot, dt);

            if vehicle.authority.is_owner() {
                self.stats.record_frame(&snapshot);
                self.feed.publish(snapshot);

                if elapsed >= self.next_report {
                    self.next_report += self.config.report_interval_secs;
                    let fl = vehicle.visuals.pose(WheelId::FrontLeft);
                    log::info!(
                        "t={:5.2}s pos=({:6.2}, {:5.2}, {:7.2}) speed={:6.2} grounded={}/4 steer={:+.2} throttle={:+.2} wheel_y={:.3}",
                        elapsed,
                        snapshot.transform.position.x,
                        snapshot.transform.position.y,
                        snapshot.transform.position.z,
                        snapshot.forward_speed(),
                        grounded_wheels(&vehicle.controller),
                        snapshot.input.steer,
                        snapshot.input.throttle,
                        fl.height
                    );
                }
            }
        }

        if let Some(snapshot) = self.feed.take_latest() {
            for (_, (mirror, body)) in self.world.query_mut::<(&mut RemoteMirror, &PhysicsBody)>() {
                let pose = mirror.receive(snapshot);
                self.physics.set_kinematic_pose(body.rigid_body, &pose);
            }
        }
    }

    fn report(&self) {
        let stats = &self.stats;
        log::info!(
            "Run complete: {} frames, {} fixed ticks ({} airborne), top speed {:.2}, distance {:.2}, {} snapshots published",
            stats.frames,
            stats.fixed_ticks,
            stats.airborne_ticks,
            stats.top_speed,
            stats.distance,
            self.feed.published()
        );
        for (_, mirror) in self.world.query::<&RemoteMirror>().iter() {
            if let Some(last) = &mirror.last {
                let p = last.transform.position;
                log::info!(
                    "Remote mirror last saw the kart at ({:.2}, {:.2}, {:.2})",
                    p.x,
                    p.y,
                    p.z
                );
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting kart_sim");

    let config = GameConfig::load();
    let mut sim = SimState::new(config)?;
    sim.run();
    sim.report();

    Ok(())
}
