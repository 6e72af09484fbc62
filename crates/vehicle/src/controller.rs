//! Per-vehicle simulation step.
//!
//! The host calls [`VehicleController::on_frame_tick`] once per rendered frame
//! and [`VehicleController::on_fixed_tick`] once per physics step. Only the
//! authoritative owner of a vehicle simulates it; every other peer leaves the
//! body alone and renders replicated [`VehicleSnapshot`]s.

use crate::aero::update_air_resistance;
use crate::body::ChassisBody;
use crate::config::VehicleConfig;
use crate::drivetrain::{update_acceleration, update_brakes};
use crate::snapshot::VehicleSnapshot;
use crate::suspension::{cast_springs, update_suspension, SpringState};
use crate::traction::update_traction;
use crate::wheel::{WheelFrame, WheelId, WheelLayout, WheelMap};
use engine_core::Vec3;
use std::sync::Arc;

/// Who owns a vehicle from this peer's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authority {
    /// This peer simulates the vehicle and broadcasts its state.
    Owner,
    /// Another peer does; this one only renders what it receives.
    Remote,
}

impl Authority {
    pub fn is_owner(self) -> bool {
        self == Authority::Owner
    }
}

/// Driver input for one frame. Both axes live in `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputSample {
    /// Positive steers right.
    pub steer: f32,
    /// Positive drives forward, negative reverses.
    pub throttle: f32,
}

impl InputSample {
    pub fn new(steer: f32, throttle: f32) -> Self {
        Self { steer, throttle }.clamped()
    }

    pub fn clamped(self) -> Self {
        Self {
            steer: self.steer.clamp(-1.0, 1.0),
            throttle: self.throttle.clamp(-1.0, 1.0),
        }
    }
}

/// Spawn guard: the chassis stays immovable for one owned frame so it can
/// settle before forces are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnPhase {
    Frozen { frames_since_spawn: u32 },
    Active,
}

/// Frames an owned vehicle stays frozen after spawning.
pub const SPAWN_FREEZE_FRAMES: u32 = 1;

/// Runtime state of one vehicle.
#[derive(Debug, Clone)]
pub struct VehicleController {
    config: Arc<VehicleConfig>,
    layout: WheelLayout,
    springs: WheelMap<SpringState>,
    input: InputSample,
    phase: SpawnPhase,
}

impl VehicleController {
    /// Build a controller for a box chassis with the given half extents.
    ///
    /// Panics on a non-positive rest length: every spring ratio divides by it.
    pub fn new(config: Arc<VehicleConfig>, half_extents: Vec3) -> Self {
        assert!(
            config.spring_rest_length > 0.0 && config.spring_rest_length.is_finite(),
            "spring_rest_length must be positive, got {}",
            config.spring_rest_length
        );
        let layout = WheelLayout::new(half_extents, &config);
        Self {
            config,
            layout,
            springs: WheelMap::default(),
            input: InputSample::default(),
            phase: SpawnPhase::Frozen {
                frames_since_spawn: 0,
            },
        }
    }

    /// Freeze the chassis and reset springs. Call once when the vehicle appears.
    pub fn spawn<B: ChassisBody + ?Sized>(&mut self, body: &mut B) {
        body.set_frozen(true);
        self.springs = WheelMap::default();
        self.input = InputSample::default();
        self.phase = SpawnPhase::Frozen {
            frames_since_spawn: 0,
        };
        log::debug!("Vehicle spawned frozen");
    }

    /// Variable-rate tick: latch input and advance the spawn guard.
    pub fn on_frame_tick<B: ChassisBody + ?Sized>(
        &mut self,
        authority: Authority,
        input: InputSample,
        body: &mut B,
    ) {
        if !authority.is_owner() {
            return;
        }

        self.input = input.clamped();

        if let SpawnPhase::Frozen { frames_since_spawn } = &mut self.phase {
            *frames_since_spawn += 1;
            if *frames_since_spawn >= SPAWN_FREEZE_FRAMES {
                body.set_frozen(false);
                self.phase = SpawnPhase::Active;
                log::debug!("Vehicle released after spawn");
            }
        }
    }

    /// Fixed-rate tick: suspension, traction, acceleration, brakes, air resistance.
    ///
    /// The order matters; every stage reads the spring state written by the
    /// suspension pass of the same tick.
    pub fn on_fixed_tick<B: ChassisBody + ?Sized>(
        &mut self,
        authority: Authority,
        body: &mut B,
        dt: f32,
    ) {
        if !authority.is_owner() {
            return;
        }
        assert!(dt > 0.0 && dt.is_finite(), "fixed timestep must be positive, got {dt}");

        let transform = body.transform();
        let frames = WheelFrame::compute(
            &self.layout,
            &transform,
            self.input.steer,
            self.config.steer_angle,
        );

        if self.is_frozen() {
            // Forces would be ignored by the frozen body; keep the springs current
            // so the first free tick does not see a jump from zero length.
            cast_springs(body, &mut self.springs, &frames, &self.config, dt);
            return;
        }

        let config = &*self.config;
        update_suspension(body, &mut self.springs, &frames, config, dt);
        update_traction(body, &self.springs, &frames, config, dt);
        update_acceleration(body, &self.springs, &frames, config, self.input.throttle);
        update_brakes(body, &self.springs, &frames, config, self.input.throttle, dt);
        update_air_resistance(body, config.air_resistance, self.layout.size());
    }

    /// Read-only state for presentation and replication.
    pub fn snapshot<B: ChassisBody + ?Sized>(&self, body: &B) -> VehicleSnapshot {
        VehicleSnapshot {
            transform: body.transform(),
            linear_velocity: body.linear_velocity(),
            springs: self.springs,
            input: self.input,
        }
    }

    pub fn layout(&self) -> &WheelLayout {
        &self.layout
    }

    pub fn spring(&self, wheel: WheelId) -> SpringState {
        self.springs[wheel]
    }

    pub fn is_grounded(&self, wheel: WheelId) -> bool {
        self.springs[wheel].is_grounded(self.config.spring_rest_length)
    }

    pub fn input(&self) -> InputSample {
        self.input
    }

    pub fn phase(&self) -> SpawnPhase {
        self.phase
    }

    pub fn is_frozen(&self) -> bool {
        matches!(self.phase, SpawnPhase::Frozen { .. })
    }
}
