//! ECS components and run statistics for the driver.

use engine_core::Vec3;
use vehicle::{Authority, VehicleController, VehicleSnapshot, WheelId, WheelVisuals};

/// A simulated vehicle owned by some peer.
pub struct Vehicle {
    pub controller: VehicleController,
    pub visuals: WheelVisuals,
    pub authority: Authority,
}

/// Figures gathered over a run, reported at the end.
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub fixed_ticks: u64,
    pub frames: u64,
    pub top_speed: f32,
    pub distance: f32,
    /// Fixed ticks with no wheel on the ground.
    pub airborne_ticks: u64,
    last_position: Option<Vec3>,
}

impl RunStats {
    /// Fold in one frame's snapshot of the owned vehicle.
    pub fn record_frame(&mut self, snapshot: &VehicleSnapshot) {
        self.frames += 1;
        self.top_speed = self.top_speed.max(snapshot.forward_speed().abs());
        let position = snapshot.transform.position;
        if let Some(last) = self.last_position {
            self.distance += last.distance(position);
        }
        self.last_position = Some(position);
    }

    pub fn record_tick(&mut self, grounded_wheels: usize) {
        self.fixed_ticks += 1;
        if grounded_wheels == 0 {
            self.airborne_ticks += 1;
        }
    }
}

/// Number of wheels touching the ground.
pub fn grounded_wheels(controller: &VehicleController) -> usize {
    WheelId::ALL
        .into_iter()
        .filter(|&wheel| controller.is_grounded(wheel))
        .count()
}
