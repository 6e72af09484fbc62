//! Owner-to-peer snapshot hand-off.
//!
//! The owning peer publishes one [`VehicleSnapshot`] per frame; remote peers
//! only ever read them to place a kinematic stand-in. Transport is out of
//! scope here, so the feed is an in-process queue.

use engine_core::{Transform, Vec3};
use std::collections::VecDeque;
use vehicle::VehicleSnapshot;

/// Snapshots in flight from the owner to its remote peers.
#[derive(Debug, Default)]
pub struct SnapshotFeed {
    queue: VecDeque<VehicleSnapshot>,
    published: u64,
}

impl SnapshotFeed {
    /// Oldest snapshots are dropped once this many are waiting.
    const CAPACITY: usize = 8;

    pub fn publish(&mut self, snapshot: VehicleSnapshot) {
        if self.queue.len() == Self::CAPACITY {
            self.queue.pop_front();
        }
        self.queue.push_back(snapshot);
        self.published += 1;
    }

    /// Drain everything received and keep only the newest.
    pub fn take_latest(&mut self) -> Option<VehicleSnapshot> {
        let latest = self.queue.pop_back();
        self.queue.clear();
        latest
    }

    pub fn published(&self) -> u64 {
        self.published
    }
}

/// Remote peer's view of a vehicle, drawn beside the owner's.
#[derive(Debug, Clone)]
pub struct RemoteMirror {
    /// World offset from the owner's pose, so the two bodies never overlap.
    pub offset: Vec3,
    pub last: Option<VehicleSnapshot>,
}

impl RemoteMirror {
    pub fn new(offset: Vec3) -> Self {
        Self { offset, last: None }
    }

    /// Accept a snapshot and return the pose the stand-in should move to.
    pub fn receive(&mut self, snapshot: VehicleSnapshot) -> Transform {
        self.last = Some(snapshot);
        let mut pose = snapshot.transform;
        pose.translate(self.offset);
        pose
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vehicle::{InputSample, WheelMap};

    fn snapshot_at(z: f32) -> VehicleSnapshot {
        VehicleSnapshot {
            transform: Transform::from_position(Vec3::new(0.0, 1.0, z)),
            linear_velocity: Vec3::ZERO,
            springs: WheelMap::default(),
            input: InputSample::default(),
        }
    }

    #[test]
    fn feed_keeps_only_the_newest() {
        let mut feed = SnapshotFeed::default();
        assert!(feed.take_latest().is_none());
        for i in 0..20 {
            feed.publish(snapshot_at(i as f32));
        }
        assert_eq!(feed.published(), 20);
        let latest = feed.take_latest().unwrap();
        assert_eq!(latest.transform.position.z, 19.0);
        assert!(feed.take_latest().is_none());
    }

    #[test]
    fn mirror_follows_with_offset() {
        let mut mirror = RemoteMirror::new(Vec3::new(8.0, 0.0, 0.0));
        let pose = mirror.receive(snapshot_at(-3.0));
        assert_eq!(pose.position, Vec3::new(8.0, 1.0, -3.0));
        assert!(mirror.last.is_some());
    }
}
