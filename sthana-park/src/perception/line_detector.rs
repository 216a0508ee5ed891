//! Floor-marking detection with multi-pass ray fans.

use std::collections::HashSet;

use crate::config::{DetectorSection, SensorMount};
use crate::core::Pose;
use crate::world::{LayerMask, PhysicsQuery, Tag};

use super::fan::FanGeometry;
use super::marking::{LineMarker, MarkingSet};

/// Sensors mounted on the vehicle.
///
/// Mounts are stored in the vehicle frame; world poses are derived from the
/// vehicle pose each time the rig is swept.
#[derive(Clone, Debug, Default)]
pub struct SensorRig {
    mounts: Vec<SensorMount>,
}

impl SensorRig {
    /// Create a rig from mounts.
    pub fn new(mounts: Vec<SensorMount>) -> Self {
        Self { mounts }
    }

    /// Rig with the detector's configured roof sensors.
    pub fn from_config(config: &DetectorSection) -> Self {
        Self::new(config.sensors.clone())
    }

    /// Mounts in configuration order.
    pub fn mounts(&self) -> &[SensorMount] {
        &self.mounts
    }

    /// Number of sensors.
    pub fn len(&self) -> usize {
        self.mounts.len()
    }

    /// True if no sensor is mounted.
    pub fn is_empty(&self) -> bool {
        self.mounts.is_empty()
    }

    /// World pose of every sensor for a vehicle at `vehicle`.
    pub fn world_poses(&self, vehicle: Pose) -> Vec<Pose> {
        self.mounts
            .iter()
            .map(|mount| vehicle.compose(mount.offset, mount.yaw))
            .collect()
    }
}

/// Casts sphere fans from each sensor and collects the markings they strike.
///
/// Every sensor casts `passes` fans. Pass `k` lowers the fan end by `k/2` and
/// drops two rays per side, so later passes look closer to the vehicle.
#[derive(Clone, Debug)]
pub struct LineDetector {
    geometry: FanGeometry,
    passes: usize,
    radius: f32,
    layers: LayerMask,
}

impl LineDetector {
    /// Create a detector from configuration.
    pub fn new(config: &DetectorSection) -> Self {
        Self {
            geometry: FanGeometry {
                rays_per_direction: config.rays_per_direction,
                max_degrees: config.max_ray_degrees,
                length: config.ray_length,
                start_offset: config.start_vertical_offset,
                end_offset: config.end_vertical_offset,
            },
            passes: config.passes_per_sensor.max(1),
            radius: config.sphere_cast_radius,
            layers: config.layers,
        }
    }

    /// Base fan geometry (pass 0).
    pub fn geometry(&self) -> &FanGeometry {
        &self.geometry
    }

    /// Distinct markings struck from the given sensor poses.
    ///
    /// Results are ordered by first hit. A ray whose first contact is not a
    /// marking contributes nothing.
    pub fn detect<P: PhysicsQuery + ?Sized>(
        &self,
        physics: &P,
        sensors: &[Pose],
    ) -> Vec<LineMarker> {
        let mut seen = HashSet::new();
        let mut found = Vec::new();

        for sensor in sensors {
            for pass in 0..self.passes {
                let fan = self.geometry.for_pass(pass);
                for ray in fan.rays(*sensor) {
                    let Some(hit) = physics.sphere_cast(
                        ray.origin,
                        ray.direction,
                        self.radius,
                        ray.length,
                        self.layers,
                    ) else {
                        continue;
                    };
                    if hit.tag != Tag::Line {
                        continue;
                    }
                    if seen.insert(hit.object) {
                        log::trace!(
                            "Marking {} hit at ({:.2}, {:.2}, {:.2})",
                            hit.object,
                            hit.point.x,
                            hit.point.y,
                            hit.point.z
                        );
                        found.push(LineMarker::from_pose(hit.object, hit.object_pose));
                    }
                }
            }
        }

        found
    }

    /// Sweep the rig around `vehicle` and merge new markings into `history`.
    ///
    /// Returns the number of markings added.
    pub fn scan<P: PhysicsQuery + ?Sized>(
        &self,
        physics: &P,
        rig: &SensorRig,
        vehicle: Pose,
        history: &mut MarkingSet,
    ) -> usize {
        if rig.is_empty() {
            return 0;
        }
        let detected = self.detect(physics, &rig.world_poses(vehicle));
        let added = history.extend(detected);
        if added > 0 {
            log::debug!(
                "Detected {} new markings ({} total)",
                added,
                history.len()
            );
        }
        added
    }
}
