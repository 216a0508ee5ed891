//! Pedestrian proximity monitor.
//!
//! A forward pivot sensor fan picks up pedestrians. Once seen, a pedestrian
//! stays tracked for the rest of the episode and its distance to the vehicle
//! is measured every tick. Distances under `critical_distance` are averaged
//! and turned into a penalty when the episode ends; an episode that never came
//! that close earns a bonus instead.

use std::collections::HashSet;

use crate::config::{PedestrianSection, SensorMount};
use crate::core::{Pose, lerp};
use crate::world::{LayerMask, ObjectId, PhysicsQuery, Tag};

use super::fan::FanGeometry;

/// Tracks how close the vehicle came to pedestrians during an episode.
#[derive(Clone, Debug)]
pub struct PedestrianMonitor {
    enabled: bool,
    sensor: SensorMount,
    geometry: FanGeometry,
    radius: f32,
    layers: LayerMask,
    critical_distance: f32,
    far_penalty: f32,
    near_penalty: f32,
    clear_bonus: f32,

    tracked: Vec<ObjectId>,
    tracked_set: HashSet<ObjectId>,
    critical_sum: f32,
    critical_count: u32,
}

impl PedestrianMonitor {
    /// Create a monitor.
    pub fn new(config: &PedestrianSection) -> Self {
        Self {
            enabled: config.enabled,
            sensor: config.sensor.clone(),
            geometry: FanGeometry {
                rays_per_direction: config.rays_per_direction,
                max_degrees: config.max_ray_degrees,
                length: config.ray_length,
                start_offset: config.start_vertical_offset,
                end_offset: config.end_vertical_offset,
            },
            radius: config.sphere_cast_radius,
            layers: config.layers,
            critical_distance: config.critical_distance,
            far_penalty: config.far_penalty,
            near_penalty: config.near_penalty,
            clear_bonus: config.clear_bonus,
            tracked: Vec::new(),
            tracked_set: HashSet::new(),
            critical_sum: 0.0,
            critical_count: 0,
        }
    }

    /// Is the monitor active?
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Forget tracked pedestrians and accumulated distances.
    pub fn reset(&mut self) {
        self.tracked.clear();
        self.tracked_set.clear();
        self.critical_sum = 0.0;
        self.critical_count = 0;
        log::debug!("Pedestrian monitor reset");
    }

    /// Pedestrians struck by the pivot fan, in first-hit order.
    pub fn detect<P: PhysicsQuery + ?Sized>(&self, physics: &P, vehicle: Pose) -> Vec<ObjectId> {
        let sensor = vehicle.compose(self.sensor.offset, self.sensor.yaw);
        let mut found = Vec::new();
        for ray in self.geometry.rays(sensor) {
            let hit = physics.sphere_cast(
                ray.origin,
                ray.direction,
                self.radius,
                ray.length,
                self.layers,
            );
            match hit {
                Some(hit) if hit.tag == Tag::Pedestrian => {
                    if !found.contains(&hit.object) {
                        found.push(hit.object);
                    }
                }
                Some(hit) => log::trace!("Pivot ray hit {:?} {}", hit.tag, hit.object),
                None => {}
            }
        }
        found
    }

    /// Detect new pedestrians and sample distances to every tracked one.
    pub fn update<P: PhysicsQuery + ?Sized>(&mut self, physics: &P, vehicle: Pose) {
        if !self.enabled {
            return;
        }

        for id in self.detect(physics, vehicle) {
            if self.tracked_set.insert(id) {
                log::debug!("Tracking pedestrian {}", id);
                self.tracked.push(id);
            }
        }

        for id in &self.tracked {
            // Pedestrians removed by the host are skipped
            let Some(pose) = physics.object_pose(*id) else {
                continue;
            };
            let distance = vehicle.position.distance(pose.position);
            if distance < self.critical_distance {
                self.critical_sum += distance;
                self.critical_count += 1;
            }
        }
    }

    /// Pedestrians seen this episode.
    pub fn tracked(&self) -> &[ObjectId] {
        &self.tracked
    }

    /// Mean of all critical distance samples, if any.
    pub fn mean_critical_distance(&self) -> Option<f32> {
        if self.critical_count == 0 {
            None
        } else {
            Some(self.critical_sum / self.critical_count as f32)
        }
    }

    /// Episode score: penalty scaled by how close the vehicle came on
    /// average, or the bonus if it never entered the critical radius.
    ///
    /// `None` when the monitor is disabled.
    pub fn finalize(&self) -> Option<f32> {
        if !self.enabled {
            return None;
        }
        let score = match self.mean_critical_distance() {
            Some(mean) => {
                let t = (self.critical_distance - mean) / self.critical_distance;
                let penalty = lerp(self.far_penalty, self.near_penalty, t);
                log::info!(
                    "Pedestrian penalty {:.3} (mean critical distance {:.2})",
                    penalty,
                    mean
                );
                penalty
            }
            None => {
                log::info!(
                    "Pedestrian bonus {:.2}, never within {:.1}",
                    self.clear_bonus,
                    self.critical_distance
                );
                self.clear_bonus
            }
        };
        Some(score)
    }
}
