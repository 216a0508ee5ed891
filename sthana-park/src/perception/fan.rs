//! Ray fan geometry shared by the marking detector and the pedestrian monitor.
//!
//! A fan is `2n + 1` rays spread evenly over `[-max, +max]` degrees around the
//! sensor heading. Each ray starts above the sensor and points at a target
//! `length` meters ahead, shifted vertically by the end offset, so a negative
//! end offset tilts the ray down towards the floor.

use crate::core::{Pose, Vec3};

/// One ray of a fan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FanRay {
    /// Ray start in world space.
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
    /// Maximum cast distance.
    pub length: f32,
}

/// Shape of a fan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FanGeometry {
    /// Rays on each side of the heading.
    pub rays_per_direction: i32,
    /// Half-width of the fan (degrees).
    pub max_degrees: f32,
    /// Ray length (meters).
    pub length: f32,
    /// Vertical offset of the ray start (meters).
    pub start_offset: f32,
    /// Vertical offset of the ray end (meters).
    pub end_offset: f32,
}

impl FanGeometry {
    /// Geometry for pass `index` of a multi-pass sensor.
    ///
    /// Each pass lowers the end offset by `index / 2` and drops two rays per side,
    /// keeping at least the center ray.
    pub fn for_pass(&self, index: usize) -> FanGeometry {
        let index_f = index as f32;
        let rays = self.rays_per_direction - 2 * index as i32;
        FanGeometry {
            rays_per_direction: rays.max(0),
            end_offset: self.end_offset - index_f / 2.0,
            ..*self
        }
    }

    /// Angle between neighbouring rays (degrees).
    pub fn angle_step(&self) -> f32 {
        if self.rays_per_direction <= 0 {
            0.0
        } else {
            self.max_degrees / self.rays_per_direction as f32
        }
    }

    /// Number of rays in the fan.
    pub fn ray_count(&self) -> usize {
        (2 * self.rays_per_direction.max(0) + 1) as usize
    }

    /// Rays of this fan for a sensor at `sensor`.
    pub fn rays(&self, sensor: Pose) -> impl Iterator<Item = FanRay> + '_ {
        let step = self.angle_step();
        let n = self.rays_per_direction.max(0);
        let origin = sensor.position + Vec3::UP * self.start_offset;

        (-n..=n).map(move |i| {
            let heading = sensor.rotated_direction(step * i as f32);
            let end = sensor.position + heading * self.length + Vec3::UP * self.end_offset;
            FanRay {
                origin,
                direction: (end - origin).normalized(),
                length: self.length,
            }
        })
    }
}
