//! Pose type: world position plus heading about the up axis.
//!
//! Heading (`yaw`) is in degrees. Zero yaw faces +Z and yaw grows clockwise seen
//! from above, so a right turn produces a positive signed angle.

use serde::{Deserialize, Serialize};

use super::math::normalize_degrees;
use super::vec3::Vec3;

/// Position and heading of an object in the world.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// World position.
    pub position: Vec3,
    /// Heading in degrees, normalized to `[0, 360)`.
    pub yaw: f32,
}

impl Pose {
    /// Create a new pose. The yaw is normalized.
    #[inline]
    pub fn new(position: Vec3, yaw: f32) -> Self {
        Self {
            position,
            yaw: normalize_degrees(yaw),
        }
    }

    /// Pose at the origin facing +Z.
    #[inline]
    pub const fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
        }
    }

    /// Unit forward vector on the ground plane.
    #[inline]
    pub fn forward(&self) -> Vec3 {
        direction_from_yaw(self.yaw)
    }

    /// Unit right vector on the ground plane.
    #[inline]
    pub fn right(&self) -> Vec3 {
        direction_from_yaw(self.yaw + 90.0)
    }

    /// Forward vector rotated by `delta` degrees about the up axis.
    #[inline]
    pub fn rotated_direction(&self, delta: f32) -> Vec3 {
        direction_from_yaw(self.yaw + delta)
    }

    /// Transform a point expressed in this pose's frame into the world.
    ///
    /// Local axes: X right, Y up, Z forward.
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.right() * local.x + Vec3::UP * local.y + self.forward() * local.z
    }

    /// Compose a child pose mounted at `offset` and rotated by `yaw` on this pose.
    pub fn compose(&self, offset: Vec3, yaw: f32) -> Pose {
        Pose::new(self.transform_point(offset), self.yaw + yaw)
    }
}

/// Unit direction on the ground plane for a heading in degrees.
#[inline]
pub fn direction_from_yaw(yaw: f32) -> Vec3 {
    let rad = yaw.to_radians();
    Vec3::new(rad.sin(), 0.0, rad.cos())
}
