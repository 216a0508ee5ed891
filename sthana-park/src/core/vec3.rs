//! 3D vector type for world positions and directions.
//!
//! The world frame is Y-up. The ground plane is X/Z and headings are measured
//! about the Y axis.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

/// Below this squared magnitude a vector is treated as zero-length.
const DEGENERATE_SQ: f32 = 1e-12;

/// A point or direction in world space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    /// X coordinate (right).
    pub x: f32,
    /// Y coordinate (up).
    pub y: f32,
    /// Z coordinate (forward at zero yaw).
    pub z: f32,
}

impl Vec3 {
    /// Origin / zero vector.
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);

    /// World up axis.
    pub const UP: Vec3 = Vec3::new(0.0, 1.0, 0.0);

    /// Forward axis at zero yaw.
    pub const FORWARD: Vec3 = Vec3::new(0.0, 0.0, 1.0);

    /// Create a new vector.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Dot product.
    #[inline]
    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product.
    #[inline]
    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Squared length.
    #[inline]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Length.
    #[inline]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(self, other: Vec3) -> f32 {
        (self - other).length()
    }

    /// Unit vector in the same direction, or zero for a degenerate vector.
    #[inline]
    pub fn normalized(self) -> Vec3 {
        let len_sq = self.length_squared();
        if len_sq < DEGENERATE_SQ {
            Vec3::ZERO
        } else {
            self / len_sq.sqrt()
        }
    }

    /// Projection on the ground plane (Y dropped).
    #[inline]
    pub fn flattened(self) -> Vec3 {
        Vec3::new(self.x, 0.0, self.z)
    }

    /// Unsigned angle between two vectors in degrees, `[0, 180]`.
    ///
    /// Returns 0 when either vector is degenerate.
    pub fn angle(self, other: Vec3) -> f32 {
        let denom = (self.length_squared() * other.length_squared()).sqrt();
        if denom < DEGENERATE_SQ {
            return 0.0;
        }
        self.cross(other).length().atan2(self.dot(other)).to_degrees()
    }

    /// Signed angle from `self` to `to` in degrees, `[-180, 180]`.
    ///
    /// The sign follows `axis · (self × to)`; with `axis = UP` turning from
    /// +Z towards +X is positive.
    pub fn signed_angle(self, to: Vec3, axis: Vec3) -> f32 {
        let unsigned = self.angle(to);
        if axis.dot(self.cross(to)) < 0.0 {
            -unsigned
        } else {
            unsigned
        }
    }

    /// Linear interpolation between two points.
    #[inline]
    pub fn lerp(self, other: Vec3, t: f32) -> Vec3 {
        self + (other - self) * t
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    #[inline]
    fn add(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, other: Vec3) {
        *self = *self + other;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    #[inline]
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;

    #[inline]
    fn mul(self, s: f32) -> Vec3 {
        Vec3::new(self.x * s, self.y * s, self.z * s)
    }
}

impl Div<f32> for Vec3 {
    type Output = Vec3;

    #[inline]
    fn div(self, s: f32) -> Vec3 {
        Vec3::new(self.x / s, self.y / s, self.z / s)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;

    #[inline]
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}
