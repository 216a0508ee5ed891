//! Core geometry types.
//!
//! - [`Vec3`]: world positions and directions (Y up)
//! - [`Pose`]: position + heading in degrees
//! - scalar helpers for interpolation and heading comparison

mod math;
mod pose;
mod vec3;

pub use math::{approx_degrees, clamp01, inverse_lerp, lerp, normalize_degrees};
pub use pose::{Pose, direction_from_yaw};
pub use vec3::Vec3;
