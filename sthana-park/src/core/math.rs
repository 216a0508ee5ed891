//! Scalar helpers shared by scoring and geometry.

/// Clamp to `[0, 1]`.
#[inline]
pub fn clamp01(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Linear interpolation with `t` clamped to `[0, 1]`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * clamp01(t)
}

/// Where `value` sits between `a` and `b`, clamped to `[0, 1]`.
///
/// Returns 0 for an empty range.
#[inline]
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if (b - a).abs() < f32::EPSILON {
        return 0.0;
    }
    clamp01((value - a) / (b - a))
}

/// Normalize an angle in degrees to `[0, 360)`.
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Wrap-aware equality of two headings in degrees.
#[inline]
pub fn approx_degrees(a: f32, b: f32, tolerance: f32) -> bool {
    let diff = (normalize_degrees(a) - normalize_degrees(b)).abs();
    diff.min(360.0 - diff) <= tolerance
}
