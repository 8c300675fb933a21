//! Planar geometry helpers shared by the collision resolvers
//!
//! Everything here is pure: no allocation beyond the returned value and no
//! failure cases.

use glam::Vec2;

/// Euclidean length of a vector
#[inline]
pub fn length(v: Vec2) -> f32 {
    v.dot(v).sqrt()
}

/// Project `p` onto the segment `[a, b]`
///
/// A degenerate segment (`a == b`) projects everything onto `a`.
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.dot(ab);

    if len_sq == 0.0 {
        return a;
    }

    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Rotate every vertex about `vertices[pivot]` by `angle_deg` degrees
///
/// Uses the standard rotation matrix, which turns clockwise on a y-down
/// screen. The input is left untouched.
pub fn rotate_polygon<const N: usize>(
    vertices: &[Vec2; N],
    pivot: usize,
    angle_deg: f32,
) -> [Vec2; N] {
    let center = vertices[pivot];
    let rotation = Vec2::from_angle(angle_deg.to_radians());
    vertices.map(|v| center + rotation.rotate(v - center))
}
