use nalgebra::{Point2, Vector3};

/// Small value for float comparisons in pixel space.
pub const EPSILON: f32 = 1e-5;

/// Twice the signed area of the 2D triangle (v1, v2, v3); positive for
/// counter-clockwise winding.
#[inline]
pub fn triangle_area_x2(v1: Point2<f32>, v2: Point2<f32>, v3: Point2<f32>) -> f32 {
    let e1 = v2 - v1;
    let e2 = v3 - v1;
    e1.x * e2.y - e1.y * e2.x
}

/// Whether the triangle is too thin (or too broken) to cover anything.
#[inline]
pub fn is_degenerate(v1: Point2<f32>, v2: Point2<f32>, v3: Point2<f32>) -> bool {
    let area_x2 = triangle_area_x2(v1, v2, v3);
    !area_x2.is_finite() || area_x2.abs() < EPSILON
}

/// Calculates barycentric coordinates (alpha, beta, gamma) for point p
/// with respect to the 2D triangle (v1, v2, v3).
/// Returns None if the triangle is degenerate.
/// Alpha corresponds to v1, Beta to v2, Gamma to v3.
pub fn barycentric_coordinates(
    p: Point2<f32>,
    v1: Point2<f32>,
    v2: Point2<f32>,
    v3: Point2<f32>,
) -> Option<Vector3<f32>> {
    if is_degenerate(v1, v2, v3) {
        return None;
    }

    let e1 = v2 - v1;
    let e2 = v3 - v1;
    let p_v1 = p - v1;
    let total_area_x2 = triangle_area_x2(v1, v2, v3);

    let inv_total_area_x2 = 1.0 / total_area_x2;

    let beta = (p_v1.x * e2.y - p_v1.y * e2.x) * inv_total_area_x2;
    let gamma = (e1.x * p_v1.y - e1.y * p_v1.x) * inv_total_area_x2;
    let alpha = 1.0 - beta - gamma;

    Some(Vector3::new(alpha, beta, gamma))
}

/// Edge-inclusive coverage: every weight must lie in `[0, 1]`.
///
/// Pixels on an edge shared by two triangles are covered by both.
#[inline(always)]
pub fn is_inside_triangle(bary: Vector3<f32>) -> bool {
    bary.x >= 0.0 && bary.y >= 0.0 && bary.z >= 0.0
}

/// Parameter of the point on segment `a..b` closest to `p`, clamped to `[0, 1]`.
/// A segment shorter than [`EPSILON`] yields 0.
pub fn closest_point_parameter(p: Point2<f32>, a: Point2<f32>, b: Point2<f32>) -> f32 {
    let ab = b - a;
    let length_squared = ab.norm_squared();
    if length_squared < EPSILON * EPSILON {
        return 0.0;
    }
    ((p - a).dot(&ab) / length_squared).clamp(0.0, 1.0)
}
