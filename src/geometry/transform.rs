use log::warn;
use nalgebra::{Matrix4, Point2, Point3, Vector3, Vector4};

const W_EPSILON: f32 = 1e-8;

/// Projects a homogeneous position to pixel coordinates.
///
/// The position is divided by `w`, then NDC `[-1, 1]` maps to `[0, width]`
/// and `[0, height]`. The y axis is **not** flipped: NDC `y = -1` is pixel row
/// 0, the bottom of the frame buffer.
///
/// Returns `None` when `w` is (nearly) zero or the result is not finite.
pub fn ndc_to_pixel(position: &Vector4<f32>, width: usize, height: usize) -> Option<Point2<f32>> {
    let w = position.w;
    if !w.is_finite() || w.abs() < W_EPSILON {
        return None;
    }
    let pixel_x = (position.x / w + 1.0) * 0.5 * width as f32;
    let pixel_y = (position.y / w + 1.0) * 0.5 * height as f32;

    if pixel_x.is_finite() && pixel_y.is_finite() {
        Some(Point2::new(pixel_x, pixel_y))
    } else {
        None
    }
}

/// View matrix that keeps square NDC shapes square on a non-square frame.
///
/// The longer axis is scaled down by the aspect ratio; everything else is the
/// identity.
pub fn aspect_ratio_view(width: usize, height: usize) -> Matrix4<f32> {
    let mut view = Matrix4::identity();
    if width == 0 || height == 0 {
        return view;
    }
    let aspect_ratio = width as f32 / height as f32;
    if aspect_ratio < 1.0 {
        view[(0, 0)] = aspect_ratio;
    } else {
        view[(1, 1)] = 1.0 / aspect_ratio;
    }
    view
}

/// Unit normal of the triangle `(v0, v1, v2)` with counter-clockwise winding,
/// or zero for a degenerate face.
pub fn face_normal(v0: &Point3<f32>, v1: &Point3<f32>, v2: &Point3<f32>) -> Vector3<f32> {
    let normal = (v1 - v0).cross(&(v2 - v0));
    let norm_squared = normal.norm_squared();
    if norm_squared > 1e-12 {
        normal / norm_squared.sqrt()
    } else {
        Vector3::zeros()
    }
}

/// Generates smooth vertex normals by averaging the normals of adjacent faces.
///
/// Vertices that belong to no (or only degenerate) faces get a zero normal.
pub fn smooth_vertex_normals(vertices: &[Point3<f32>], faces: &[[usize; 3]]) -> Vec<Vector3<f32>> {
    let mut vertex_normals = vec![Vector3::zeros(); vertices.len()];

    for face in faces {
        let [i0, i1, i2] = *face;
        let (Some(v0), Some(v1), Some(v2)) =
            (vertices.get(i0), vertices.get(i1), vertices.get(i2))
        else {
            continue;
        };
        let n = face_normal(v0, v1, v2);
        vertex_normals[i0] += n;
        vertex_normals[i1] += n;
        vertex_normals[i2] += n;
    }

    let mut zero_norm_count = 0;
    for normal in vertex_normals.iter_mut() {
        if normal.norm_squared() > 1e-12 {
            normal.normalize_mut();
        } else {
            *normal = Vector3::zeros();
            zero_norm_count += 1;
        }
    }
    if zero_norm_count > 0 {
        warn!("{} vertices have no usable face normal", zero_norm_count);
    }

    vertex_normals
}
