use super::{BoundingBox, pixel_center};
use crate::core::attributes::VertexAttributes;
use crate::geometry::interpolation::{
    EPSILON, barycentric_coordinates, closest_point_parameter, is_inside_triangle,
};
use crate::geometry::transform::ndc_to_pixel;
use nalgebra::{Point2, Vector2};

/// Scan converts one thick line segment whose endpoints have already been
/// through the vertex shader.
///
/// The segment is extruded by `thickness / 2` pixels on both sides into a
/// quad, which is tested as two triangles with the same edge-inclusive
/// coverage rule as [`super::rasterize_triangle`]. A pixel covered by either
/// half is emitted once, with the endpoints interpolated by the projection of
/// the pixel center onto the segment.
///
/// A segment that projects to a single point emits the pixel containing that
/// point. A non-positive or non-finite thickness emits nothing.
///
/// Returns the number of emitted fragments.
pub fn rasterize_line<F>(
    vertices: &[VertexAttributes; 2],
    thickness: f32,
    width: usize,
    height: usize,
    mut emit: F,
) -> usize
where
    F: FnMut(usize, usize, &VertexAttributes),
{
    if !thickness.is_finite() || thickness <= 0.0 {
        return 0;
    }

    let [start, end] = vertices;
    let (Some(p0), Some(p1)) = (
        ndc_to_pixel(&start.position, width, height),
        ndc_to_pixel(&end.position, width, height),
    ) else {
        return 0;
    };

    let direction = p1 - p0;
    let length = direction.norm();
    if length <= EPSILON {
        return emit_point(p0, start, width, height, emit);
    }

    let offset = Vector2::new(-direction.y, direction.x) * (0.5 * thickness / length);
    let corners = [p0 + offset, p1 + offset, p1 - offset, p0 - offset];

    let Some(bbox) = BoundingBox::from_points(&corners, width, height) else {
        return 0;
    };

    let mut covered = 0;
    bbox.for_each_pixel(|x, y| {
        let center = pixel_center(x, y);
        if quad_covers(center, &corners) {
            let t = closest_point_parameter(center, p0, p1);
            let interpolated = VertexAttributes::lerp(start, end, t);
            emit(x, y, &interpolated);
            covered += 1;
        }
    });
    covered
}

/// Coverage of the quad `c0 c1 c2 c3` split along the `c0–c2` diagonal.
fn quad_covers(p: Point2<f32>, corners: &[Point2<f32>; 4]) -> bool {
    let [c0, c1, c2, c3] = *corners;
    [(c0, c1, c2), (c0, c2, c3)].into_iter().any(|(a, b, c)| {
        barycentric_coordinates(p, a, b, c).is_some_and(is_inside_triangle)
    })
}

fn emit_point<F>(
    point: Point2<f32>,
    vertex: &VertexAttributes,
    width: usize,
    height: usize,
    mut emit: F,
) -> usize
where
    F: FnMut(usize, usize, &VertexAttributes),
{
    let (x, y) = (point.x.floor(), point.y.floor());
    if x < 0.0 || y < 0.0 || x >= width as f32 || y >= height as f32 {
        return 0;
    }
    emit(x as usize, y as usize, vertex);
    1
}
