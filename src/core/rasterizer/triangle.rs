use super::{BoundingBox, pixel_center};
use crate::core::attributes::VertexAttributes;
use crate::geometry::interpolation::{barycentric_coordinates, is_degenerate, is_inside_triangle};
use crate::geometry::transform::ndc_to_pixel;

/// Scan converts one triangle whose vertices have already been through the
/// vertex shader.
///
/// Every pixel of a `width` × `height` frame whose center passes the
/// edge-inclusive barycentric test is handed to `emit` together with the
/// vertex attributes interpolated at that center. Only pixels inside the
/// triangle's clamped bounding box are examined. Degenerate triangles and
/// triangles with an unprojectable vertex emit nothing.
///
/// Returns the number of emitted fragments.
pub fn rasterize_triangle<F>(
    vertices: &[VertexAttributes; 3],
    width: usize,
    height: usize,
    mut emit: F,
) -> usize
where
    F: FnMut(usize, usize, &VertexAttributes),
{
    let [a, b, c] = vertices;
    let (Some(pa), Some(pb), Some(pc)) = (
        ndc_to_pixel(&a.position, width, height),
        ndc_to_pixel(&b.position, width, height),
        ndc_to_pixel(&c.position, width, height),
    ) else {
        return 0;
    };

    if is_degenerate(pa, pb, pc) {
        return 0;
    }

    let Some(bbox) = BoundingBox::from_points(&[pa, pb, pc], width, height) else {
        return 0;
    };

    let mut covered = 0;
    bbox.for_each_pixel(|x, y| {
        let Some(bary) = barycentric_coordinates(pixel_center(x, y), pa, pb, pc) else {
            return;
        };
        if is_inside_triangle(bary) {
            let interpolated = VertexAttributes::interpolate(a, b, c, bary.x, bary.y, bary.z);
            emit(x, y, &interpolated);
            covered += 1;
        }
    });
    covered
}
