//! # Scan conversion
//!
//! Sequential draw calls for triangle and line lists. Each primitive is run
//! through the vertex shader, projected to pixel space and scan converted;
//! every covered pixel is shaded by the fragment shader and composed into the
//! frame buffer by the blending shader.

pub mod line;
pub mod triangle;

pub use line::rasterize_line;
pub use triangle::rasterize_triangle;

use super::attributes::{UniformAttributes, VertexAttributes};
use super::error::{Primitive, RasterError, check_vertex_count};
use super::frame_buffer::FrameBuffer;
use super::program::Program;
use log::debug;
use nalgebra::Point2;

/// Screen-space bounding box, clamped to the frame buffer. `max_*` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: usize,
    pub min_y: usize,
    pub max_x: usize,
    pub max_y: usize,
}

impl BoundingBox {
    /// Box of every pixel whose cell intersects the hull of `points`.
    /// `None` if nothing of it lies inside a `width` × `height` frame.
    pub fn from_points(points: &[Point2<f32>], width: usize, height: usize) -> Option<Self> {
        let first = points.first()?;
        let (mut lo_x, mut lo_y, mut hi_x, mut hi_y) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            lo_x = lo_x.min(p.x);
            lo_y = lo_y.min(p.y);
            hi_x = hi_x.max(p.x);
            hi_y = hi_y.max(p.y);
        }
        if !(lo_x.is_finite() && lo_y.is_finite() && hi_x.is_finite() && hi_y.is_finite()) {
            return None;
        }

        let min_x = lo_x.floor().max(0.0) as usize;
        let min_y = lo_y.floor().max(0.0) as usize;
        let max_x = hi_x.ceil().min(width as f32).max(0.0) as usize;
        let max_y = hi_y.ceil().min(height as f32).max(0.0) as usize;

        if max_x <= min_x || max_y <= min_y {
            None
        } else {
            Some(Self {
                min_x,
                min_y,
                max_x,
                max_y,
            })
        }
    }

    pub fn pixel_count(&self) -> usize {
        (self.max_x - self.min_x) * (self.max_y - self.min_y)
    }

    pub fn for_each_pixel<F>(&self, mut callback: F)
    where
        F: FnMut(usize, usize),
    {
        for y in self.min_y..self.max_y {
            for x in self.min_x..self.max_x {
                callback(x, y);
            }
        }
    }
}

/// Pixel center of cell `(x, y)`.
#[inline]
pub(crate) fn pixel_center(x: usize, y: usize) -> Point2<f32> {
    Point2::new(x as f32 + 0.5, y as f32 + 0.5)
}

/// Runs the vertex shader over one primitive's worth of vertices.
#[inline]
pub(crate) fn shade_vertices<P, const N: usize>(
    program: &P,
    uniform: &UniformAttributes,
    vertices: &[VertexAttributes],
) -> [VertexAttributes; N]
where
    P: Program + ?Sized,
{
    std::array::from_fn(|i| program.vertex_shader(&vertices[i], uniform))
}

/// Shades one fragment and blends it into the cell at `(x, y)`.
#[inline]
fn shade_fragment<P>(
    program: &P,
    uniform: &UniformAttributes,
    frame_buffer: &mut FrameBuffer,
    x: usize,
    y: usize,
    vertex: &VertexAttributes,
) where
    P: Program + ?Sized,
{
    if let Some(cell) = frame_buffer.get_mut(x, y) {
        let fragment = program.fragment_shader(vertex, uniform);
        *cell = program.blending_shader(&fragment, cell);
    }
}

/// Draws a triangle list: every three consecutive vertices form one triangle.
///
/// Fails without touching the frame buffer if `vertices.len()` is not a
/// multiple of 3.
pub fn rasterize_triangles<P>(
    program: &P,
    uniform: &UniformAttributes,
    vertices: &[VertexAttributes],
    frame_buffer: &mut FrameBuffer,
) -> Result<(), RasterError>
where
    P: Program + ?Sized,
{
    check_vertex_count(Primitive::Triangle, vertices.len())?;

    let (width, height) = (frame_buffer.width(), frame_buffer.height());
    let mut fragments = 0;

    for triangle in vertices.chunks_exact(3) {
        let shaded: [VertexAttributes; 3] = shade_vertices(program, uniform, triangle);
        fragments += rasterize_triangle(&shaded, width, height, |x, y, vertex| {
            shade_fragment(program, uniform, frame_buffer, x, y, vertex)
        });
    }

    debug!(
        "rasterized {} triangles into {} fragments",
        vertices.len() / 3,
        fragments
    );
    Ok(())
}

/// Draws a line list: every two consecutive vertices form one segment of the
/// given screen-space `thickness` (in pixels).
///
/// Fails without touching the frame buffer if `vertices.len()` is odd.
pub fn rasterize_lines<P>(
    program: &P,
    uniform: &UniformAttributes,
    vertices: &[VertexAttributes],
    thickness: f32,
    frame_buffer: &mut FrameBuffer,
) -> Result<(), RasterError>
where
    P: Program + ?Sized,
{
    check_vertex_count(Primitive::Line, vertices.len())?;

    let (width, height) = (frame_buffer.width(), frame_buffer.height());
    let mut fragments = 0;

    for segment in vertices.chunks_exact(2) {
        let shaded: [VertexAttributes; 2] = shade_vertices(program, uniform, segment);
        fragments += rasterize_line(&shaded, thickness, width, height, |x, y, vertex| {
            shade_fragment(program, uniform, frame_buffer, x, y, vertex)
        });
    }

    debug!(
        "rasterized {} lines into {} fragments",
        vertices.len() / 2,
        fragments
    );
    Ok(())
}
