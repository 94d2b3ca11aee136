use super::attributes::{FrameBufferAttributes, UniformAttributes, VertexAttributes};
use super::error::{Primitive, RasterError, check_vertex_count};
use super::frame_buffer::FrameBuffer;
use super::program::Program;
use super::rasterizer::{rasterize_line, rasterize_triangle, shade_vertices};
use log::debug;
use rayon::prelude::*;
use std::sync::{Mutex, PoisonError};

/// Multi-threaded draw calls.
///
/// Primitives are distributed over the rayon thread pool. Two primitives can
/// race for the same pixel, so every cell sits behind its own lock for the
/// duration of the draw call, making each fragment's read-blend-write atomic.
/// The result matches the sequential rasterizer whenever the blending shader
/// is order independent (e.g. a strict depth test with distinct depths);
/// ties are resolved in whatever order the threads arrive.
pub struct ParallelRasterizer;

impl ParallelRasterizer {
    /// Parallel counterpart of [`super::rasterizer::rasterize_triangles`].
    pub fn rasterize_triangles<P>(
        program: &P,
        uniform: &UniformAttributes,
        vertices: &[VertexAttributes],
        frame_buffer: &mut FrameBuffer,
    ) -> Result<(), RasterError>
    where
        P: Program + Sync + ?Sized,
    {
        check_vertex_count(Primitive::Triangle, vertices.len())?;

        let (width, height) = (frame_buffer.width(), frame_buffer.height());
        let cells = LockedCells::new(frame_buffer);

        let fragments: usize = vertices
            .par_chunks_exact(3)
            .map(|triangle| {
                let shaded: [VertexAttributes; 3] = shade_vertices(program, uniform, triangle);
                rasterize_triangle(&shaded, width, height, |x, y, vertex| {
                    cells.blend(program, uniform, y * width + x, vertex)
                })
            })
            .sum();

        cells.write_back(frame_buffer);
        debug!(
            "rasterized {} triangles into {} fragments (parallel)",
            vertices.len() / 3,
            fragments
        );
        Ok(())
    }

    /// Parallel counterpart of [`super::rasterizer::rasterize_lines`].
    pub fn rasterize_lines<P>(
        program: &P,
        uniform: &UniformAttributes,
        vertices: &[VertexAttributes],
        thickness: f32,
        frame_buffer: &mut FrameBuffer,
    ) -> Result<(), RasterError>
    where
        P: Program + Sync + ?Sized,
    {
        check_vertex_count(Primitive::Line, vertices.len())?;

        let (width, height) = (frame_buffer.width(), frame_buffer.height());
        let cells = LockedCells::new(frame_buffer);

        let fragments: usize = vertices
            .par_chunks_exact(2)
            .map(|segment| {
                let shaded: [VertexAttributes; 2] = shade_vertices(program, uniform, segment);
                rasterize_line(&shaded, thickness, width, height, |x, y, vertex| {
                    cells.blend(program, uniform, y * width + x, vertex)
                })
            })
            .sum();

        cells.write_back(frame_buffer);
        debug!(
            "rasterized {} lines into {} fragments (parallel)",
            vertices.len() / 2,
            fragments
        );
        Ok(())
    }
}

/// One lock per frame buffer cell.
struct LockedCells {
    cells: Vec<Mutex<FrameBufferAttributes>>,
}

impl LockedCells {
    fn new(frame_buffer: &FrameBuffer) -> Self {
        Self {
            cells: frame_buffer.cells().iter().copied().map(Mutex::new).collect(),
        }
    }

    fn blend<P>(
        &self,
        program: &P,
        uniform: &UniformAttributes,
        index: usize,
        vertex: &VertexAttributes,
    ) where
        P: Program + ?Sized,
    {
        let Some(cell) = self.cells.get(index) else {
            return;
        };
        // fragment shading needs no lock
        let fragment = program.fragment_shader(vertex, uniform);
        let mut cell = cell.lock().unwrap_or_else(PoisonError::into_inner);
        *cell = program.blending_shader(&fragment, &cell);
    }

    fn write_back(self, frame_buffer: &mut FrameBuffer) {
        for (target, cell) in frame_buffer.cells_mut().iter_mut().zip(self.cells) {
            *target = cell.into_inner().unwrap_or_else(PoisonError::into_inner);
        }
    }
}
