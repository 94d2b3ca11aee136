pub mod attributes;
pub mod error;
pub mod frame_buffer;
pub mod parallel_rasterizer;
pub mod program;
pub mod rasterizer;

pub use attributes::{
    FragmentAttributes, FrameBufferAttributes, UniformAttributes, VertexAttributes,
};
pub use error::RasterError;
pub use frame_buffer::FrameBuffer;
pub use parallel_rasterizer::ParallelRasterizer;
pub use program::{FnProgram, Program};
pub use rasterizer::{rasterize_lines, rasterize_triangles};
