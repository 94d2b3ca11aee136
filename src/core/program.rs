//! # Shader stages
//!
//! A draw call is configured by a [`Program`]: three side-effect-free
//! functions invoked by the rasterizer, plus the [`UniformAttributes`] passed
//! alongside it. The rasterizer never decides visibility on its own; whatever
//! the blending shader returns is written back to the framebuffer cell.

use super::attributes::{
    FragmentAttributes, FrameBufferAttributes, UniformAttributes, VertexAttributes,
};

/// The programmable stages of the pipeline.
pub trait Program {
    /// Transforms one input vertex into the normalized device space used for
    /// rasterization.
    fn vertex_shader(
        &self,
        vertex: &VertexAttributes,
        uniform: &UniformAttributes,
    ) -> VertexAttributes;

    /// Colors one covered pixel from the interpolated vertex-shader output.
    fn fragment_shader(
        &self,
        vertex: &VertexAttributes,
        uniform: &UniformAttributes,
    ) -> FragmentAttributes;

    /// Combines a fragment with the cell it lands on and returns the cell's
    /// next value. Depth testing lives here.
    fn blending_shader(
        &self,
        fragment: &FragmentAttributes,
        previous: &FrameBufferAttributes,
    ) -> FrameBufferAttributes;
}

/// A [`Program`] assembled from three closures.
pub struct FnProgram<V, F, B> {
    pub vertex: V,
    pub fragment: F,
    pub blending: B,
}

impl<V, F, B> FnProgram<V, F, B>
where
    V: Fn(&VertexAttributes, &UniformAttributes) -> VertexAttributes,
    F: Fn(&VertexAttributes, &UniformAttributes) -> FragmentAttributes,
    B: Fn(&FragmentAttributes, &FrameBufferAttributes) -> FrameBufferAttributes,
{
    pub fn new(vertex: V, fragment: F, blending: B) -> Self {
        Self {
            vertex,
            fragment,
            blending,
        }
    }
}

impl<V, F, B> Program for FnProgram<V, F, B>
where
    V: Fn(&VertexAttributes, &UniformAttributes) -> VertexAttributes,
    F: Fn(&VertexAttributes, &UniformAttributes) -> FragmentAttributes,
    B: Fn(&FragmentAttributes, &FrameBufferAttributes) -> FrameBufferAttributes,
{
    #[inline]
    fn vertex_shader(
        &self,
        vertex: &VertexAttributes,
        uniform: &UniformAttributes,
    ) -> VertexAttributes {
        (self.vertex)(vertex, uniform)
    }

    #[inline]
    fn fragment_shader(
        &self,
        vertex: &VertexAttributes,
        uniform: &UniformAttributes,
    ) -> FragmentAttributes {
        (self.fragment)(vertex, uniform)
    }

    #[inline]
    fn blending_shader(
        &self,
        fragment: &FragmentAttributes,
        previous: &FrameBufferAttributes,
    ) -> FrameBufferAttributes {
        (self.blending)(fragment, previous)
    }
}
