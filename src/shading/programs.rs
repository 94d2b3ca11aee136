use super::lighting::{blinn_phong, camera_distance};
use crate::core::attributes::{
    FragmentAttributes, FrameBufferAttributes, UniformAttributes, VertexAttributes,
};
use crate::core::program::Program;
use nalgebra::Vector4;

/// Strict depth test: the fragment replaces the cell iff it is closer than
/// what is stored. Colors are scaled from `[0, 1]` to `[0, 255]`.
///
/// Equal depths keep the stored value, so drawing the same geometry twice
/// leaves the frame buffer unchanged.
pub fn depth_test_blend(
    fragment: &FragmentAttributes,
    previous: &FrameBufferAttributes,
) -> FrameBufferAttributes {
    if fragment.distance < previous.depth {
        FrameBufferAttributes {
            color: fragment.color * 255.0,
            depth: fragment.distance,
        }
    } else {
        *previous
    }
}

fn view_transform(vertex: &VertexAttributes, uniform: &UniformAttributes) -> VertexAttributes {
    VertexAttributes {
        position: uniform.view * vertex.position,
        ..*vertex
    }
}

fn fragment_with_color(
    color: Vector4<f32>,
    vertex: &VertexAttributes,
    uniform: &UniformAttributes,
) -> FragmentAttributes {
    FragmentAttributes {
        color,
        position: vertex.position,
        distance: camera_distance(&vertex.position, uniform),
    }
}

/// Lighting evaluated per fragment from the interpolated normal. With
/// per-face normals this gives flat-shaded facets.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatShading;

impl Program for FlatShading {
    fn vertex_shader(
        &self,
        vertex: &VertexAttributes,
        uniform: &UniformAttributes,
    ) -> VertexAttributes {
        view_transform(vertex, uniform)
    }

    fn fragment_shader(
        &self,
        vertex: &VertexAttributes,
        uniform: &UniformAttributes,
    ) -> FragmentAttributes {
        let color = blinn_phong(&vertex.position, &vertex.normal, uniform);
        fragment_with_color(color, vertex, uniform)
    }

    fn blending_shader(
        &self,
        fragment: &FragmentAttributes,
        previous: &FrameBufferAttributes,
    ) -> FrameBufferAttributes {
        depth_test_blend(fragment, previous)
    }
}

/// Lighting evaluated once per vertex, in model space, and the resulting
/// color interpolated across the triangle (Gouraud shading).
#[derive(Debug, Clone, Copy, Default)]
pub struct PerVertexShading;

impl Program for PerVertexShading {
    fn vertex_shader(
        &self,
        vertex: &VertexAttributes,
        uniform: &UniformAttributes,
    ) -> VertexAttributes {
        let lit = blinn_phong(&vertex.position, &vertex.normal, uniform);
        VertexAttributes {
            color: Vector4::new(lit.x, lit.y, lit.z, 1.0),
            ..view_transform(vertex, uniform)
        }
    }

    fn fragment_shader(
        &self,
        vertex: &VertexAttributes,
        uniform: &UniformAttributes,
    ) -> FragmentAttributes {
        fragment_with_color(vertex.color, vertex, uniform)
    }

    fn blending_shader(
        &self,
        fragment: &FragmentAttributes,
        previous: &FrameBufferAttributes,
    ) -> FrameBufferAttributes {
        depth_test_blend(fragment, previous)
    }
}

/// Solid-color edges drawn over already shaded triangles.
///
/// Edge fragments sit at the same depth as the faces they outline, so the
/// depth test accepts fragments up to `depth_bias` behind the stored value.
#[derive(Debug, Clone, Copy)]
pub struct WireframeShading {
    pub color: Vector4<f32>,
    pub depth_bias: f32,
}

impl Default for WireframeShading {
    fn default() -> Self {
        Self {
            color: Vector4::new(0.0, 0.0, 0.0, 1.0),
            depth_bias: 1e-3,
        }
    }
}

impl Program for WireframeShading {
    fn vertex_shader(
        &self,
        vertex: &VertexAttributes,
        uniform: &UniformAttributes,
    ) -> VertexAttributes {
        view_transform(vertex, uniform)
    }

    fn fragment_shader(
        &self,
        vertex: &VertexAttributes,
        uniform: &UniformAttributes,
    ) -> FragmentAttributes {
        fragment_with_color(self.color, vertex, uniform)
    }

    fn blending_shader(
        &self,
        fragment: &FragmentAttributes,
        previous: &FrameBufferAttributes,
    ) -> FrameBufferAttributes {
        if fragment.distance - self.depth_bias < previous.depth {
            FrameBufferAttributes {
                color: fragment.color * 255.0,
                depth: fragment.distance.min(previous.depth),
            }
        } else {
            *previous
        }
    }
}
