//! Mesh storage and the conversion from meshes and settings into the
//! primitive lists and uniforms consumed by the draw calls.

use crate::core::attributes::{UniformAttributes, VertexAttributes};
use crate::core::error::RasterError;
use crate::core::frame_buffer::FrameBuffer;
use crate::core::parallel_rasterizer::ParallelRasterizer;
use crate::core::program::Program;
use crate::core::rasterizer::{rasterize_lines, rasterize_triangles};
use crate::geometry::transform::{aspect_ratio_view, face_normal, smooth_vertex_normals};
use crate::io::error::MeshError;
use crate::io::render_settings::{RenderSettings, parse_vec4};
use crate::shading::{FlatShading, PerVertexShading, ShadingModel, WireframeShading};
use log::info;
use nalgebra::{Point3, Vector3};
use std::time::Instant;

/// Indexed triangle mesh. Every face index is checked against the vertex
/// list on construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<Point3<f32>>,
    faces: Vec<[usize; 3]>,
}

impl Mesh {
    pub fn new(vertices: Vec<Point3<f32>>, faces: Vec<[usize; 3]>) -> Result<Self, MeshError> {
        for (face_index, face) in faces.iter().enumerate() {
            if let Some(&index) = face.iter().find(|&&i| i >= vertices.len()) {
                return Err(MeshError::IndexOutOfRange {
                    face: face_index,
                    index,
                    vertex_count: vertices.len(),
                });
            }
        }
        Ok(Self { vertices, faces })
    }

    pub fn vertices(&self) -> &[Point3<f32>] {
        &self.vertices
    }

    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    fn corners(&self, face: &[usize; 3]) -> [Point3<f32>; 3] {
        face.map(|i| self.vertices[i])
    }

    /// Triangle list where all three corners of a face carry its face normal.
    pub fn flat_triangles(&self) -> Vec<VertexAttributes> {
        let mut triangles = Vec::with_capacity(self.faces.len() * 3);
        for face in &self.faces {
            let [a, b, c] = self.corners(face);
            let normal = face_normal(&a, &b, &c);
            triangles.extend([a, b, c].map(|p| vertex_at(&p, normal)));
        }
        triangles
    }

    /// Triangle list where every corner carries the averaged normal of the
    /// faces around its vertex.
    pub fn smooth_triangles(&self) -> Vec<VertexAttributes> {
        let normals = smooth_vertex_normals(&self.vertices, &self.faces);
        self.faces
            .iter()
            .flat_map(|face| face.map(|i| vertex_at(&self.vertices[i], normals[i])))
            .collect()
    }

    /// Line list with the three edges of every face. Shared edges appear once
    /// per adjacent face.
    pub fn edge_lines(&self) -> Vec<VertexAttributes> {
        let mut lines = Vec::with_capacity(self.faces.len() * 6);
        for face in &self.faces {
            let [a, b, c] = self.corners(face).map(|p| vertex_at(&p, Vector3::zeros()));
            lines.extend([a, b, b, c, c, a]);
        }
        lines
    }
}

fn vertex_at(point: &Point3<f32>, normal: Vector3<f32>) -> VertexAttributes {
    VertexAttributes::with_normal(point.x, point.y, point.z, normal)
}

/// Lights, material and camera of `settings`, with a view matrix that
/// compensates for the aspect ratio of a `width` × `height` frame.
pub fn build_uniform(
    settings: &RenderSettings,
    width: usize,
    height: usize,
) -> Result<UniformAttributes, String> {
    let field = |name: &str, value: &str| {
        parse_vec4(value).map_err(|e| format!("invalid {} '{}': {}", name, value, e))
    };

    let light_positions = settings
        .lights
        .iter()
        .map(|light| field("light position", &light.position))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(UniformAttributes {
        view: aspect_ratio_view(width, height),
        light_positions,
        light_intensity: field("light_intensity", &settings.light_intensity)?,
        ambient_color: field("ambient_color", &settings.ambient_color)?,
        mat_diffuse: field("diffuse", &settings.diffuse)?,
        mat_specular: field("specular", &settings.specular)?,
        specular_exponent: settings.specular_exponent,
        color: field("color", &settings.color)?,
        camera_position: field("camera_position", &settings.camera_position)?,
    })
}

/// Draws `mesh` into `frame_buffer`: the shaded surface first, then, if
/// enabled, its edges.
pub fn render_mesh(
    settings: &RenderSettings,
    mesh: &Mesh,
    frame_buffer: &mut FrameBuffer,
) -> Result<(), String> {
    let uniform = build_uniform(settings, frame_buffer.width(), frame_buffer.height())?;

    let start = Instant::now();
    match settings.shading {
        ShadingModel::Flat => draw_triangles(
            &FlatShading,
            &uniform,
            &mesh.flat_triangles(),
            settings.parallel,
            frame_buffer,
        ),
        ShadingModel::PerVertex => draw_triangles(
            &PerVertexShading,
            &uniform,
            &mesh.smooth_triangles(),
            settings.parallel,
            frame_buffer,
        ),
    }
    .map_err(|e| format!("triangle pass failed: {}", e))?;
    info!(
        "{} shading of {} triangles took {:?}",
        settings.shading,
        mesh.faces().len(),
        start.elapsed()
    );

    if settings.wireframe {
        let start = Instant::now();
        let wireframe = WireframeShading {
            color: parse_vec4(&settings.wireframe_color)
                .map_err(|e| format!("invalid wireframe_color: {}", e))?,
            depth_bias: settings.wireframe_depth_bias,
        };
        draw_lines(
            &wireframe,
            &uniform,
            &mesh.edge_lines(),
            settings.line_thickness,
            settings.parallel,
            frame_buffer,
        )
        .map_err(|e| format!("wireframe pass failed: {}", e))?;
        info!("wireframe took {:?}", start.elapsed());
    }

    info!(
        "{} of {} pixels covered",
        frame_buffer.covered_count(),
        frame_buffer.width() * frame_buffer.height()
    );
    Ok(())
}

fn draw_triangles<P: Program + Sync>(
    program: &P,
    uniform: &UniformAttributes,
    vertices: &[VertexAttributes],
    parallel: bool,
    frame_buffer: &mut FrameBuffer,
) -> Result<(), RasterError> {
    if parallel {
        ParallelRasterizer::rasterize_triangles(program, uniform, vertices, frame_buffer)
    } else {
        rasterize_triangles(program, uniform, vertices, frame_buffer)
    }
}

fn draw_lines<P: Program + Sync>(
    program: &P,
    uniform: &UniformAttributes,
    vertices: &[VertexAttributes],
    thickness: f32,
    parallel: bool,
    frame_buffer: &mut FrameBuffer,
) -> Result<(), RasterError> {
    if parallel {
        ParallelRasterizer::rasterize_lines(program, uniform, vertices, thickness, frame_buffer)
    } else {
        rasterize_lines(program, uniform, vertices, thickness, frame_buffer)
    }
}
