use nalgebra::{Matrix4, Vector3, Vector4};

/// Per-vertex data flowing into and out of the vertex shader.
///
/// Positions are homogeneous. The rasterizer divides by `w` only to find the
/// pixel a vertex lands on; the shaded position itself is interpolated as-is so
/// fragment shaders can measure distances in the vertex shader's output space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexAttributes {
    pub position: Vector4<f32>,
    pub normal: Vector3<f32>,
    pub color: Vector4<f32>,
}

impl Default for VertexAttributes {
    fn default() -> Self {
        Self {
            position: Vector4::new(0.0, 0.0, 0.0, 1.0),
            normal: Vector3::zeros(),
            color: Vector4::new(0.0, 0.0, 0.0, 1.0),
        }
    }
}

impl VertexAttributes {
    /// A vertex at `(x, y, z, 1)` with no normal.
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vector4::new(x, y, z, 1.0),
            ..Default::default()
        }
    }

    /// A vertex at `(x, y, z, 1)` carrying a normal.
    pub fn with_normal(x: f32, y: f32, z: f32, normal: Vector3<f32>) -> Self {
        Self {
            position: Vector4::new(x, y, z, 1.0),
            normal,
            ..Default::default()
        }
    }

    pub fn with_color(mut self, color: Vector4<f32>) -> Self {
        self.color = color;
        self
    }

    /// Weighted sum of three vertices. Used with barycentric weights, which
    /// the caller guarantees sum to one.
    pub fn interpolate(
        a: &VertexAttributes,
        b: &VertexAttributes,
        c: &VertexAttributes,
        alpha: f32,
        beta: f32,
        gamma: f32,
    ) -> VertexAttributes {
        VertexAttributes {
            position: a.position * alpha + b.position * beta + c.position * gamma,
            normal: a.normal * alpha + b.normal * beta + c.normal * gamma,
            color: a.color * alpha + b.color * beta + c.color * gamma,
        }
    }

    /// Linear blend between two vertices; `t = 0` yields `a`, `t = 1` yields `b`.
    pub fn lerp(a: &VertexAttributes, b: &VertexAttributes, t: f32) -> VertexAttributes {
        Self::interpolate(a, b, a, 1.0 - t, t, 0.0)
    }
}

/// Constants shared read-only by every shader invocation of one draw call.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformAttributes {
    /// Applied by vertex shaders to model-space positions.
    pub view: Matrix4<f32>,
    pub light_positions: Vec<Vector4<f32>>,
    pub light_intensity: Vector4<f32>,
    pub ambient_color: Vector4<f32>,
    pub mat_diffuse: Vector4<f32>,
    pub mat_specular: Vector4<f32>,
    pub specular_exponent: f32,
    /// Base color of the material.
    pub color: Vector4<f32>,
    pub camera_position: Vector4<f32>,
}

impl Default for UniformAttributes {
    fn default() -> Self {
        Self {
            view: Matrix4::identity(),
            light_positions: Vec::new(),
            light_intensity: Vector4::new(1.0, 1.0, 1.0, 1.0),
            ambient_color: Vector4::new(0.0, 0.0, 0.0, 1.0),
            mat_diffuse: Vector4::zeros(),
            mat_specular: Vector4::zeros(),
            specular_exponent: 256.0,
            color: Vector4::new(1.0, 1.0, 1.0, 1.0),
            camera_position: Vector4::new(0.0, 0.0, 0.0, 1.0),
        }
    }
}

/// Output of the fragment shader for one covered pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FragmentAttributes {
    /// RGBA in `[0, 1]`. Only alpha is expected to be clamped by shaders.
    pub color: Vector4<f32>,
    pub position: Vector4<f32>,
    /// Distance from the camera, used as the depth proxy by blending shaders.
    pub distance: f32,
}

impl FragmentAttributes {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self {
            color: Vector4::new(r, g, b, 1.0),
            position: Vector4::new(0.0, 0.0, 0.0, 1.0),
            distance: 0.0,
        }
    }
}

/// Persistent state of one framebuffer cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameBufferAttributes {
    /// Stored in whatever range the blending shader chooses (`[0, 255]` for
    /// the bundled shaders).
    pub color: Vector4<f32>,
    /// Starts at infinity so the first depth-tested write always wins.
    pub depth: f32,
}

impl Default for FrameBufferAttributes {
    fn default() -> Self {
        Self {
            color: Vector4::zeros(),
            depth: f32::INFINITY,
        }
    }
}

impl FrameBufferAttributes {
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            color: Vector4::new(r, g, b, a),
            ..Default::default()
        }
    }
}
