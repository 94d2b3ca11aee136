use crate::shading::ShadingModel;
use nalgebra::{Vector3, Vector4};

/// One point light. Positions are in model space, as `"x,y,z"`.
#[derive(Debug, Clone, PartialEq)]
pub struct LightSettings {
    pub position: String,
}

impl LightSettings {
    pub fn at(position: &str) -> Self {
        Self {
            position: position.to_string(),
        }
    }
}

/// Every driver parameter that can be set from TOML or the command line.
///
/// Vectors are kept as `"x,y,z"` strings so they read the same in a config
/// file, on the command line and in `--print-config` output; they are parsed
/// when the scene is assembled.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    // ===== files =====
    /// Input mesh, `.off` or `.obj`
    pub mesh: Option<String>,
    /// Output PNG path
    pub output: String,

    // ===== render =====
    pub width: usize,
    pub height: usize,
    pub shading: ShadingModel,
    /// Distribute primitives over the rayon pool
    pub parallel: bool,
    /// Also write a grayscale depth map next to the color image
    pub save_depth: bool,

    // ===== wireframe =====
    pub wireframe: bool,
    /// Edge width in pixels
    pub line_thickness: f32,
    pub wireframe_color: String,
    /// How far behind the stored depth an edge fragment may lie and still win
    pub wireframe_depth_bias: f32,

    // ===== camera =====
    pub camera_position: String,

    // ===== lighting =====
    pub ambient_color: String,
    pub light_intensity: String,
    pub lights: Vec<LightSettings>,

    // ===== material =====
    pub color: String,
    pub diffuse: String,
    pub specular: String,
    pub specular_exponent: f32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            mesh: None,
            output: "triangle.png".to_string(),

            width: 640,
            height: 480,
            shading: ShadingModel::Flat,
            parallel: false,
            save_depth: false,

            wireframe: true,
            line_thickness: 1.6,
            wireframe_color: "0.32,0.01,0.32".to_string(),
            wireframe_depth_bias: 0.01,

            camera_position: "0,0,4".to_string(),

            ambient_color: "0.4,0.1,0.4".to_string(),
            light_intensity: "10,10,10".to_string(),
            lights: ["8,8,0", "6,-8,0", "4,8,0", "2,-8,0", "0,8,0", "-2,-8,0", "-4,8,0"]
                .into_iter()
                .map(LightSettings::at)
                .collect(),

            color: "0.8,0.1,0.8".to_string(),
            diffuse: "0.5,0.5,0.5".to_string(),
            specular: "0.2,0.2,0.2".to_string(),
            specular_exponent: 256.0,
        }
    }
}

impl RenderSettings {
    /// Rejects settings no frame can be rendered with.
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err(format!(
                "image size must be positive, got {}x{}",
                self.width, self.height
            ));
        }
        if self.wireframe && !(self.line_thickness.is_finite() && self.line_thickness > 0.0) {
            return Err(format!(
                "line_thickness must be positive, got {}",
                self.line_thickness
            ));
        }
        if !self.specular_exponent.is_finite() {
            return Err("specular_exponent must be finite".to_string());
        }
        for (name, value) in [
            ("wireframe_color", &self.wireframe_color),
            ("camera_position", &self.camera_position),
            ("ambient_color", &self.ambient_color),
            ("light_intensity", &self.light_intensity),
            ("color", &self.color),
            ("diffuse", &self.diffuse),
            ("specular", &self.specular),
        ] {
            parse_vec3(value).map_err(|e| format!("invalid {} '{}': {}", name, value, e))?;
        }
        for (i, light) in self.lights.iter().enumerate() {
            parse_vec3(&light.position)
                .map_err(|e| format!("invalid position of light {}: {}", i + 1, e))?;
        }
        Ok(())
    }

    /// Path of the depth map that accompanies `output`.
    pub fn depth_output(&self) -> String {
        match self.output.strip_suffix(".png") {
            Some(stem) => format!("{}_depth.png", stem),
            None => format!("{}_depth.png", self.output),
        }
    }
}

pub fn parse_vec3(s: &str) -> Result<Vector3<f32>, String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err("expected 3 comma separated values".to_string());
    }
    let mut values = [0.0; 3];
    for (value, part) in values.iter_mut().zip(&parts) {
        *value = part
            .trim()
            .parse::<f32>()
            .map_err(|e| format!("invalid number '{}': {}", part, e))?;
    }
    Ok(Vector3::from(values))
}

/// `"x,y,z"` as a homogeneous point or color with `w = 1`.
pub fn parse_vec4(s: &str) -> Result<Vector4<f32>, String> {
    parse_vec3(s).map(|v| v.push(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_a_valid_scene() {
        let settings = RenderSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!((settings.width, settings.height), (640, 480));
        assert_eq!(settings.lights.len(), 7);
        assert_eq!(
            parse_vec4(&settings.lights[1].position).unwrap(),
            Vector4::new(6.0, -8.0, 0.0, 1.0)
        );
    }

    #[test]
    fn parse_vec3_accepts_spaces_and_rejects_garbage() {
        assert_eq!(parse_vec3(" 1, -2.5 ,3").unwrap(), Vector3::new(1.0, -2.5, 3.0));
        assert!(parse_vec3("1,2").is_err());
        assert!(parse_vec3("1,2,x").is_err());
    }

    #[test]
    fn validate_reports_the_offending_field() {
        let settings = RenderSettings {
            diffuse: "0.5,0.5".to_string(),
            ..Default::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.contains("diffuse"), "{}", err);

        let empty = RenderSettings {
            width: 0,
            ..Default::default()
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn depth_output_sits_next_to_the_image() {
        let mut settings = RenderSettings::default();
        assert_eq!(settings.depth_output(), "triangle_depth.png");
        settings.output = "out/bunny".to_string();
        assert_eq!(settings.depth_output(), "out/bunny_depth.png");
    }
}
