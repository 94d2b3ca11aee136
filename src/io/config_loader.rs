use crate::io::render_settings::{LightSettings, RenderSettings};
use crate::shading::ShadingModel;
use clap::ValueEnum;
use log::warn;
use serde::Serialize;
use std::path::Path;
use toml::{Table, Value};

const SECTIONS: [&str; 7] = [
    "files",
    "render",
    "wireframe",
    "camera",
    "lighting",
    "material",
    "light",
];

/// Reads and writes [`RenderSettings`] as TOML.
///
/// Every key is optional; anything left out keeps its default. A `[[light]]`
/// array, when present, replaces the default lights entirely.
pub struct TomlConfigLoader;

impl TomlConfigLoader {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<RenderSettings, String> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;

        Self::load_from_content(&content)
            .map_err(|e| format!("invalid config {}: {}", path.display(), e))
    }

    pub fn load_from_content(content: &str) -> Result<RenderSettings, String> {
        let toml_value: Table =
            toml::from_str(content).map_err(|e| format!("failed to parse TOML: {}", e))?;

        Self::parse_toml_to_settings(&toml_value)
    }

    /// Serializes the effective settings in the layout the loader reads back.
    pub fn to_toml(settings: &RenderSettings) -> Result<String, String> {
        toml::to_string(&SettingsDocument::from(settings))
            .map_err(|e| format!("failed to serialize settings: {}", e))
    }

    // ===== TOML -> RenderSettings =====

    fn parse_toml_to_settings(toml: &Table) -> Result<RenderSettings, String> {
        let mut settings = RenderSettings::default();

        for key in toml.keys() {
            if !SECTIONS.contains(&key.as_str()) {
                warn!("ignoring unknown config section '{}'", key);
            }
        }

        if let Some(files) = section(toml, "files")? {
            Self::parse_files_section(&mut settings, files)?;
        }
        if let Some(render) = section(toml, "render")? {
            Self::parse_render_section(&mut settings, render)?;
        }
        if let Some(wireframe) = section(toml, "wireframe")? {
            Self::parse_wireframe_section(&mut settings, wireframe)?;
        }
        if let Some(camera) = section(toml, "camera")? {
            if let Some(position) = get_str(camera, "position")? {
                settings.camera_position = position.to_string();
            }
        }
        if let Some(lighting) = section(toml, "lighting")? {
            Self::parse_lighting_section(&mut settings, lighting)?;
        }
        if let Some(lights) = Self::parse_lights_array(toml)? {
            settings.lights = lights;
        }
        if let Some(material) = section(toml, "material")? {
            Self::parse_material_section(&mut settings, material)?;
        }

        settings.validate()?;
        Ok(settings)
    }

    fn parse_files_section(settings: &mut RenderSettings, files: &Table) -> Result<(), String> {
        if let Some(mesh) = get_str(files, "mesh")? {
            settings.mesh = Some(mesh.to_string());
        }
        if let Some(output) = get_str(files, "output")? {
            settings.output = output.to_string();
        }
        Ok(())
    }

    fn parse_render_section(settings: &mut RenderSettings, render: &Table) -> Result<(), String> {
        if let Some(width) = get_usize(render, "width")? {
            settings.width = width;
        }
        if let Some(height) = get_usize(render, "height")? {
            settings.height = height;
        }
        if let Some(shading) = get_str(render, "shading")? {
            settings.shading = ShadingModel::from_str(shading, true)
                .map_err(|_| format!("unknown shading model '{}'", shading))?;
        }
        if let Some(parallel) = get_bool(render, "parallel")? {
            settings.parallel = parallel;
        }
        if let Some(save_depth) = get_bool(render, "save_depth")? {
            settings.save_depth = save_depth;
        }
        Ok(())
    }

    fn parse_wireframe_section(
        settings: &mut RenderSettings,
        wireframe: &Table,
    ) -> Result<(), String> {
        if let Some(enabled) = get_bool(wireframe, "enabled")? {
            settings.wireframe = enabled;
        }
        if let Some(thickness) = get_f32(wireframe, "line_thickness")? {
            settings.line_thickness = thickness;
        }
        if let Some(color) = get_str(wireframe, "color")? {
            settings.wireframe_color = color.to_string();
        }
        if let Some(bias) = get_f32(wireframe, "depth_bias")? {
            settings.wireframe_depth_bias = bias;
        }
        Ok(())
    }

    fn parse_lighting_section(
        settings: &mut RenderSettings,
        lighting: &Table,
    ) -> Result<(), String> {
        if let Some(ambient) = get_str(lighting, "ambient_color")? {
            settings.ambient_color = ambient.to_string();
        }
        if let Some(intensity) = get_str(lighting, "intensity")? {
            settings.light_intensity = intensity.to_string();
        }
        Ok(())
    }

    /// `[[light]]` array of point lights.
    fn parse_lights_array(toml: &Table) -> Result<Option<Vec<LightSettings>>, String> {
        let Some(value) = toml.get("light") else {
            return Ok(None);
        };
        let array = value
            .as_array()
            .ok_or("'light' must be an array of tables ([[light]])")?;

        let mut lights = Vec::with_capacity(array.len());
        for (i, light_value) in array.iter().enumerate() {
            let light_table = light_value
                .as_table()
                .ok_or_else(|| format!("light {} is not a table", i + 1))?;
            let position = get_str(light_table, "position")?
                .ok_or_else(|| format!("light {} has no position", i + 1))?;
            lights.push(LightSettings::at(position));
        }
        Ok(Some(lights))
    }

    fn parse_material_section(
        settings: &mut RenderSettings,
        material: &Table,
    ) -> Result<(), String> {
        if let Some(color) = get_str(material, "color")? {
            settings.color = color.to_string();
        }
        if let Some(diffuse) = get_str(material, "diffuse")? {
            settings.diffuse = diffuse.to_string();
        }
        if let Some(specular) = get_str(material, "specular")? {
            settings.specular = specular.to_string();
        }
        if let Some(exponent) = get_f32(material, "specular_exponent")? {
            settings.specular_exponent = exponent;
        }
        Ok(())
    }
}

// ===== typed lookups =====

fn section<'a>(toml: &'a Table, name: &str) -> Result<Option<&'a Table>, String> {
    match toml.get(name) {
        None => Ok(None),
        Some(Value::Table(table)) => Ok(Some(table)),
        Some(_) => Err(format!("[{}] must be a table", name)),
    }
}

fn get_str<'a>(table: &'a Table, key: &str) -> Result<Option<&'a str>, String> {
    match table.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(format!("'{}' must be a string, got {}", key, other.type_str())),
    }
}

fn get_bool(table: &Table, key: &str) -> Result<Option<bool>, String> {
    match table.get(key) {
        None => Ok(None),
        Some(Value::Boolean(b)) => Ok(Some(*b)),
        Some(other) => Err(format!("'{}' must be a boolean, got {}", key, other.type_str())),
    }
}

fn get_usize(table: &Table, key: &str) -> Result<Option<usize>, String> {
    match table.get(key) {
        None => Ok(None),
        Some(Value::Integer(i)) => usize::try_from(*i)
            .map(Some)
            .map_err(|_| format!("'{}' must not be negative, got {}", key, i)),
        Some(other) => Err(format!("'{}' must be an integer, got {}", key, other.type_str())),
    }
}

/// Accepts integers too, so `thickness = 2` works.
fn get_f32(table: &Table, key: &str) -> Result<Option<f32>, String> {
    match table.get(key) {
        None => Ok(None),
        Some(Value::Float(f)) => Ok(Some(*f as f32)),
        Some(Value::Integer(i)) => Ok(Some(*i as f32)),
        Some(other) => Err(format!("'{}' must be a number, got {}", key, other.type_str())),
    }
}

// ===== RenderSettings -> TOML =====

#[derive(Serialize)]
struct SettingsDocument<'a> {
    files: FilesSection<'a>,
    render: RenderSection,
    wireframe: WireframeSection<'a>,
    camera: CameraSection<'a>,
    lighting: LightingSection<'a>,
    material: MaterialSection<'a>,
    light: Vec<LightSection<'a>>,
}

#[derive(Serialize)]
struct FilesSection<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    mesh: Option<&'a str>,
    output: &'a str,
}

#[derive(Serialize)]
struct RenderSection {
    width: usize,
    height: usize,
    shading: ShadingModel,
    parallel: bool,
    save_depth: bool,
}

#[derive(Serialize)]
struct WireframeSection<'a> {
    enabled: bool,
    line_thickness: f64,
    color: &'a str,
    depth_bias: f64,
}

#[derive(Serialize)]
struct CameraSection<'a> {
    position: &'a str,
}

#[derive(Serialize)]
struct LightingSection<'a> {
    ambient_color: &'a str,
    intensity: &'a str,
}

#[derive(Serialize)]
struct MaterialSection<'a> {
    color: &'a str,
    diffuse: &'a str,
    specular: &'a str,
    specular_exponent: f64,
}

#[derive(Serialize)]
struct LightSection<'a> {
    position: &'a str,
}

/// Widens through the shortest decimal form so `1.6_f32` prints as `1.6`.
fn plain(value: f32) -> f64 {
    value.to_string().parse().unwrap_or(value as f64)
}

impl<'a> From<&'a RenderSettings> for SettingsDocument<'a> {
    fn from(settings: &'a RenderSettings) -> Self {
        Self {
            files: FilesSection {
                mesh: settings.mesh.as_deref(),
                output: &settings.output,
            },
            render: RenderSection {
                width: settings.width,
                height: settings.height,
                shading: settings.shading,
                parallel: settings.parallel,
                save_depth: settings.save_depth,
            },
            wireframe: WireframeSection {
                enabled: settings.wireframe,
                line_thickness: plain(settings.line_thickness),
                color: &settings.wireframe_color,
                depth_bias: plain(settings.wireframe_depth_bias),
            },
            camera: CameraSection {
                position: &settings.camera_position,
            },
            lighting: LightingSection {
                ambient_color: &settings.ambient_color,
                intensity: &settings.light_intensity,
            },
            material: MaterialSection {
                color: &settings.color,
                diffuse: &settings.diffuse,
                specular: &settings.specular,
                specular_exponent: plain(settings.specular_exponent),
            },
            light: settings
                .lights
                .iter()
                .map(|light| LightSection {
                    position: &light.position,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_yields_defaults() {
        let settings = TomlConfigLoader::load_from_content("").unwrap();
        assert_eq!(settings, RenderSettings::default());
    }

    #[test]
    fn sections_override_individual_fields() {
        let settings = TomlConfigLoader::load_from_content(
            r#"
            [files]
            mesh = "data/bunny.off"

            [render]
            width = 320
            shading = "per-vertex"
            parallel = true

            [wireframe]
            enabled = false
            line_thickness = 2

            [[light]]
            position = "0,0,5"
            "#,
        )
        .unwrap();

        assert_eq!(settings.mesh.as_deref(), Some("data/bunny.off"));
        assert_eq!((settings.width, settings.height), (320, 480));
        assert_eq!(settings.shading, ShadingModel::PerVertex);
        assert!(settings.parallel);
        assert!(!settings.wireframe);
        assert_eq!(settings.line_thickness, 2.0);
        assert_eq!(settings.lights, vec![LightSettings::at("0,0,5")]);
        assert_eq!(settings.output, "triangle.png");
    }

    #[test]
    fn wrong_types_and_bad_values_are_errors() {
        assert!(TomlConfigLoader::load_from_content("[render]\nwidth = \"wide\"").is_err());
        assert!(TomlConfigLoader::load_from_content("[render]\nwidth = -3").is_err());
        assert!(TomlConfigLoader::load_from_content("[render]\nshading = \"toon\"").is_err());
        assert!(TomlConfigLoader::load_from_content("[material]\ncolor = \"1,2\"").is_err());
        assert!(TomlConfigLoader::load_from_content("[[light]]\nintensity = 3").is_err());
        assert!(TomlConfigLoader::load_from_content("render = 3").is_err());
    }

    #[test]
    fn printed_config_loads_back() {
        let settings = RenderSettings {
            mesh: Some("bunny.obj".to_string()),
            shading: ShadingModel::PerVertex,
            line_thickness: 0.8,
            ..Default::default()
        };
        let text = TomlConfigLoader::to_toml(&settings).unwrap();
        assert!(text.contains("shading = \"per-vertex\""), "{}", text);
        assert!(text.contains("line_thickness = 0.8"), "{}", text);

        let reloaded = TomlConfigLoader::load_from_content(&text).unwrap();
        assert_eq!(reloaded, settings);
    }

    #[test]
    fn missing_file_is_reported_with_its_path() {
        let err = TomlConfigLoader::load_from_file("no/such/config.toml").unwrap_err();
        assert!(err.contains("no/such/config.toml"), "{}", err);
    }
}
