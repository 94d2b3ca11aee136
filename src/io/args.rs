use crate::io::config_loader::TomlConfigLoader;
use crate::io::render_settings::RenderSettings;
use crate::shading::ShadingModel;
use clap::Parser;
use log::info;

/// Command line of the renderer. Every option overrides the value from the
/// config file, which in turn overrides the built-in scene.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "raster_pipeline", version, about = "Software rasterizer for OFF and OBJ meshes")]
pub struct Args {
    /// TOML config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<String>,

    /// Input mesh (.off or .obj)
    #[arg(short, long, value_name = "FILE")]
    pub mesh: Option<String>,

    /// Output PNG path
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<String>,

    #[arg(long)]
    pub width: Option<usize>,

    #[arg(long)]
    pub height: Option<usize>,

    /// Where lighting is evaluated
    #[arg(long, value_enum)]
    pub shading: Option<ShadingModel>,

    /// Draw triangle edges on top of the shaded mesh
    #[arg(long, conflicts_with = "no_wireframe")]
    pub wireframe: bool,

    #[arg(long)]
    pub no_wireframe: bool,

    /// Edge width in pixels
    #[arg(long)]
    pub line_thickness: Option<f32>,

    /// Rasterize on all cores
    #[arg(long)]
    pub parallel: bool,

    /// Also write a grayscale depth map
    #[arg(long)]
    pub save_depth: bool,

    /// Print the effective settings as TOML and exit
    #[arg(long)]
    pub print_config: bool,
}

impl Args {
    /// Builds the effective settings: defaults, then the config file, then
    /// the command line.
    pub fn load_settings(&self) -> Result<RenderSettings, String> {
        let mut settings = match &self.config {
            Some(path) => {
                info!("Loading config: {}", path);
                TomlConfigLoader::load_from_file(path)?
            }
            None => RenderSettings::default(),
        };
        self.apply_overrides(&mut settings);
        settings.validate()?;
        Ok(settings)
    }

    pub fn apply_overrides(&self, settings: &mut RenderSettings) {
        if let Some(mesh) = &self.mesh {
            settings.mesh = Some(mesh.clone());
        }
        if let Some(output) = &self.output {
            settings.output = output.clone();
        }
        if let Some(width) = self.width {
            settings.width = width;
        }
        if let Some(height) = self.height {
            settings.height = height;
        }
        if let Some(shading) = self.shading {
            settings.shading = shading;
        }
        if self.wireframe {
            settings.wireframe = true;
        }
        if self.no_wireframe {
            settings.wireframe = false;
        }
        if let Some(thickness) = self.line_thickness {
            settings.line_thickness = thickness;
        }
        if self.parallel {
            settings.parallel = true;
        }
        if self.save_depth {
            settings.save_depth = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("raster_pipeline").chain(argv.iter().copied()))
            .unwrap()
    }

    #[test]
    fn flags_override_defaults() {
        let args = parse(&[
            "--mesh",
            "bunny.off",
            "--width",
            "200",
            "--shading",
            "per-vertex",
            "--no-wireframe",
            "--line-thickness",
            "3",
            "--parallel",
        ]);
        let settings = args.load_settings().unwrap();
        assert_eq!(settings.mesh.as_deref(), Some("bunny.off"));
        assert_eq!((settings.width, settings.height), (200, 480));
        assert_eq!(settings.shading, ShadingModel::PerVertex);
        assert!(!settings.wireframe);
        assert_eq!(settings.line_thickness, 3.0);
        assert!(settings.parallel);
        assert!(!settings.save_depth);
    }

    #[test]
    fn no_flags_keep_the_default_scene() {
        assert_eq!(parse(&[]).load_settings().unwrap(), RenderSettings::default());
    }

    #[test]
    fn conflicting_and_invalid_values_are_rejected() {
        let argv = ["raster_pipeline", "--wireframe", "--no-wireframe"];
        assert!(Args::try_parse_from(argv).is_err());
        assert!(Args::try_parse_from(["raster_pipeline", "--shading", "toon"]).is_err());
        assert!(parse(&["--width", "0"]).load_settings().is_err());
        assert!(parse(&["--line-thickness=-1"]).load_settings().is_err());
    }

    #[test]
    fn missing_config_file_is_an_error() {
        assert!(parse(&["--config", "nowhere.toml"]).load_settings().is_err());
    }
}
