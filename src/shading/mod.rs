//! Programs bundled with the renderer.

pub mod lighting;
pub mod programs;

pub use lighting::{blinn_phong, camera_distance};
pub use programs::{FlatShading, PerVertexShading, WireframeShading, depth_test_blend};

use clap::ValueEnum;
use serde::Serialize;

/// Where lighting is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ShadingModel {
    /// Per fragment, with one normal per face.
    #[default]
    Flat,
    /// Per vertex, with averaged vertex normals; colors are interpolated.
    PerVertex,
}

impl std::fmt::Display for ShadingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShadingModel::Flat => write!(f, "flat"),
            ShadingModel::PerVertex => write!(f, "per-vertex"),
        }
    }
}
