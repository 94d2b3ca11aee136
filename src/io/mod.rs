pub mod args;
pub mod config_loader;
pub mod error;
pub mod obj_loader;
pub mod off_loader;
pub mod render_settings;

pub use error::MeshError;
pub use obj_loader::{load_mesh, load_obj};
pub use off_loader::{load_off, parse_off};
