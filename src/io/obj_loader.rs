use super::error::MeshError;
use crate::scene::Mesh;
use log::{debug, info, warn};
use nalgebra::Point3;
use std::path::Path;

/// Loads every model of an OBJ file into one triangle mesh.
///
/// Polygons are triangulated, points and lines are skipped. Materials are
/// ignored; the surface color comes from the render settings.
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh, MeshError> {
    let path = path.as_ref();
    info!("Loading OBJ mesh: {:?}", path);

    let load_options = tobj::LoadOptions {
        triangulate: true,
        single_index: false,
        ignore_points: true,
        ignore_lines: true,
    };

    let (models, materials) = tobj::load_obj(path, &load_options)?;
    if let Err(e) = materials {
        debug!("no usable materials for {:?}: {}", path, e);
    }

    let mut vertices = Vec::new();
    let mut faces = Vec::new();
    for model in &models {
        let mesh = &model.mesh;
        let base = vertices.len();

        vertices.extend(
            mesh.positions
                .chunks_exact(3)
                .map(|p| Point3::new(p[0], p[1], p[2])),
        );

        if mesh.indices.len() % 3 != 0 {
            warn!(
                "model '{}' has {} indices, dropping the incomplete triangle",
                model.name,
                mesh.indices.len()
            );
        }
        faces.extend(
            mesh.indices
                .chunks_exact(3)
                .map(|t| [t[0], t[1], t[2]].map(|i| base + i as usize)),
        );
        debug!(
            "model '{}': {} vertices, {} triangles",
            model.name,
            mesh.positions.len() / 3,
            mesh.indices.len() / 3
        );
    }

    let mesh = Mesh::new(vertices, faces)?;
    info!(
        "Loaded {} models, {} vertices and {} triangles",
        models.len(),
        mesh.vertices().len(),
        mesh.faces().len()
    );
    Ok(mesh)
}

/// Picks the loader from the file extension.
pub fn load_mesh<P: AsRef<Path>>(path: P) -> Result<Mesh, MeshError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "off" => super::off_loader::load_off(path),
        "obj" => load_obj(path),
        _ => Err(MeshError::UnsupportedFormat(extension)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("raster_pipeline_{}_{}", std::process::id(), name))
    }

    #[test]
    fn quads_are_triangulated_and_models_merged() {
        let path = temp_path("two_models.obj");
        fs::write(
            &path,
            "o quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3 4
o tri
v 0 0 1
v 1 0 1
v 0 1 1
f 5 6 7
",
        )
        .unwrap();

        let mesh = load_obj(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(mesh.vertices().len(), 7);
        assert_eq!(mesh.faces().len(), 3);
        // faces of the second model point at its own vertices
        assert!(mesh.faces()[2].iter().all(|&i| (4..7).contains(&i)));
    }

    #[test]
    fn load_mesh_dispatches_on_extension() {
        let path = temp_path("single.OFF");
        fs::write(&path, "OFF\n3 1 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 2\n").unwrap();
        let mesh = load_mesh(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(mesh.faces(), &[[0, 1, 2]]);

        assert!(matches!(
            load_mesh("model.stl").unwrap_err(),
            MeshError::UnsupportedFormat(ext) if ext == "stl"
        ));
    }
}
