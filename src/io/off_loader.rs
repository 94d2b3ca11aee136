use super::error::MeshError;
use crate::scene::Mesh;
use log::{debug, info};
use nalgebra::Point3;
use std::path::Path;
use std::str::FromStr;

/// Loads a triangle mesh from an OFF file.
pub fn load_off<P: AsRef<Path>>(path: P) -> Result<Mesh, MeshError> {
    let path = path.as_ref();
    info!("Loading OFF mesh: {:?}", path);
    let content = std::fs::read_to_string(path)?;
    let mesh = parse_off(&content)?;
    info!(
        "Loaded {} vertices and {} triangles",
        mesh.vertices().len(),
        mesh.faces().len()
    );
    Ok(mesh)
}

/// Parses OFF text:
///
/// ```text
/// OFF
/// nv nf ne
/// x y z        (nv times)
/// 3 i j k      (nf times)
/// ```
///
/// Tokens are whitespace separated, so line breaks are free-form; `#` starts
/// a comment. Only triangular faces are accepted. The edge count is read but
/// not used.
pub fn parse_off(content: &str) -> Result<Mesh, MeshError> {
    let mut tokens = Tokens::new(content);

    match tokens.next() {
        Some((_, "OFF")) => {}
        Some((_, found)) => {
            return Err(MeshError::MissingHeader {
                found: found.to_string(),
            });
        }
        None => {
            return Err(MeshError::MissingHeader {
                found: String::new(),
            });
        }
    }

    let vertex_count: usize = tokens.parse("vertex count")?;
    let face_count: usize = tokens.parse("face count")?;
    let _edge_count: usize = tokens.parse("edge count")?;
    debug!("OFF header: {} vertices, {} faces", vertex_count, face_count);

    let mut vertices = Vec::with_capacity(vertex_count);
    for _ in 0..vertex_count {
        let x = tokens.parse("vertex coordinate")?;
        let y = tokens.parse("vertex coordinate")?;
        let z = tokens.parse("vertex coordinate")?;
        vertices.push(Point3::new(x, y, z));
    }

    let mut faces = Vec::with_capacity(face_count);
    for face in 0..face_count {
        let (line, size) = tokens.parse_with_line::<usize>("face size")?;
        if size != 3 {
            return Err(MeshError::NonTriangularFace {
                face,
                line,
                vertex_count: size,
            });
        }
        faces.push([
            tokens.parse("vertex index")?,
            tokens.parse("vertex index")?,
            tokens.parse("vertex index")?,
        ]);
    }

    Mesh::new(vertices, faces)
}

/// Whitespace separated tokens with their 1-based line numbers.
struct Tokens<'a> {
    inner: Box<dyn Iterator<Item = (usize, &'a str)> + 'a>,
}

impl<'a> Tokens<'a> {
    fn new(content: &'a str) -> Self {
        let inner = content.lines().enumerate().flat_map(|(i, line)| {
            let code = line.split('#').next().unwrap_or_default();
            code.split_whitespace().map(move |token| (i + 1, token))
        });
        Self {
            inner: Box::new(inner),
        }
    }

    fn next(&mut self) -> Option<(usize, &'a str)> {
        self.inner.next()
    }

    fn parse_with_line<T: FromStr>(
        &mut self,
        expected: &'static str,
    ) -> Result<(usize, T), MeshError> {
        let (line, token) = self.next().ok_or(MeshError::UnexpectedEnd { expected })?;
        token
            .parse()
            .map(|value| (line, value))
            .map_err(|_| MeshError::InvalidNumber {
                line,
                token: token.to_string(),
                expected,
            })
    }

    fn parse<T: FromStr>(&mut self, expected: &'static str) -> Result<T, MeshError> {
        self.parse_with_line(expected).map(|(_, value)| value)
    }
}
