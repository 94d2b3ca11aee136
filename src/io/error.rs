use std::fmt;

/// Why a mesh could not be loaded. Loading stops at the first problem.
#[derive(Debug)]
pub enum MeshError {
    Io(std::io::Error),
    /// The file does not start with the `OFF` keyword.
    MissingHeader { found: String },
    /// A token that should have been a number was not. `line` is 1-based.
    InvalidNumber {
        line: usize,
        token: String,
        expected: &'static str,
    },
    /// The file ended while `expected` was still to be read.
    UnexpectedEnd { expected: &'static str },
    NonTriangularFace {
        face: usize,
        line: usize,
        vertex_count: usize,
    },
    IndexOutOfRange {
        face: usize,
        index: usize,
        vertex_count: usize,
    },
    /// Error reported by the OBJ reader.
    Obj(tobj::LoadError),
    UnsupportedFormat(String),
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshError::Io(e) => write!(f, "failed to read mesh: {}", e),
            MeshError::MissingHeader { found } => {
                write!(f, "expected 'OFF' header, found '{}'", found)
            }
            MeshError::InvalidNumber {
                line,
                token,
                expected,
            } => write!(f, "line {}: expected {}, found '{}'", line, expected, token),
            MeshError::UnexpectedEnd { expected } => {
                write!(f, "unexpected end of file, expected {}", expected)
            }
            MeshError::NonTriangularFace {
                face,
                line,
                vertex_count,
            } => write!(
                f,
                "line {}: face {} has {} vertices, only triangles are supported",
                line, face, vertex_count
            ),
            MeshError::IndexOutOfRange {
                face,
                index,
                vertex_count,
            } => write!(
                f,
                "face {} references vertex {} but the mesh has {} vertices",
                face, index, vertex_count
            ),
            MeshError::Obj(e) => write!(f, "failed to load OBJ: {}", e),
            MeshError::UnsupportedFormat(ext) => {
                write!(f, "unsupported mesh format '{}', expected .off or .obj", ext)
            }
        }
    }
}

impl std::error::Error for MeshError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MeshError::Io(e) => Some(e),
            MeshError::Obj(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MeshError {
    fn from(e: std::io::Error) -> Self {
        MeshError::Io(e)
    }
}

impl From<tobj::LoadError> for MeshError {
    fn from(e: tobj::LoadError) -> Self {
        MeshError::Obj(e)
    }
}
