use std::fmt;

/// Errors rejected by a draw call before any pixel is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RasterError {
    /// The vertex list does not split evenly into primitives.
    InvalidVertexCount {
        primitive: Primitive,
        count: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Triangle,
    Line,
}

impl Primitive {
    /// Vertices consumed per primitive.
    pub fn arity(self) -> usize {
        match self {
            Primitive::Triangle => 3,
            Primitive::Line => 2,
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Triangle => f.write_str("triangle"),
            Primitive::Line => f.write_str("line"),
        }
    }
}

impl fmt::Display for RasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RasterError::InvalidVertexCount { primitive, count } => write!(
                f,
                "{} vertices cannot form {} primitives: count must be a multiple of {}",
                count,
                primitive,
                primitive.arity()
            ),
        }
    }
}

impl std::error::Error for RasterError {}

/// Checks that `count` vertices split into whole primitives.
pub fn check_vertex_count(primitive: Primitive, count: usize) -> Result<(), RasterError> {
    if count % primitive.arity() == 0 {
        Ok(())
    } else {
        Err(RasterError::InvalidVertexCount { primitive, count })
    }
}
