use std::fmt;

/// Errors raised while animating the liquid mesh
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiquidError {
    /// The live mesh no longer has one vertex per rest-pose point
    VertexCountMismatch { expected: usize, actual: usize },
    /// The mesh can't be driven as a position buffer
    UnsupportedMesh(&'static str),
}

impl fmt::Display for LiquidError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiquidError::VertexCountMismatch { expected, actual } => write!(
                f,
                "liquid mesh has {} vertices but the rest pose has {}",
                actual, expected
            ),
            LiquidError::UnsupportedMesh(reason) => write!(f, "unsupported liquid mesh: {}", reason),
        }
    }
}

impl std::error::Error for LiquidError {}
