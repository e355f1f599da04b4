//! Validation and construction errors

use crate::float_types::Real;
use nalgebra::Point3;

/// Everything a geometry engine can refuse to build.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    /// (DegenerateShape) A primitive or profile collapses to nothing
    #[error("(DegenerateShape) {0}")]
    DegenerateShape(String),
    /// (InvalidCoordinate) The coordinate has a NaN or infinite
    #[error("(InvalidCoordinate) The coordinate ({0}) has a NaN or infinite")]
    InvalidCoordinate(Point3<Real>),
    /// (TooFewPoints) A ring or face has fewer than the minimal #points
    #[error("(TooFewPoints) expected at least {expected} points, got {actual}")]
    TooFewPoints { expected: usize, actual: usize },
    /// (FaceIndexOutOfRange) A polyhedron face refers to a missing point
    #[error("(FaceIndexOutOfRange) Face index {index} is out of range (points.len = {len})")]
    FaceIndexOutOfRange { index: usize, len: usize },
    /// (Unsupported) The engine cannot realize this combination of inputs
    #[error("(Unsupported) {0}")]
    Unsupported(String),
}

impl GeometryError {
    pub(crate) fn degenerate(msg: impl Into<String>) -> Self {
        GeometryError::DegenerateShape(msg.into())
    }
}

/// Failure to build one mount. Other mounts in the same batch are unaffected.
#[derive(Debug, thiserror::Error)]
pub enum MountError {
    /// A parameter violates a mount invariant; nothing was handed to the engine.
    #[error("invalid mount parameter `{parameter}`: {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },
    /// The geometry engine could not realize an operation for this mount.
    #[error("geometry engine failed while building {context}: {source}")]
    GeometryEngine {
        /// Parameters needed to reproduce the failure
        context: String,
        #[source]
        source: GeometryError,
    },
}

impl MountError {
    pub(crate) fn invalid(parameter: &'static str, reason: impl Into<String>) -> Self {
        MountError::InvalidParameter {
            parameter,
            reason: reason.into(),
        }
    }
}
