use facenorm_image::{ElementType, ImageError};

/// Errors raised by the image processing operations.
///
/// Every variant is a deterministic input validation failure, reported
/// before any caller provided output buffer is written.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ImgprocError {
    /// The two landmarks coincide or yield a non-finite transform.
    #[error("degenerate landmarks: distance {0} does not define a transform")]
    DegenerateLandmarks(f64),

    /// A mask, output or stack does not have the expected shape.
    #[error("shape mismatch for {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Which buffer has the wrong shape.
        what: &'static str,
        /// The expected shape.
        expected: String,
        /// The actual shape.
        actual: String,
    },

    /// The input element type is not supported by the operation.
    #[error("input element type {0} is not supported")]
    UnsupportedElementType(ElementType),

    /// A configuration parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Error coming from the image containers.
    #[error(transparent)]
    Image(#[from] ImageError),
}

impl ImgprocError {
    pub(crate) fn shape_mismatch(
        what: &'static str,
        expected: impl std::fmt::Display,
        actual: impl std::fmt::Display,
    ) -> Self {
        ImgprocError::ShapeMismatch {
            what,
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}
