/// An error type for the image containers.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ImageError {
    /// Error when the data length does not match the image size.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when an image does not have the expected size.
    #[error("Invalid image size: got {0}x{1}, expected {2}x{3}")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when one of the image dimensions is zero.
    #[error("Image dimensions must be non-zero, got {0}x{1}")]
    ZeroSizedImage(usize, usize),

    /// Error when the plane index is out of bounds.
    #[error("Plane index {0} is out of bounds for a stack of {1} planes")]
    PlaneIndexOutOfBounds(usize, usize),

    /// Error when the pixel data cannot be cast to the requested type.
    #[error("Failed to cast image data")]
    CastError,
}
