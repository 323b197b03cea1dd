#![deny(missing_docs)]
//! Image containers for the face normalization pipeline

/// single plane images, sizes and element types.
pub mod image;

/// stacks of image planes.
pub mod stack;

/// images with a runtime element type.
pub mod dynamic;

/// Error types for the image module.
pub mod error;

pub use crate::dynamic::DynImage;
pub use crate::error::ImageError;
pub use crate::image::{ElementType, Image, ImageDtype, ImageSize, Mask};
pub use crate::stack::ImageStack;
