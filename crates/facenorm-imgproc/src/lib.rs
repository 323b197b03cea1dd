#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// error types for the image processing module.
pub mod error;

/// face alignment module.
pub mod face;

/// edge-aware gaussian filtering module.
pub mod filter;

/// points and angles in image coordinates.
pub mod geometry;

/// summed-area tables.
pub mod integral;

/// utilities for interpolation.
pub mod interpolation;

/// border extrapolation module.
pub mod padding;

/// module containing parallization utilities.
pub mod parallel;

/// geometric normalization module.
pub mod warp;

pub use error::ImgprocError;
