//! Pixel interpolation methods for image transformations.
//!
//! This module provides the sub-pixel sampling used when resampling images
//! during geometric normalization.
//!
//! # Interpolation Modes
//!
//! - **Nearest**: Fastest, uses nearest pixel value (no interpolation)
//! - **Bilinear**: Smooth linear interpolation between adjacent pixels

mod bilinear;
mod interpolate;
mod nearest;

pub use interpolate::{interpolate_pixel, is_valid_sample, InterpolationMode};
