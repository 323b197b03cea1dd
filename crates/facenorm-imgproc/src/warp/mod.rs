//! Geometric normalization of images.
//!
//! This module provides:
//!
//! - Similarity (rotation, isotropic scale, translation) matrices
//! - Affine transform inversion
//! - [`GeomNorm`], which resamples an image and its validity mask into a
//!   fixed size crop centered on a point of the input
//!
//! # Examples
//!
//! ```
//! use facenorm_imgproc::geometry::Point2;
//! use facenorm_imgproc::warp::get_rotation_matrix2d;
//!
//! // rotate by 90 degrees around the origin
//! let m = get_rotation_matrix2d(Point2::new(0.0, 0.0), std::f64::consts::FRAC_PI_2, 1.0, Point2::new(0.0, 0.0));
//! assert!((m[3] - 1.0).abs() < 1e-12);
//! ```

mod affine;
mod geom_norm;

pub use affine::{get_rotation_matrix2d, invert_affine_transform, transform_point};
pub use geom_norm::{GeomNorm, GeomNormConfig, Resampling};
