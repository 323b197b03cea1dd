//! Edge-aware gaussian smoothing.
//!
//! The [`WeightedGaussian`] filter convolves an image with a gaussian kernel
//! that is re-weighted around every pixel by a [`WeightingPolicy`], then
//! re-normalized to sum to one.

/// Gaussian kernel construction.
pub mod kernels;

mod weighted_gaussian;
mod weighting;

pub use kernels::{gaussian_kernel_1d, gaussian_kernel_2d, Kernel2D};
pub use weighted_gaussian::{WeightedGaussian, WeightedGaussianConfig};
pub use weighting::{IntensityGaussian, KernelWeighting, MeanThreshold, WeightingPolicy};
