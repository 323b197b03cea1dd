use facenorm_image::{Image, Mask};

use super::bilinear::bilinear_taps;
use super::nearest::nearest_taps;
use crate::padding::BorderType;

/// Interpolation mode for the resampling operations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InterpolationMode {
    /// Bilinear interpolation
    #[default]
    Bilinear,
    /// Nearest neighbor interpolation
    Nearest,
}

/// The input pixels contributing to one interpolated sample, as (row, col, weight).
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Taps {
    taps: [(isize, isize, f64); 4],
    len: usize,
}

impl Taps {
    #[inline]
    pub(crate) fn push(&mut self, y: isize, x: isize, w: f64) {
        self.taps[self.len] = (y, x, w);
        self.len += 1;
    }

    #[inline]
    pub(crate) fn iter(&self) -> impl Iterator<Item = &(isize, isize, f64)> {
        self.taps[..self.len].iter()
    }
}

impl InterpolationMode {
    #[inline]
    pub(crate) fn taps(&self, u: f64, v: f64) -> Taps {
        match self {
            InterpolationMode::Bilinear => bilinear_taps(u, v),
            InterpolationMode::Nearest => nearest_taps(u, v),
        }
    }
}

/// Kernel for interpolating a pixel value
///
/// # Arguments
///
/// * `image` - The input image.
/// * `u` - The x (column) coordinate of the pixel to interpolate.
/// * `v` - The y (row) coordinate of the pixel to interpolate.
/// * `interpolation` - The interpolation mode to use.
/// * `border` - How to sample neighbours that fall outside the image.
///
/// # Returns
///
/// The interpolated pixel value.
#[inline]
pub fn interpolate_pixel(
    image: &Image<f64>,
    u: f64,
    v: f64,
    interpolation: InterpolationMode,
    border: BorderType,
) -> f64 {
    interpolation
        .taps(u, v)
        .iter()
        .map(|&(y, x, w)| w * border.sample(image, y, x))
        .sum()
}

/// Whether a sample at `(u, v)` only draws from valid input pixels.
///
/// The sample is valid iff every contributing pixel lies inside the image
/// and, when a mask is given, is flagged as valid in it.
#[inline]
pub fn is_valid_sample(
    rows: usize,
    cols: usize,
    mask: Option<&Mask>,
    u: f64,
    v: f64,
    interpolation: InterpolationMode,
) -> bool {
    interpolation.taps(u, v).iter().all(|&(y, x, _)| {
        if y < 0 || x < 0 || y as usize >= rows || x as usize >= cols {
            return false;
        }
        match mask {
            Some(mask) => mask.as_slice()[y as usize * cols + x as usize],
            None => true,
        }
    })
}
