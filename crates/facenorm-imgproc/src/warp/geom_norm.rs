use facenorm_image::{Image, ImageSize, Mask};

use super::affine::{get_rotation_matrix2d, invert_affine_transform, transform_point};
use crate::error::ImgprocError;
use crate::geometry::Point2;
use crate::interpolation::{interpolate_pixel, is_valid_sample, InterpolationMode};
use crate::padding::BorderType;
use crate::parallel::{self, ExecutionStrategy};

/// How pixels are sampled from the input image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resampling {
    /// Sub-pixel interpolation.
    pub interpolation: InterpolationMode,
    /// Value of the samples falling outside of the input image.
    pub border: BorderType,
    /// How the output rows are scheduled.
    pub strategy: ExecutionStrategy,
}

impl Default for Resampling {
    fn default() -> Self {
        Self {
            interpolation: InterpolationMode::Bilinear,
            border: BorderType::Zero,
            strategy: ExecutionStrategy::Serial,
        }
    }
}

/// Parameters of a [`GeomNorm`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeomNormConfig {
    /// Rotation applied to the input, in radians.
    pub rotation_angle: f64,
    /// Isotropic scale applied to the input, must be positive.
    pub scaling_factor: f64,
    /// Size of the output crop.
    pub crop_size: ImageSize,
    /// Point of the output crop the input center is mapped onto, as (row, col).
    pub crop_offset: Point2,
    /// Sampling of the input.
    pub resampling: Resampling,
}

impl GeomNormConfig {
    /// Check that every parameter is in range.
    pub fn validate(&self) -> Result<(), ImgprocError> {
        if !self.rotation_angle.is_finite() {
            return Err(ImgprocError::InvalidConfiguration(format!(
                "rotation angle must be finite, got {}",
                self.rotation_angle
            )));
        }
        if !(self.scaling_factor.is_finite() && self.scaling_factor > 0.0) {
            return Err(ImgprocError::InvalidConfiguration(format!(
                "scaling factor must be positive, got {}",
                self.scaling_factor
            )));
        }
        if !self.crop_size.is_valid() {
            return Err(ImgprocError::InvalidConfiguration(format!(
                "crop size must be positive, got {}",
                self.crop_size
            )));
        }
        if !self.crop_offset.is_finite() {
            return Err(ImgprocError::InvalidConfiguration(format!(
                "crop offset must be finite, got {:?}",
                self.crop_offset
            )));
        }
        Ok(())
    }
}

/// Rotates, scales and crops an image around a center point.
///
/// A point `src` of the input lands on
/// `crop_offset + scaling_factor * R(rotation_angle) * (src - center)` in the
/// output. Every output pixel is computed by mapping it back into the input
/// and interpolating there.
///
/// # Example
///
/// ```
/// use facenorm_image::{Image, ImageSize};
/// use facenorm_imgproc::geometry::Point2;
/// use facenorm_imgproc::warp::{GeomNorm, GeomNormConfig, Resampling};
///
/// let src = Image::from_fn(ImageSize { width: 8, height: 8 }, |y, x| (y * 8 + x) as f64).unwrap();
///
/// let norm = GeomNorm::new(GeomNormConfig {
///     rotation_angle: 0.0,
///     scaling_factor: 1.0,
///     crop_size: ImageSize { width: 2, height: 2 },
///     crop_offset: Point2::new(0.0, 0.0),
///     resampling: Resampling::default(),
/// })
/// .unwrap();
///
/// let dst = norm.process(&src, Point2::new(3.0, 4.0)).unwrap();
/// assert_eq!(dst.as_slice(), &[28.0, 29.0, 36.0, 37.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GeomNorm {
    config: GeomNormConfig,
}

impl GeomNorm {
    /// Create a resampler.
    ///
    /// # Errors
    ///
    /// Returns [`ImgprocError::InvalidConfiguration`] if the scale is not
    /// positive, the crop is empty or a parameter is not finite.
    pub fn new(config: GeomNormConfig) -> Result<Self, ImgprocError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Build a new resampler from `config`.
    pub fn reconfigure(&self, config: GeomNormConfig) -> Result<Self, ImgprocError> {
        Self::new(config)
    }

    /// The current configuration.
    pub fn config(&self) -> &GeomNormConfig {
        &self.config
    }

    /// The rotation angle in radians.
    pub fn rotation_angle(&self) -> f64 {
        self.config.rotation_angle
    }

    /// The scaling factor.
    pub fn scaling_factor(&self) -> f64 {
        self.config.scaling_factor
    }

    /// The size of the output crop.
    pub fn crop_size(&self) -> ImageSize {
        self.config.crop_size
    }

    /// The point of the crop the center is mapped onto.
    pub fn crop_offset(&self) -> Point2 {
        self.config.crop_offset
    }

    /// The forward 2x3 matrix, acting on (x, y), for the given input center.
    pub fn matrix(&self, center: Point2) -> [f64; 6] {
        get_rotation_matrix2d(
            center,
            self.config.rotation_angle,
            self.config.scaling_factor,
            self.config.crop_offset,
        )
    }

    /// Where `point` of the input lands in the output for the given center.
    pub fn transform_point(&self, center: Point2, point: Point2) -> Point2 {
        let (x, y) = transform_point(point.x, point.y, &self.matrix(center));
        Point2::new(y, x)
    }

    /// Resample `src` into a newly allocated crop.
    pub fn process(&self, src: &Image<f64>, center: Point2) -> Result<Image<f64>, ImgprocError> {
        let mut dst = Image::from_size_val(self.config.crop_size, 0.0)?;
        self.process_into(src, &mut dst, center)?;
        Ok(dst)
    }

    /// Resample `src` into `dst`, which must have the crop size.
    pub fn process_into(
        &self,
        src: &Image<f64>,
        dst: &mut Image<f64>,
        center: Point2,
    ) -> Result<(), ImgprocError> {
        check_center(center)?;
        if dst.size() != self.config.crop_size {
            return Err(ImgprocError::shape_mismatch(
                "output",
                self.config.crop_size,
                dst.size(),
            ));
        }

        let m_inv = invert_affine_transform(&self.matrix(center));
        let Resampling {
            interpolation,
            border,
            strategy,
        } = self.config.resampling;

        let cols = self.config.crop_size.width;
        parallel::for_each_row(strategy, dst.as_slice_mut(), cols, |y, row| {
            for (x, out) in row.iter_mut().enumerate() {
                let (u, v) = transform_point(x as f64, y as f64, &m_inv);
                *out = interpolate_pixel(src, u, v, interpolation, border);
            }
        });

        Ok(())
    }

    /// Resample `src` and its validity mask into newly allocated buffers.
    pub fn process_masked(
        &self,
        src: &Image<f64>,
        src_mask: &Mask,
        center: Point2,
    ) -> Result<(Image<f64>, Mask), ImgprocError> {
        let mut dst = Image::from_size_val(self.config.crop_size, 0.0)?;
        let mut dst_mask = Mask::from_size_val(self.config.crop_size, false)?;
        self.process_masked_into(src, src_mask, &mut dst, &mut dst_mask, center)?;
        Ok((dst, dst_mask))
    }

    /// Resample `src` and its validity mask in a single pass.
    ///
    /// An output pixel is valid iff its source position lies inside the
    /// input and every input pixel it is interpolated from is valid.
    ///
    /// # Errors
    ///
    /// Returns [`ImgprocError::ShapeMismatch`] if `src_mask` does not match
    /// `src` or if the outputs do not have the crop size. Nothing is written
    /// in that case.
    pub fn process_masked_into(
        &self,
        src: &Image<f64>,
        src_mask: &Mask,
        dst: &mut Image<f64>,
        dst_mask: &mut Mask,
        center: Point2,
    ) -> Result<(), ImgprocError> {
        check_center(center)?;
        if src_mask.size() != src.size() {
            return Err(ImgprocError::shape_mismatch(
                "input mask",
                src.size(),
                src_mask.size(),
            ));
        }
        for (what, size) in [("output", dst.size()), ("output mask", dst_mask.size())] {
            if size != self.config.crop_size {
                return Err(ImgprocError::shape_mismatch(
                    what,
                    self.config.crop_size,
                    size,
                ));
            }
        }

        let m_inv = invert_affine_transform(&self.matrix(center));
        let Resampling {
            interpolation,
            border,
            strategy,
        } = self.config.resampling;
        let (rows, cols) = (src.rows(), src.cols());
        let (max_u, max_v) = ((cols - 1) as f64, (rows - 1) as f64);

        parallel::for_each_row_pair(
            strategy,
            dst.as_slice_mut(),
            dst_mask.as_slice_mut(),
            self.config.crop_size.width,
            |y, row, mask_row| {
                for (x, (out, valid)) in row.iter_mut().zip(mask_row.iter_mut()).enumerate() {
                    let (u, v) = transform_point(x as f64, y as f64, &m_inv);
                    *out = interpolate_pixel(src, u, v, interpolation, border);
                    *valid = (0.0..=max_u).contains(&u)
                        && (0.0..=max_v).contains(&v)
                        && is_valid_sample(rows, cols, Some(src_mask), u, v, interpolation);
                }
            },
        );

        log::trace!(
            "resampled {} into {}: {} valid pixels",
            src.size(),
            self.config.crop_size,
            dst_mask.count_valid()
        );

        Ok(())
    }
}

fn check_center(center: Point2) -> Result<(), ImgprocError> {
    if center.is_finite() {
        Ok(())
    } else {
        Err(ImgprocError::InvalidConfiguration(format!(
            "center must be finite, got {center:?}"
        )))
    }
}
