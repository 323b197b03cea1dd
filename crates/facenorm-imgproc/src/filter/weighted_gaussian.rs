use facenorm_image::{DynImage, Image, ImageDtype, ImageStack};

use super::kernels::{gaussian_kernel_2d, Kernel2D};
use super::weighting::{KernelWeighting, WeightingPolicy};
use crate::error::ImgprocError;
use crate::integral::{integral_image, window_sum};
use crate::padding::{extrapolate, BorderType};
use crate::parallel::{self, ExecutionStrategy};

/// Parameters of a [`WeightedGaussian`] filter.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightedGaussianConfig {
    /// Kernel radius along the rows; the kernel height is `2 * radius_y + 1`.
    pub radius_y: usize,
    /// Kernel radius along the columns; the kernel width is `2 * radius_x + 1`.
    pub radius_x: usize,
    /// Standard deviation of the gaussian along the rows.
    pub sigma_y: f64,
    /// Standard deviation of the gaussian along the columns.
    pub sigma_x: f64,
    /// Border extrapolation used by the convolution.
    pub border: BorderType,
    /// How the base kernel is re-weighted around every pixel.
    pub weighting: KernelWeighting,
    /// How the output rows are scheduled.
    pub strategy: ExecutionStrategy,
}

impl Default for WeightedGaussianConfig {
    fn default() -> Self {
        Self {
            radius_y: 1,
            radius_x: 1,
            sigma_y: std::f64::consts::SQRT_2,
            sigma_x: std::f64::consts::SQRT_2,
            border: BorderType::Mirror,
            weighting: KernelWeighting::MeanThreshold,
            strategy: ExecutionStrategy::Serial,
        }
    }
}

impl WeightedGaussianConfig {
    /// Check that every parameter is in range.
    pub fn validate(&self) -> Result<(), ImgprocError> {
        for (name, s) in [("sigma_y", self.sigma_y), ("sigma_x", self.sigma_x)] {
            if !(s.is_finite() && s > 0.0) {
                return Err(ImgprocError::InvalidConfiguration(format!(
                    "{name} must be positive, got {s}"
                )));
            }
        }
        self.weighting.validate()
    }
}

/// Smooths images with a gaussian kernel that is re-weighted around every
/// pixel, so that smoothing is attenuated across strong intensity edges.
///
/// This is the smoothing step of the self-quotient image illumination
/// normalization.
///
/// With [`BorderType::Zero`] the taps that fall outside the image are
/// dropped and the remaining weights renormalised, so a constant image
/// stays constant up to its corners.
///
/// # Example
///
/// ```
/// use facenorm_image::{Image, ImageSize};
/// use facenorm_imgproc::filter::{WeightedGaussian, WeightedGaussianConfig};
///
/// let filter = WeightedGaussian::new(WeightedGaussianConfig::default()).unwrap();
/// let src = Image::from_size_val(ImageSize { width: 5, height: 4 }, 7.0).unwrap();
///
/// let dst = filter.filter(&src).unwrap();
/// assert!(dst.as_slice().iter().all(|v| (v - 7.0).abs() < 1e-12));
/// ```
#[derive(Debug, Clone)]
pub struct WeightedGaussian {
    config: WeightedGaussianConfig,
    kernel: Kernel2D,
}

impl PartialEq for WeightedGaussian {
    /// Two filters are equal when their radius, sigma and border agree.
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (&self.config, &other.config);
        a.radius_y == b.radius_y
            && a.radius_x == b.radius_x
            && a.sigma_y == b.sigma_y
            && a.sigma_x == b.sigma_x
            && a.border == b.border
    }
}

impl WeightedGaussian {
    /// Create a filter and compute its base kernel.
    ///
    /// # Errors
    ///
    /// Returns [`ImgprocError::InvalidConfiguration`] if a sigma is not positive.
    pub fn new(config: WeightedGaussianConfig) -> Result<Self, ImgprocError> {
        config.validate()?;
        let kernel = gaussian_kernel_2d(
            (config.radius_y, config.radius_x),
            (config.sigma_y, config.sigma_x),
        )?;
        log::debug!(
            "weighted gaussian kernel {}x{} (sigma {}, {})",
            kernel.height(),
            kernel.width(),
            config.sigma_y,
            config.sigma_x
        );
        Ok(Self { config, kernel })
    }

    /// Build a new filter from `config`; the kernel is fully recomputed.
    pub fn reconfigure(&self, config: WeightedGaussianConfig) -> Result<Self, ImgprocError> {
        Self::new(config)
    }

    /// Change the radii as (radius_y, radius_x).
    pub fn with_radius(self, radius: (usize, usize)) -> Result<Self, ImgprocError> {
        Self::new(WeightedGaussianConfig {
            radius_y: radius.0,
            radius_x: radius.1,
            ..self.config
        })
    }

    /// Change the sigmas as (sigma_y, sigma_x).
    pub fn with_sigma(self, sigma: (f64, f64)) -> Result<Self, ImgprocError> {
        Self::new(WeightedGaussianConfig {
            sigma_y: sigma.0,
            sigma_x: sigma.1,
            ..self.config
        })
    }

    /// Change the border type; the kernel does not depend on it and is kept.
    pub fn with_border(mut self, border: BorderType) -> Self {
        self.config.border = border;
        self
    }

    /// Change the weighting policy.
    pub fn with_weighting(self, weighting: KernelWeighting) -> Result<Self, ImgprocError> {
        weighting.validate()?;
        Ok(Self {
            config: WeightedGaussianConfig {
                weighting,
                ..self.config
            },
            kernel: self.kernel,
        })
    }

    /// Change the row scheduling.
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    /// The current configuration.
    pub fn config(&self) -> &WeightedGaussianConfig {
        &self.config
    }

    /// The kernel radii as (radius_y, radius_x).
    pub fn radius(&self) -> (usize, usize) {
        (self.config.radius_y, self.config.radius_x)
    }

    /// The gaussian sigmas as (sigma_y, sigma_x).
    pub fn sigma(&self) -> (f64, f64) {
        (self.config.sigma_y, self.config.sigma_x)
    }

    /// The border type used by the convolution.
    pub fn border(&self) -> BorderType {
        self.config.border
    }

    /// The base gaussian kernel, before any local re-weighting.
    pub fn unweighted_kernel(&self) -> &Kernel2D {
        &self.kernel
    }

    /// Filter `src` into a newly allocated image.
    pub fn filter(&self, src: &Image<f64>) -> Result<Image<f64>, ImgprocError> {
        let mut dst = Image::from_size_val(src.size(), 0.0)?;
        self.filter_into(src, &mut dst)?;
        Ok(dst)
    }

    /// Filter `src` into `dst`, which must have the same size.
    pub fn filter_into(&self, src: &Image<f64>, dst: &mut Image<f64>) -> Result<(), ImgprocError> {
        self.filter_with_policy_into(src, dst, &self.config.weighting)
    }

    /// Filter an image of any element type; it is cast to `f64` first.
    pub fn filter_dyn(&self, src: &DynImage) -> Result<Image<f64>, ImgprocError> {
        self.filter(&src.as_f64())
    }

    /// Filter `src` into `dst` using a caller supplied weighting policy.
    ///
    /// # Errors
    ///
    /// Returns [`ImgprocError::ShapeMismatch`] if `dst` and `src` sizes differ.
    pub fn filter_with_policy_into<P: WeightingPolicy>(
        &self,
        src: &Image<f64>,
        dst: &mut Image<f64>,
        policy: &P,
    ) -> Result<(), ImgprocError> {
        if dst.size() != src.size() {
            return Err(ImgprocError::shape_mismatch("output", src.size(), dst.size()));
        }

        let (ry, rx) = self.kernel.radius();
        let (kh, kw) = (self.kernel.height(), self.kernel.width());
        let (rows, cols) = (src.rows(), src.cols());
        // zero padding is not image content: drop those taps and renormalise
        let in_image_only = self.config.border == BorderType::Zero;

        let extra = extrapolate(src, (ry, rx), self.config.border)?;
        let integral = if policy.uses_local_mean() {
            Some(integral_image(&extra)?)
        } else {
            None
        };

        let extra_cols = extra.cols();
        let extra_data = extra.as_slice();
        let kernel = self.kernel.as_slice();
        let area = (kh * kw) as f64;

        parallel::for_each_row(self.config.strategy, dst.as_slice_mut(), cols, |y, row| {
            let (i0, i1) = if in_image_only {
                (ry.saturating_sub(y), kh.min(rows + ry - y))
            } else {
                (0, kh)
            };

            for (x, out) in row.iter_mut().enumerate() {
                let center = extra_data[(y + ry) * extra_cols + x + rx];
                let local_mean = match &integral {
                    Some(ii) => window_sum(ii, (y, x), (kh, kw)) / area,
                    None => center,
                };
                let (j0, j1) = if in_image_only {
                    (rx.saturating_sub(x), kw.min(cols + rx - x))
                } else {
                    (0, kw)
                };

                let mut acc = 0.0;
                let mut norm = 0.0;
                for i in i0..i1 {
                    let krow = &kernel[i * kw + j0..i * kw + j1];
                    let start = (y + i) * extra_cols + x;
                    let window = &extra_data[start + j0..start + j1];
                    for (&k, &v) in krow.iter().zip(window) {
                        let w = k * policy.attenuation(center, v, local_mean);
                        acc += w * v;
                        norm += w;
                    }
                }

                *out = if norm > 0.0 { acc / norm } else { center };
            }
        });

        Ok(())
    }

    /// Filter every plane of `src` independently into a new stack.
    pub fn filter_stack<T: ImageDtype>(
        &self,
        src: &ImageStack<T>,
    ) -> Result<ImageStack<f64>, ImgprocError> {
        let mut dst = ImageStack::from_size_val(src.num_planes(), src.plane_size(), 0.0)?;
        self.filter_stack_into(src, &mut dst)?;
        Ok(dst)
    }

    /// Filter every plane of `src` independently into `dst`.
    ///
    /// # Errors
    ///
    /// Returns [`ImgprocError::ShapeMismatch`] if the number of planes or the
    /// plane size differ; `dst` is left untouched in that case.
    pub fn filter_stack_into<T: ImageDtype>(
        &self,
        src: &ImageStack<T>,
        dst: &mut ImageStack<f64>,
    ) -> Result<(), ImgprocError> {
        if src.num_planes() != dst.num_planes() {
            return Err(ImgprocError::shape_mismatch(
                "output planes",
                src.num_planes(),
                dst.num_planes(),
            ));
        }
        if src.plane_size() != dst.plane_size() {
            return Err(ImgprocError::shape_mismatch(
                "output plane size",
                src.plane_size(),
                dst.plane_size(),
            ));
        }

        log::trace!(
            "filtering {} planes of {}",
            src.num_planes(),
            src.plane_size()
        );

        for (p, dst_plane) in dst.planes_mut().enumerate() {
            let plane = src.plane(p)?.cast::<f64>()?;
            let filtered = self.filter(&plane)?;
            dst_plane.copy_from_slice(filtered.as_slice());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::weighting::MeanThreshold;
    use approx::assert_abs_diff_eq;
    use facenorm_image::{ImageError, ImageSize};

    fn make_step_image() -> Result<Image<f64>, ImageError> {
        // dark left half, bright right half
        Image::from_fn(
            ImageSize {
                width: 8,
                height: 5,
            },
            |_, x| if x < 4 { 10.0 } else { 200.0 },
        )
    }

    #[test]
    fn test_default_config() -> Result<(), ImgprocError> {
        let filter = WeightedGaussian::new(WeightedGaussianConfig::default())?;
        assert_eq!(filter.radius(), (1, 1));
        assert_eq!(filter.sigma(), (2f64.sqrt(), 2f64.sqrt()));
        assert_eq!(filter.border(), BorderType::Mirror);
        assert_eq!(filter.unweighted_kernel().height(), 3);
        assert_abs_diff_eq!(filter.unweighted_kernel().sum(), 1.0, epsilon = 1e-9);

        Ok(())
    }

    #[test]
    fn test_invalid_config() {
        let res = WeightedGaussian::new(WeightedGaussianConfig {
            sigma_x: 0.0,
            ..Default::default()
        });
        assert!(matches!(res, Err(ImgprocError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_constant_image_all_borders() -> Result<(), ImgprocError> {
        let src = Image::from_size_val(
            ImageSize {
                width: 6,
                height: 4,
            },
            42.5,
        )?;

        for border in [
            BorderType::Mirror,
            BorderType::Zero,
            BorderType::NearestNeighbour,
            BorderType::Circular,
        ] {
            for weighting in [
                KernelWeighting::MeanThreshold,
                KernelWeighting::IntensityGaussian { sigma: 10.0 },
            ] {
                let filter = WeightedGaussian::new(WeightedGaussianConfig {
                    radius_y: 2,
                    radius_x: 3,
                    border,
                    weighting,
                    ..Default::default()
                })?;
                let dst = filter.filter(&src)?;
                for v in dst.as_slice() {
                    assert_abs_diff_eq!(*v, 42.5, epsilon = 1e-9);
                }
            }
        }

        Ok(())
    }

    #[test]
    fn test_zero_border_corner_ignores_padding() -> Result<(), ImgprocError> {
        let src = Image::from_size_val(
            ImageSize {
                width: 6,
                height: 4,
            },
            42.5,
        )?;
        let filter = WeightedGaussian::new(WeightedGaussianConfig {
            border: BorderType::Zero,
            weighting: KernelWeighting::IntensityGaussian { sigma: 10.0 },
            ..Default::default()
        })?;
        let dst = filter.filter(&src)?;

        assert_abs_diff_eq!(dst.row(0)[0], 42.5, epsilon = 1e-12);
        assert_abs_diff_eq!(dst.row(3)[5], 42.5, epsilon = 1e-12);

        Ok(())
    }

    #[test]
    fn test_zero_border_is_renormalised_blur() -> Result<(), ImgprocError> {
        // a top-left corner pixel only sees the in-image quarter of the kernel
        let src = Image::from_fn(
            ImageSize {
                width: 5,
                height: 5,
            },
            |y, x| (y * 5 + x) as f64,
        )?;
        let filter = WeightedGaussian::new(WeightedGaussianConfig {
            border: BorderType::Zero,
            weighting: KernelWeighting::IntensityGaussian { sigma: 1e6 },
            ..Default::default()
        })?;
        let dst = filter.filter(&src)?;

        let k = filter.unweighted_kernel();
        let taps = [(0, 0, 0.0), (0, 1, 1.0), (1, 0, 5.0), (1, 1, 6.0)];
        let (mut acc, mut norm) = (0.0, 0.0);
        for (dy, dx, v) in taps {
            let w = k.get(dy, dx).unwrap_or_default();
            acc += w * v;
            norm += w;
        }
        assert_abs_diff_eq!(dst.row(0)[0], acc / norm, epsilon = 1e-6);

        Ok(())
    }

    #[test]
    fn test_filter_stack_casts_planes() -> Result<(), ImgprocError> {
        let size = ImageSize {
            width: 6,
            height: 5,
        };
        let planes = vec![
            Image::from_fn(size, |y, x| (y * 6 + x) as u8)?,
            Image::from_fn(size, |_, x| if x < 3 { 10u8 } else { 200 })?,
        ];
        let stack = ImageStack::from_planes(planes.clone())?;
        let filter = WeightedGaussian::new(WeightedGaussianConfig::default())?;
        let dst = filter.filter_stack(&stack)?;

        assert_eq!(dst.num_planes(), 2);
        for (p, plane) in planes.iter().enumerate() {
            let expected = filter.filter(&plane.to_f64())?;
            assert_eq!(dst.plane_slice(p)?, expected.as_slice());
        }

        Ok(())
    }

    #[test]
    fn test_edge_is_preserved() -> Result<(), ImgprocError> {
        let src = make_step_image()?;
        let filter = WeightedGaussian::new(WeightedGaussianConfig::default())?;
        let dst = filter.filter(&src)?;

        // pixels right next to the edge do not bleed into each other
        for y in 0..src.rows() {
            assert_abs_diff_eq!(dst.row(y)[3], 10.0, epsilon = 1e-9);
            assert_abs_diff_eq!(dst.row(y)[4], 200.0, epsilon = 1e-9);
        }

        Ok(())
    }

    #[test]
    fn test_isolated_pixel_keeps_its_side() -> Result<(), ImgprocError> {
        let src = Image::from_fn(
            ImageSize {
                width: 5,
                height: 5,
            },
            |y, x| if (y, x) == (2, 2) { 100.0 } else { 0.0 },
        )?;
        let filter = WeightedGaussian::new(WeightedGaussianConfig::default())?;
        let dst = filter.filter(&src)?;

        // the center is alone above the window mean and only averages itself
        assert_abs_diff_eq!(dst.row(2)[2], 100.0, epsilon = 1e-12);
        // its neighbours stay on the majority side
        assert_abs_diff_eq!(dst.row(2)[1], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(dst.row(1)[2], 0.0, epsilon = 1e-12);

        Ok(())
    }

    #[test]
    fn test_intensity_gaussian_smooths_small_variations() -> Result<(), ImgprocError> {
        let src = Image::from_fn(
            ImageSize {
                width: 7,
                height: 7,
            },
            |y, x| if (y, x) == (3, 3) { 1.0 } else { 0.0 },
        )?;
        let filter = WeightedGaussian::new(WeightedGaussianConfig::default())?
            .with_weighting(KernelWeighting::IntensityGaussian { sigma: 100.0 })?;
        let dst = filter.filter(&src)?;

        // with a wide range sigma the filter is a plain gaussian blur
        let center_weight = filter.unweighted_kernel().get(0, 0).unwrap_or_default();
        assert_abs_diff_eq!(dst.row(3)[3], center_weight, epsilon = 1e-4);
        assert!(dst.row(2)[3] > 0.0);

        Ok(())
    }

    #[test]
    fn test_filter_is_deterministic() -> Result<(), ImgprocError> {
        let src = Image::from_fn(
            ImageSize {
                width: 13,
                height: 9,
            },
            |y, x| ((y * 31 + x * 17) % 23) as f64,
        )?;
        let filter = WeightedGaussian::new(WeightedGaussianConfig {
            radius_y: 2,
            radius_x: 1,
            ..Default::default()
        })?;

        let a = filter.filter(&src)?;
        let b = filter.filter(&src)?;
        assert_eq!(a, b);

        let c = filter
            .clone()
            .with_strategy(ExecutionStrategy::ParallelRows)
            .filter(&src)?;
        assert_eq!(a, c);

        Ok(())
    }

    #[test]
    fn test_custom_policy_matches_builtin() -> Result<(), ImgprocError> {
        let src = make_step_image()?;
        let filter = WeightedGaussian::new(WeightedGaussianConfig::default())?;

        let mut dst = Image::from_size_val(src.size(), 0.0)?;
        filter.filter_with_policy_into(&src, &mut dst, &MeanThreshold)?;
        assert_eq!(dst, filter.filter(&src)?);

        Ok(())
    }

    #[test]
    fn test_output_size_mismatch() -> Result<(), ImgprocError> {
        let src = make_step_image()?;
        let filter = WeightedGaussian::new(WeightedGaussianConfig::default())?;
        let mut dst = Image::from_size_val(
            ImageSize {
                width: 3,
                height: 3,
            },
            -1.0,
        )?;

        let res = filter.filter_into(&src, &mut dst);
        assert!(matches!(res, Err(ImgprocError::ShapeMismatch { .. })));
        assert!(dst.as_slice().iter().all(|&v| v == -1.0));

        Ok(())
    }

    #[test]
    fn test_equality_and_reconfigure() -> Result<(), ImgprocError> {
        let a = WeightedGaussian::new(WeightedGaussianConfig::default())?;
        let b = a.clone().with_weighting(KernelWeighting::IntensityGaussian { sigma: 3.0 })?;
        // the weighting policy is not part of the equality
        assert_eq!(a, b);

        let c = a.clone().with_radius((2, 2))?;
        assert_ne!(a, c);
        assert_eq!(c.unweighted_kernel().width(), 5);

        let d = a.clone().with_border(BorderType::Circular);
        assert_ne!(a, d);
        assert_eq!(d.unweighted_kernel(), a.unweighted_kernel());

        let e = a.clone().with_sigma((1.0, 3.0))?;
        assert_ne!(a.unweighted_kernel(), e.unweighted_kernel());

        let f = e.reconfigure(WeightedGaussianConfig::default())?;
        assert_eq!(f, a);
        assert_eq!(f.unweighted_kernel(), a.unweighted_kernel());

        Ok(())
    }

    #[test]
    fn test_filter_dyn_casts_input() -> Result<(), ImgprocError> {
        let size = ImageSize {
            width: 4,
            height: 4,
        };
        let src_u8 = Image::from_fn(size, |y, x| (y * 4 + x) as u8)?;
        let filter = WeightedGaussian::new(WeightedGaussianConfig::default())?;

        let from_dyn = filter.filter_dyn(&DynImage::from(src_u8.clone()))?;
        let from_f64 = filter.filter(&src_u8.to_f64())?;
        assert_eq!(from_dyn, from_f64);

        Ok(())
    }
}
