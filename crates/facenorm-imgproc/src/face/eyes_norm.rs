use facenorm_image::{DynImage, ElementType, Image, ImageSize, Mask};

use crate::error::ImgprocError;
use crate::geometry::{normalize_angle, Point2};
use crate::warp::{GeomNorm, GeomNormConfig, Resampling};

/// Where the two landmarks must end up in the normalized crop.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FaceEyesNormConfig {
    /// Size of the normalized crop.
    pub crop_size: ImageSize,
    /// Target distance between the two landmarks, in output pixels.
    pub eyes_distance: f64,
    /// Target angle of the line going from the right to the left landmark,
    /// in radians. Zero keeps the eyes level.
    pub eyes_angle: f64,
    /// Point of the crop the landmarks midpoint is mapped onto, as (row, col).
    pub crop_offset: Point2,
}

impl FaceEyesNormConfig {
    /// Level eyes placed `eyes_distance` apart, symmetrically about `eyes_center`.
    pub fn from_eyes_distance(crop_size: ImageSize, eyes_distance: f64, eyes_center: Point2) -> Self {
        Self {
            crop_size,
            eyes_distance,
            eyes_angle: 0.0,
            crop_offset: eyes_center,
        }
    }

    /// Arbitrary target positions for the right and left landmarks.
    pub fn from_landmarks(crop_size: ImageSize, right_target: Point2, left_target: Point2) -> Self {
        Self {
            crop_size,
            eyes_distance: right_target.distance(&left_target),
            eyes_angle: right_target.angle_to(&left_target),
            crop_offset: right_target.midpoint(&left_target),
        }
    }

    /// Check that every parameter is in range.
    pub fn validate(&self) -> Result<(), ImgprocError> {
        if !self.crop_size.is_valid() {
            return Err(ImgprocError::InvalidConfiguration(format!(
                "crop size must be positive, got {}",
                self.crop_size
            )));
        }
        if !(self.eyes_distance.is_finite() && self.eyes_distance > 0.0) {
            return Err(ImgprocError::InvalidConfiguration(format!(
                "eyes distance must be positive, got {}",
                self.eyes_distance
            )));
        }
        if !self.eyes_angle.is_finite() || !self.crop_offset.is_finite() {
            return Err(ImgprocError::InvalidConfiguration(
                "eyes angle and crop offset must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Target position of the right landmark.
    pub fn right_target(&self) -> Point2 {
        self.crop_offset + Point2::new(0.0, -0.5 * self.eyes_distance).rotate(self.eyes_angle)
    }

    /// Target position of the left landmark.
    pub fn left_target(&self) -> Point2 {
        self.crop_offset + Point2::new(0.0, 0.5 * self.eyes_distance).rotate(self.eyes_angle)
    }
}

/// The transform applied by the latest alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransformParameters {
    /// Rotation, in radians.
    pub angle: f64,
    /// Scale factor.
    pub scale: f64,
    /// Midpoint of the landmarks in the input image.
    pub center: Point2,
    /// Size of the crop.
    pub crop_size: ImageSize,
    /// Point of the crop the center was mapped onto.
    pub crop_offset: Point2,
}

/// Aligns face images on two landmarks, typically the eyes.
///
/// The input is rotated, scaled and cropped so that the landmarks land on
/// the configured targets.
///
/// # Example
///
/// ```
/// use facenorm_image::{DynImage, Image, ImageSize};
/// use facenorm_imgproc::face::{FaceEyesNorm, FaceEyesNormConfig};
/// use facenorm_imgproc::geometry::Point2;
///
/// let crop = ImageSize { width: 64, height: 64 };
/// let mut norm = FaceEyesNorm::new(FaceEyesNormConfig::from_eyes_distance(
///     crop,
///     16.0,
///     Point2::new(16.0, 32.0),
/// ))
/// .unwrap();
///
/// let face = Image::from_size_val(ImageSize { width: 200, height: 150 }, 128u8).unwrap();
/// let aligned = norm
///     .align(&DynImage::from(face), Point2::new(60.0, 80.0), Point2::new(60.0, 112.0))
///     .unwrap();
///
/// assert_eq!(aligned.size(), crop);
/// assert!((norm.last_scale() - 0.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct FaceEyesNorm {
    config: FaceEyesNormConfig,
    resampling: Resampling,
    last: TransformParameters,
    geom_norm: Option<GeomNorm>,
}

impl PartialEq for FaceEyesNorm {
    /// Only the configuration takes part in the comparison.
    fn eq(&self, other: &Self) -> bool {
        self.config == other.config
    }
}

impl FaceEyesNorm {
    /// Create an aligner with the default bilinear resampling.
    ///
    /// # Errors
    ///
    /// Returns [`ImgprocError::InvalidConfiguration`] if the crop is empty or
    /// the eyes distance is not positive.
    pub fn new(config: FaceEyesNormConfig) -> Result<Self, ImgprocError> {
        config.validate()?;
        Ok(Self {
            config,
            resampling: Resampling::default(),
            last: TransformParameters::default(),
            geom_norm: None,
        })
    }

    /// Build a new aligner from `config`, keeping the resampling settings.
    pub fn reconfigure(&self, config: FaceEyesNormConfig) -> Result<Self, ImgprocError> {
        Ok(Self::new(config)?.with_resampling(self.resampling))
    }

    /// Change the target distance between the landmarks.
    pub fn with_eyes_distance(self, eyes_distance: f64) -> Result<Self, ImgprocError> {
        self.reconfigure(FaceEyesNormConfig {
            eyes_distance,
            ..self.config
        })
    }

    /// Change the target angle of the landmarks line.
    pub fn with_eyes_angle(self, eyes_angle: f64) -> Result<Self, ImgprocError> {
        self.reconfigure(FaceEyesNormConfig {
            eyes_angle,
            ..self.config
        })
    }

    /// Change the crop size.
    pub fn with_crop_size(self, crop_size: ImageSize) -> Result<Self, ImgprocError> {
        self.reconfigure(FaceEyesNormConfig {
            crop_size,
            ..self.config
        })
    }

    /// Change the point of the crop the landmarks midpoint is mapped onto.
    pub fn with_crop_offset(self, crop_offset: Point2) -> Result<Self, ImgprocError> {
        self.reconfigure(FaceEyesNormConfig {
            crop_offset,
            ..self.config
        })
    }

    /// Change the interpolation, border and scheduling of the resampling.
    pub fn with_resampling(mut self, resampling: Resampling) -> Self {
        self.resampling = resampling;
        self
    }

    /// The current configuration.
    pub fn config(&self) -> &FaceEyesNormConfig {
        &self.config
    }

    /// The current resampling settings.
    pub fn resampling(&self) -> Resampling {
        self.resampling
    }

    /// The resampler used by the latest alignment, if any.
    pub fn geom_norm(&self) -> Option<&GeomNorm> {
        self.geom_norm.as_ref()
    }

    /// The transform applied by the latest alignment.
    pub fn last_parameters(&self) -> &TransformParameters {
        &self.last
    }

    /// Rotation applied by the latest alignment, 0 before any call.
    pub fn last_angle(&self) -> f64 {
        self.last.angle
    }

    /// Scale applied by the latest alignment, 0 before any call.
    pub fn last_scale(&self) -> f64 {
        self.last.scale
    }

    /// Landmarks midpoint used by the latest alignment, the origin before any call.
    pub fn last_offset(&self) -> Point2 {
        self.last.center
    }

    /// Derive the transform mapping `right` and `left` onto their targets.
    ///
    /// # Errors
    ///
    /// Returns [`ImgprocError::DegenerateLandmarks`] if the landmarks coincide
    /// or the resulting scale is not finite.
    pub fn compute_parameters(
        &self,
        right: Point2,
        left: Point2,
    ) -> Result<TransformParameters, ImgprocError> {
        let observed_distance = right.distance(&left);
        if !(observed_distance.is_finite() && observed_distance > 0.0) {
            return Err(ImgprocError::DegenerateLandmarks(observed_distance));
        }

        let scale = self.config.eyes_distance / observed_distance;
        if !(scale.is_finite() && scale > 0.0) {
            return Err(ImgprocError::DegenerateLandmarks(observed_distance));
        }

        let observed_angle = right.angle_to(&left);

        Ok(TransformParameters {
            angle: normalize_angle(self.config.eyes_angle - observed_angle),
            scale,
            center: right.midpoint(&left),
            crop_size: self.config.crop_size,
            crop_offset: self.config.crop_offset,
        })
    }

    /// Align `src` into a newly allocated crop.
    pub fn align(
        &mut self,
        src: &DynImage,
        right: Point2,
        left: Point2,
    ) -> Result<Image<f64>, ImgprocError> {
        check_element_type(src)?;
        let mut dst = Image::from_size_val(self.config.crop_size, 0.0)?;
        self.align_into(src, &mut dst, right, left)?;
        Ok(dst)
    }

    /// Align `src` into `dst`, which must have the crop size.
    pub fn align_into(
        &mut self,
        src: &DynImage,
        dst: &mut Image<f64>,
        right: Point2,
        left: Point2,
    ) -> Result<(), ImgprocError> {
        check_element_type(src)?;
        self.check_output("output", dst.size())?;

        let (params, geom_norm) = self.prepare(right, left)?;
        geom_norm.process_into(&src.as_f64(), dst, params.center)?;

        self.commit(params, geom_norm);
        Ok(())
    }

    /// Align `src` and its validity mask into newly allocated buffers.
    pub fn align_masked(
        &mut self,
        src: &DynImage,
        src_mask: &Mask,
        right: Point2,
        left: Point2,
    ) -> Result<(Image<f64>, Mask), ImgprocError> {
        check_element_type(src)?;
        let mut dst = Image::from_size_val(self.config.crop_size, 0.0)?;
        let mut dst_mask = Mask::from_size_val(self.config.crop_size, false)?;
        self.align_masked_into(src, src_mask, &mut dst, &mut dst_mask, right, left)?;
        Ok((dst, dst_mask))
    }

    /// Align `src` and its validity mask in a single pass.
    ///
    /// Output pixels sampled outside of the input, or from input pixels
    /// flagged invalid in `src_mask`, are flagged invalid in `dst_mask`.
    ///
    /// # Errors
    ///
    /// Fails before writing anything if the element type is not supported,
    /// a buffer has the wrong shape or the landmarks are degenerate.
    pub fn align_masked_into(
        &mut self,
        src: &DynImage,
        src_mask: &Mask,
        dst: &mut Image<f64>,
        dst_mask: &mut Mask,
        right: Point2,
        left: Point2,
    ) -> Result<(), ImgprocError> {
        check_element_type(src)?;
        if src_mask.size() != src.size() {
            return Err(ImgprocError::shape_mismatch(
                "input mask",
                src.size(),
                src_mask.size(),
            ));
        }
        self.check_output("output", dst.size())?;
        self.check_output("output mask", dst_mask.size())?;

        let (params, geom_norm) = self.prepare(right, left)?;
        geom_norm.process_masked_into(&src.as_f64(), src_mask, dst, dst_mask, params.center)?;

        self.commit(params, geom_norm);
        Ok(())
    }

    fn check_output(&self, what: &'static str, size: ImageSize) -> Result<(), ImgprocError> {
        if size != self.config.crop_size {
            return Err(ImgprocError::shape_mismatch(
                what,
                self.config.crop_size,
                size,
            ));
        }
        Ok(())
    }

    fn prepare(
        &self,
        right: Point2,
        left: Point2,
    ) -> Result<(TransformParameters, GeomNorm), ImgprocError> {
        let params = self.compute_parameters(right, left)?;
        let geom_norm = GeomNorm::new(GeomNormConfig {
            rotation_angle: params.angle,
            scaling_factor: params.scale,
            crop_size: params.crop_size,
            crop_offset: params.crop_offset,
            resampling: self.resampling,
        })?;
        Ok((params, geom_norm))
    }

    fn commit(&mut self, params: TransformParameters, geom_norm: GeomNorm) {
        log::debug!(
            "aligned face: angle {:.6} rad, scale {:.6}, center ({:.3}, {:.3})",
            params.angle,
            params.scale,
            params.center.y,
            params.center.x
        );
        self.last = params;
        self.geom_norm = Some(geom_norm);
    }
}

fn check_element_type(src: &DynImage) -> Result<(), ImgprocError> {
    match src.element_type() {
        ElementType::U8 | ElementType::U16 | ElementType::F64 => Ok(()),
        other => Err(ImgprocError::UnsupportedElementType(other)),
    }
}
