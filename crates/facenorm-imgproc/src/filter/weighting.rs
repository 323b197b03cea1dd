use crate::error::ImgprocError;

/// Decides how much of its base weight a neighbour keeps in the locally
/// weighted kernel.
///
/// The attenuation factor must lie in `[0, 1]`, and the center pixel itself
/// must keep a non-zero factor so that the re-normalized kernel is defined.
pub trait WeightingPolicy: Sync {
    /// Whether [`WeightingPolicy::attenuation`] reads the window mean.
    ///
    /// When false the filter skips building the summed-area table.
    fn uses_local_mean(&self) -> bool {
        false
    }

    /// Attenuation of a neighbour of intensity `neighbour` around a center
    /// pixel of intensity `center`, given the mean of the window.
    fn attenuation(&self, center: f64, neighbour: f64, local_mean: f64) -> f64;
}

/// Self-quotient-image mask: neighbours lying on the other side of the
/// window mean than the center pixel are discarded.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeanThreshold;

impl WeightingPolicy for MeanThreshold {
    fn uses_local_mean(&self) -> bool {
        true
    }

    #[inline]
    fn attenuation(&self, center: f64, neighbour: f64, local_mean: f64) -> f64 {
        if (center >= local_mean) == (neighbour >= local_mean) {
            1.0
        } else {
            0.0
        }
    }
}

/// Bilateral style range weight `exp(-(neighbour - center)^2 / (2 sigma^2))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntensityGaussian {
    /// Standard deviation of the intensity difference.
    pub sigma: f64,
}

impl WeightingPolicy for IntensityGaussian {
    #[inline]
    fn attenuation(&self, center: f64, neighbour: f64, _local_mean: f64) -> f64 {
        let d = neighbour - center;
        (-(d * d) / (2.0 * self.sigma * self.sigma)).exp()
    }
}

/// The built-in weighting policies, selectable from a configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KernelWeighting {
    /// See [`MeanThreshold`].
    #[default]
    MeanThreshold,
    /// See [`IntensityGaussian`].
    IntensityGaussian {
        /// Standard deviation of the intensity difference.
        sigma: f64,
    },
}

impl KernelWeighting {
    pub(crate) fn validate(&self) -> Result<(), ImgprocError> {
        match self {
            KernelWeighting::MeanThreshold => Ok(()),
            KernelWeighting::IntensityGaussian { sigma } if sigma.is_finite() && *sigma > 0.0 => {
                Ok(())
            }
            KernelWeighting::IntensityGaussian { sigma } => Err(
                ImgprocError::InvalidConfiguration(format!(
                    "intensity sigma must be positive, got {sigma}"
                )),
            ),
        }
    }
}

impl WeightingPolicy for KernelWeighting {
    fn uses_local_mean(&self) -> bool {
        matches!(self, KernelWeighting::MeanThreshold)
    }

    #[inline]
    fn attenuation(&self, center: f64, neighbour: f64, local_mean: f64) -> f64 {
        match *self {
            KernelWeighting::MeanThreshold => MeanThreshold.attenuation(center, neighbour, local_mean),
            KernelWeighting::IntensityGaussian { sigma } => {
                IntensityGaussian { sigma }.attenuation(center, neighbour, local_mean)
            }
        }
    }
}
