use crate::error::ImgprocError;

/// A 2D grid of weights indexed from `-radius` to `+radius` on each axis.
///
/// The grid has shape `(2 * radius_y + 1, 2 * radius_x + 1)` and is stored
/// row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel2D {
    radius_y: usize,
    radius_x: usize,
    weights: Vec<f64>,
}

impl Kernel2D {
    /// Create a kernel from its radii and row-major weights.
    ///
    /// # Errors
    ///
    /// Returns an error if the number of weights does not match the radii.
    pub fn new(radius_y: usize, radius_x: usize, weights: Vec<f64>) -> Result<Self, ImgprocError> {
        let expected = (2 * radius_y + 1) * (2 * radius_x + 1);
        if weights.len() != expected {
            return Err(ImgprocError::shape_mismatch(
                "kernel weights",
                expected,
                weights.len(),
            ));
        }
        Ok(Self {
            radius_y,
            radius_x,
            weights,
        })
    }

    /// The kernel radii as (radius_y, radius_x).
    pub fn radius(&self) -> (usize, usize) {
        (self.radius_y, self.radius_x)
    }

    /// Number of rows, `2 * radius_y + 1`.
    pub fn height(&self) -> usize {
        2 * self.radius_y + 1
    }

    /// Number of columns, `2 * radius_x + 1`.
    pub fn width(&self) -> usize {
        2 * self.radius_x + 1
    }

    /// The weights as a row-major slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.weights
    }

    /// Weight at offset `(dy, dx)` from the kernel center.
    pub fn get(&self, dy: isize, dx: isize) -> Option<f64> {
        let (ry, rx) = (self.radius_y as isize, self.radius_x as isize);
        if dy.abs() > ry || dx.abs() > rx {
            return None;
        }
        let idx = (dy + ry) as usize * self.width() + (dx + rx) as usize;
        self.weights.get(idx).copied()
    }

    /// Sum of all the weights.
    pub fn sum(&self) -> f64 {
        self.weights.iter().sum()
    }
}

/// Create a gaussian kernel of `2 * radius + 1` taps, normalized to sum to one.
///
/// # Arguments
///
/// * `radius` - The radius of the kernel.
/// * `sigma` - The standard deviation of the gaussian.
pub fn gaussian_kernel_1d(radius: usize, sigma: f64) -> Vec<f64> {
    let kernel_size = 2 * radius + 1;
    let mut kernel = Vec::with_capacity(kernel_size);

    let mean = radius as f64;
    let two_sigma_sq = 2.0 * sigma * sigma;

    // compute the kernel
    for i in 0..kernel_size {
        let x = i as f64 - mean;
        kernel.push((-(x * x) / two_sigma_sq).exp());
    }

    // normalize the kernel
    let norm = kernel.iter().sum::<f64>();
    kernel.iter_mut().for_each(|k| *k /= norm);
    kernel
}

/// Create the 2D gaussian kernel `exp(-(i^2 / (2 sy^2) + j^2 / (2 sx^2)))`,
/// normalized to sum to one.
///
/// The kernel is separable, so it is built as the outer product of the two
/// normalized 1D kernels.
///
/// # Errors
///
/// Returns an error if one of the sigmas is not a positive finite number.
///
/// # Example
///
/// ```
/// use facenorm_imgproc::filter::kernels::gaussian_kernel_2d;
///
/// let sigma = std::f64::consts::SQRT_2;
/// let kernel = gaussian_kernel_2d((1, 1), (sigma, sigma)).unwrap();
///
/// assert_eq!(kernel.height(), 3);
/// assert!((kernel.sum() - 1.0).abs() < 1e-9);
/// ```
pub fn gaussian_kernel_2d(radius: (usize, usize), sigma: (f64, f64)) -> Result<Kernel2D, ImgprocError> {
    for (name, s) in [("sigma_y", sigma.0), ("sigma_x", sigma.1)] {
        if !(s.is_finite() && s > 0.0) {
            return Err(ImgprocError::InvalidConfiguration(format!(
                "{name} must be positive, got {s}"
            )));
        }
    }

    let kernel_y = gaussian_kernel_1d(radius.0, sigma.0);
    let kernel_x = gaussian_kernel_1d(radius.1, sigma.1);

    let weights = kernel_y
        .iter()
        .flat_map(|&ky| kernel_x.iter().map(move |&kx| ky * kx))
        .collect();

    Kernel2D::new(radius.0, radius.1, weights)
}
