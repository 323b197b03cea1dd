use std::f64::consts::PI;
use std::ops::{Add, Mul, Sub};

/// A point in image coordinates, stored as (row, column).
///
/// # Examples
///
/// ```
/// use facenorm_imgproc::geometry::Point2;
///
/// let right = Point2::new(16.0, 24.0);
/// let left = Point2::new(16.0, 40.0);
///
/// assert_eq!(right.distance(&left), 16.0);
/// assert_eq!(right.midpoint(&left), Point2::new(16.0, 32.0));
/// assert_eq!(right.angle_to(&left), 0.0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point2 {
    /// Row coordinate
    pub y: f64,
    /// Column coordinate
    pub x: f64,
}

impl Point2 {
    /// Create a point from its row and column coordinates.
    pub const fn new(y: f64, x: f64) -> Self {
        Self { y, x }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Point2) -> f64 {
        (other.y - self.y).hypot(other.x - self.x)
    }

    /// The point halfway between `self` and `other`.
    pub fn midpoint(&self, other: &Point2) -> Point2 {
        Point2::new((self.y + other.y) * 0.5, (self.x + other.x) * 0.5)
    }

    /// Angle of the vector `other - self` relative to the horizontal, in radians.
    pub fn angle_to(&self, other: &Point2) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// Rotate the point (as a vector) by `angle` radians.
    pub fn rotate(&self, angle: f64) -> Point2 {
        let (sin, cos) = angle.sin_cos();
        Point2::new(self.x * sin + self.y * cos, self.x * cos - self.y * sin)
    }

    /// Returns true if both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.y.is_finite() && self.x.is_finite()
    }
}

impl From<(f64, f64)> for Point2 {
    fn from((y, x): (f64, f64)) -> Self {
        Point2::new(y, x)
    }
}

impl Add for Point2 {
    type Output = Point2;

    fn add(self, rhs: Point2) -> Point2 {
        Point2::new(self.y + rhs.y, self.x + rhs.x)
    }
}

impl Sub for Point2 {
    type Output = Point2;

    fn sub(self, rhs: Point2) -> Point2 {
        Point2::new(self.y - rhs.y, self.x - rhs.x)
    }
}

impl Mul<f64> for Point2 {
    type Output = Point2;

    fn mul(self, rhs: f64) -> Point2 {
        Point2::new(self.y * rhs, self.x * rhs)
    }
}

/// Wrap an angle into `(-PI, PI]`.
pub fn normalize_angle(angle: f64) -> f64 {
    let mut a = angle % (2.0 * PI);
    if a <= -PI {
        a += 2.0 * PI;
    } else if a > PI {
        a -= 2.0 * PI;
    }
    a
}
