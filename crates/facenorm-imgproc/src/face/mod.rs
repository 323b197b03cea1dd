//! Face alignment on two landmarks.

mod eyes_norm;

pub use eyes_norm::{FaceEyesNorm, FaceEyesNormConfig, TransformParameters};
