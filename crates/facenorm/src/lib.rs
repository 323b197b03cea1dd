#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use facenorm_image as image;

#[doc(inline)]
pub use facenorm_imgproc as imgproc;
