use std::borrow::Cow;

use crate::image::{ElementType, Image, ImageSize};

/// An image whose element type is only known at runtime.
///
/// This is the boundary type for callers that receive buffers of several
/// numeric types; processing code dispatches on it once and then works in
/// `f64`.
#[derive(Clone, Debug, PartialEq)]
pub enum DynImage {
    /// 8-bit unsigned pixels
    U8(Image<u8>),
    /// 16-bit unsigned pixels
    U16(Image<u16>),
    /// 32-bit signed pixels
    I32(Image<i32>),
    /// 32-bit float pixels
    F32(Image<f32>),
    /// 64-bit float pixels
    F64(Image<f64>),
}

impl DynImage {
    /// The element type of the wrapped image.
    pub fn element_type(&self) -> ElementType {
        match self {
            DynImage::U8(_) => ElementType::U8,
            DynImage::U16(_) => ElementType::U16,
            DynImage::I32(_) => ElementType::I32,
            DynImage::F32(_) => ElementType::F32,
            DynImage::F64(_) => ElementType::F64,
        }
    }

    /// The size of the wrapped image.
    pub fn size(&self) -> ImageSize {
        match self {
            DynImage::U8(img) => img.size(),
            DynImage::U16(img) => img.size(),
            DynImage::I32(img) => img.size(),
            DynImage::F32(img) => img.size(),
            DynImage::F64(img) => img.size(),
        }
    }

    /// View the image as `f64`, borrowing when it already is.
    pub fn as_f64(&self) -> Cow<'_, Image<f64>> {
        match self {
            DynImage::U8(img) => Cow::Owned(img.to_f64()),
            DynImage::U16(img) => Cow::Owned(img.to_f64()),
            DynImage::I32(img) => Cow::Owned(img.to_f64()),
            DynImage::F32(img) => Cow::Owned(img.to_f64()),
            DynImage::F64(img) => Cow::Borrowed(img),
        }
    }
}

macro_rules! impl_from_image {
    ($t:ty, $variant:ident) => {
        impl From<Image<$t>> for DynImage {
            fn from(image: Image<$t>) -> Self {
                DynImage::$variant(image)
            }
        }
    };
}

impl_from_image!(u8, U8);
impl_from_image!(u16, U16);
impl_from_image!(i32, I32);
impl_from_image!(f32, F32);
impl_from_image!(f64, F64);
